//! The type pool: interning plus per-type layout metadata.

use rustc_hash::FxHashMap;
use typealg_ir::Name;

use crate::{AlgKind, Field, Idx, Target, TypeFlags, TypeKind};

mod construct;
mod format;

/// Everything the pool knows about one interned type.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TypeEntry {
    pub kind: TypeKind,
    pub size: u64,
    pub align: u64,
    /// Base algorithm, before size/alignment refinement.
    pub alg: AlgKind,
    pub flags: TypeFlags,
}

/// Interned types for one target.
///
/// Construction takes `&mut self`; once built, the pool is shared
/// immutably (`&Pool` is `Sync`) by every synthesis task.
pub struct Pool {
    target: Target,
    entries: Vec<TypeEntry>,
    map: FxHashMap<TypeKind, Idx>,
    /// Named structs seen so far, per name.
    named: FxHashMap<Name, u32>,
    /// Ordinal of each named struct after the first to reuse its name.
    vargen: FxHashMap<Idx, u32>,
}

impl Pool {
    /// Create a pool for [`Target::AMD64`].
    pub fn new() -> Self {
        Self::with_target(Target::AMD64)
    }

    /// Create a pool with the primitives pre-interned at their fixed indices.
    ///
    /// `target` must satisfy [`Target::is_valid`].
    pub fn with_target(target: Target) -> Self {
        debug_assert!(target.is_valid(), "invalid target {target:?}");
        let mut pool = Pool {
            target,
            entries: Vec::with_capacity(64),
            map: FxHashMap::default(),
            named: FxHashMap::default(),
            vargen: FxHashMap::default(),
        };

        let primitives = [
            TypeKind::Bool,
            TypeKind::Int8,
            TypeKind::Int16,
            TypeKind::Int32,
            TypeKind::Int64,
            TypeKind::Uint8,
            TypeKind::Uint16,
            TypeKind::Uint32,
            TypeKind::Uint64,
            TypeKind::Uintptr,
            TypeKind::Float32,
            TypeKind::Float64,
            TypeKind::Complex64,
            TypeKind::Complex128,
            TypeKind::String,
            TypeKind::UnsafePointer,
            TypeKind::Any,
        ];
        for kind in primitives {
            let entry = pool.compute_entry(kind.clone());
            let idx = Idx::from_raw(index_u32(pool.entries.len()));
            pool.entries.push(entry);
            pool.map.insert(kind, idx);
        }
        debug_assert_eq!(pool.entries.len(), Idx::PRIMITIVE_COUNT as usize);

        pool
    }

    #[inline]
    pub fn target(&self) -> &Target {
        &self.target
    }

    /// Number of interned types.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Intern a type, returning the existing index if it is already known.
    pub(crate) fn intern(&mut self, kind: TypeKind) -> Idx {
        if let Some(&idx) = self.map.get(&kind) {
            return idx;
        }

        let entry = self.compute_entry(kind.clone());
        let dynamic = self.entries.len() - Idx::PRIMITIVE_COUNT as usize;
        let idx = Idx::from_raw(Idx::FIRST_DYNAMIC + index_u32(dynamic));
        tracing::trace!(?idx, size = entry.size, align = entry.align, alg = ?entry.alg, "interned type");
        if let TypeKind::Struct { name: Some(name), .. } = &kind {
            let seen = self.named.entry(*name).or_insert(0);
            if *seen > 0 {
                self.vargen.insert(idx, *seen);
            }
            *seen += 1;
        }
        self.entries.push(entry);
        self.map.insert(kind, idx);
        idx
    }

    /// Entry for an index. Panics on an index from another pool.
    #[inline]
    pub fn entry(&self, idx: Idx) -> &TypeEntry {
        let raw = idx.raw();
        let slot = if raw < Idx::PRIMITIVE_COUNT {
            raw as usize
        } else {
            (raw - Idx::FIRST_DYNAMIC + Idx::PRIMITIVE_COUNT) as usize
        };
        &self.entries[slot]
    }

    #[inline]
    pub fn kind(&self, idx: Idx) -> &TypeKind {
        &self.entry(idx).kind
    }

    #[inline]
    pub fn size(&self, idx: Idx) -> u64 {
        self.entry(idx).size
    }

    #[inline]
    pub fn align(&self, idx: Idx) -> u64 {
        self.entry(idx).align
    }

    #[inline]
    pub fn flags(&self, idx: Idx) -> TypeFlags {
        self.entry(idx).flags
    }

    /// Base comparison algorithm of a type.
    #[inline]
    pub fn alg_type(&self, idx: Idx) -> AlgKind {
        self.entry(idx).alg
    }

    /// Fields of a struct type; empty for every other kind.
    pub fn fields(&self, idx: Idx) -> &[Field] {
        match self.kind(idx) {
            TypeKind::Struct { fields, .. } => fields,
            _ => &[],
        }
    }

    /// Element type and length of an array type.
    pub fn array_elem(&self, idx: Idx) -> Option<(Idx, u64)> {
        match *self.kind(idx) {
            TypeKind::Array { elem, len } => Some((elem, len)),
            _ => None,
        }
    }

    #[inline]
    pub fn is_string(&self, idx: Idx) -> bool {
        matches!(self.kind(idx), TypeKind::String)
    }

    /// Byte offset one past the end of field `i` of struct `idx`.
    pub fn field_end(&self, idx: Idx, i: usize) -> u64 {
        let field = &self.fields(idx)[i];
        field.offset + self.size(field.ty)
    }

    /// Disambiguating ordinal of a named struct that reuses an earlier
    /// struct's name; `None` for the first one and for every other type.
    #[inline]
    pub fn vargen(&self, idx: Idx) -> Option<u32> {
        self.vargen.get(&idx).copied()
    }

    // === Layout ===

    fn compute_entry(&self, kind: TypeKind) -> TypeEntry {
        let ptr = self.target.ptr_size;
        let wide = self.target.wide_align();

        let (size, align, alg) = match &kind {
            TypeKind::Bool | TypeKind::Int8 | TypeKind::Uint8 => (1, 1, AlgKind::Mem),
            TypeKind::Int16 | TypeKind::Uint16 => (2, 2, AlgKind::Mem),
            TypeKind::Int32 | TypeKind::Uint32 => (4, 4, AlgKind::Mem),
            TypeKind::Int64 | TypeKind::Uint64 => (8, wide, AlgKind::Mem),
            TypeKind::Uintptr
            | TypeKind::UnsafePointer
            | TypeKind::Pointer(_)
            | TypeKind::Chan(_) => (ptr, ptr, AlgKind::Mem),
            TypeKind::Float32 => (4, 4, AlgKind::Float32),
            TypeKind::Float64 => (8, wide, AlgKind::Float64),
            TypeKind::Complex64 => (8, 4, AlgKind::Complex64),
            TypeKind::Complex128 => (16, wide, AlgKind::Complex128),
            TypeKind::String => (2 * ptr, ptr, AlgKind::String),
            TypeKind::Any => (2 * ptr, ptr, AlgKind::NilInterface),
            TypeKind::Interface(_) => (2 * ptr, ptr, AlgKind::Interface),
            TypeKind::Slice(_) => (3 * ptr, ptr, AlgKind::NoEq),
            TypeKind::Map { .. } | TypeKind::Func { .. } => (ptr, ptr, AlgKind::NoEq),
            TypeKind::Opaque { size, align } => (*size, (*align).max(1), AlgKind::Mem),
            TypeKind::Array { elem, len } => {
                let e = self.entry(*elem);
                let alg = match (e.alg, len) {
                    (AlgKind::Mem | AlgKind::NoEq, _) => e.alg,
                    (_, 0) => AlgKind::Mem,
                    (a, 1) => a,
                    _ => AlgKind::Special,
                };
                (e.size.saturating_mul(*len), e.align, alg)
            }
            TypeKind::Struct { fields, .. } => {
                let align = fields
                    .iter()
                    .map(|f| self.align(f.ty))
                    .max()
                    .unwrap_or(1);
                let end = fields
                    .iter()
                    .map(|f| f.offset + self.size(f.ty))
                    .max()
                    .unwrap_or(0);
                let size = align_up(end, align);
                (size, align, self.struct_alg(fields, size))
            }
        };

        let flags = self.compute_flags(&kind, size);
        TypeEntry {
            kind,
            size,
            align,
            alg,
            flags,
        }
    }

    fn struct_alg(&self, fields: &[Field], size: u64) -> AlgKind {
        // A lone named field compares exactly like its type.
        if let [field] = fields {
            if !field.is_blank() {
                return self.alg_type(field.ty);
            }
        }

        let mut alg = AlgKind::Mem;
        for (i, field) in fields.iter().enumerate() {
            let a = self.alg_type(field.ty);
            if a == AlgKind::NoEq {
                return AlgKind::NoEq;
            }
            if a != AlgKind::Mem || field.is_blank() || self.padded_in(fields, i, size) {
                alg = AlgKind::Special;
            }
        }
        alg
    }

    fn compute_flags(&self, kind: &TypeKind, size: u64) -> TypeFlags {
        let mut flags = TypeFlags::empty();
        match kind {
            TypeKind::Any | TypeKind::Interface(_) => flags |= TypeFlags::CAN_PANIC,
            TypeKind::Array { elem, .. } => {
                flags |= TypeFlags::IS_AGGREGATE | (self.flags(*elem) & TypeFlags::CAN_PANIC);
            }
            TypeKind::Struct { name, fields } => {
                flags |= TypeFlags::IS_AGGREGATE;
                if name.is_some() {
                    flags |= TypeFlags::IS_NAMED;
                }
                for (i, field) in fields.iter().enumerate() {
                    if !field.is_blank() {
                        flags |= self.flags(field.ty) & TypeFlags::CAN_PANIC;
                    }
                    if self.padded_in(fields, i, size) {
                        flags |= TypeFlags::HAS_PADDING;
                    }
                }
            }
            _ => {}
        }
        flags
    }

    /// Whether bytes follow field `i` before the next field (or the end of
    /// the struct).
    pub(crate) fn padded_in(&self, fields: &[Field], i: usize, struct_size: u64) -> bool {
        let end = fields[i].offset + self.size(fields[i].ty);
        match fields.get(i + 1) {
            Some(next) => end != next.offset,
            None => end != struct_size,
        }
    }
}

impl Default for Pool {
    fn default() -> Self {
        Self::new()
    }
}

/// Round `offset` up to a multiple of `align` (a power of two).
#[inline]
pub(crate) fn align_up(offset: u64, align: u64) -> u64 {
    let align = align.max(1);
    offset.div_ceil(align) * align
}

#[inline]
fn index_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or_else(|_| panic!("type pool exceeded u32::MAX types"))
}
