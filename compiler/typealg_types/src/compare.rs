//! Comparability predicates shared by the hash and equality synthesizers.

use typealg_stack::ensure_sufficient_stack;

use crate::{Idx, Pool, TypeFlags, TypeKind};

/// A maximal span of struct fields `[start, next)` that can be hashed or
/// compared as one block of bytes.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct MemRun {
    /// Bytes from the first field's offset to the last field's end.
    pub size: u64,
    /// Index of the first field after the run.
    pub next: usize,
}

/// Comparison cost of field `i` of a struct, together with the span it
/// covers.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct FieldCost {
    pub cost: u64,
    pub size: u64,
    pub next: usize,
}

/// Conditions cheaper than this are emitted as field-by-field `==`; larger
/// runs become one `memequal` call.
pub const MAX_INLINE_COMPARE_COST: u64 = 4;

impl Pool {
    /// Whether values of `ty` can be hashed and compared as raw bytes.
    #[inline]
    pub fn is_regular_memory(&self, ty: Idx) -> bool {
        self.alg_type(ty).is_mem()
    }

    /// Whether comparing two values of `ty` can panic.
    #[inline]
    pub fn eq_can_panic(&self, ty: Idx) -> bool {
        self.flags(ty).contains(TypeFlags::CAN_PANIC)
    }

    /// Whether padding bytes follow field `i` of struct `ty`.
    pub fn is_padded_field(&self, ty: Idx, i: usize) -> bool {
        self.padded_in(self.fields(ty), i, self.size(ty))
    }

    /// The run of regular-memory fields starting at field `start`.
    ///
    /// A run ends after a padded field, before a blank or non-memory field,
    /// and, on targets that need aligned loads, before it would grow past
    /// the alignment guaranteed at its start.
    pub fn memrun(&self, ty: Idx, start: usize) -> MemRun {
        let fields = self.fields(ty);
        let start_offset = fields[start].offset;
        let min_alignment = self.target().min_alignment;

        let mut next = start;
        loop {
            next += 1;
            if next == fields.len() {
                break;
            }
            if self.is_padded_field(ty, next - 1) {
                break;
            }
            let field = &fields[next];
            if field.is_blank() || !self.is_regular_memory(field.ty) {
                break;
            }
            if min_alignment > 1 {
                let mut align = self.align(ty);
                if start_offset & (align - 1) != 0 {
                    align = 1 << start_offset.trailing_zeros();
                }
                if self.field_end(ty, next) - start_offset > align {
                    break;
                }
            }
        }

        MemRun {
            size: self.field_end(ty, next - 1) - start_offset,
            next,
        }
    }

    /// Cost of comparing field `i` of struct `ty` (and the run it starts).
    ///
    /// Targets that merge loads pay one unit per register-sized word of the
    /// whole run. Others compare field by field and use a per-kind table.
    pub fn eq_field_cost(&self, ty: Idx, i: usize) -> FieldCost {
        let reg_size = self.target().reg_size;
        if self.target().can_merge_loads {
            let run = self.memrun(ty, i);
            return FieldCost {
                cost: run.size.div_ceil(reg_size),
                size: run.size,
                next: run.next,
            };
        }

        let field_ty = self.fields(ty)[i].ty;
        FieldCost {
            cost: self.eq_type_cost(field_ty),
            size: self.size(field_ty),
            next: i + 1,
        }
    }

    /// Total comparison cost of a struct, skipping blank fields.
    pub fn eq_struct_cost(&self, ty: Idx) -> u64 {
        let fields = self.fields(ty);
        let mut cost = 0u64;
        let mut i = 0;
        while i < fields.len() {
            if fields[i].is_blank() {
                i += 1;
                continue;
            }
            let field = self.eq_field_cost(ty, i);
            cost = cost.saturating_add(field.cost);
            i = field.next;
        }
        cost
    }

    fn eq_type_cost(&self, ty: Idx) -> u64 {
        ensure_sufficient_stack(|| match *self.kind(ty) {
            TypeKind::Struct { .. } => self.eq_struct_cost(ty),
            TypeKind::Array { elem, len } => len.saturating_mul(self.eq_type_cost(elem)),
            TypeKind::String
            | TypeKind::Any
            | TypeKind::Interface(_)
            | TypeKind::Complex64
            | TypeKind::Complex128 => 2,
            TypeKind::Int64 | TypeKind::Uint64 => 8 / self.target().reg_size,
            _ => 1,
        })
    }
}
