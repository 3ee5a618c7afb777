//! Runtime primitives and the table mapping algorithm kinds onto them.

use std::fmt;

use crate::{AlgorithmKind, MemWidth, Purpose};

/// A function supplied by the runtime.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum RuntimeFn {
    // Hashing
    Memhash0,
    Memhash8,
    Memhash16,
    Memhash32,
    Memhash64,
    Memhash128,
    MemhashVarlen,
    Memhash,
    Strhash,
    Interhash,
    Nilinterhash,
    F32hash,
    F64hash,
    C64hash,
    C128hash,

    // Equality
    Memequal0,
    Memequal8,
    Memequal16,
    Memequal32,
    Memequal64,
    Memequal128,
    MemequalVarlen,
    Memequal,
    Strequal,
    Interequal,
    Nilinterequal,
    F32equal,
    F64equal,
    C64equal,
    C128equal,
}

/// Calling convention of a runtime function.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Contract {
    /// `(p, h) -> h`
    Hash,
    /// `(p, size, h) -> h`
    HashSized,
    /// `(p, q) -> bool`
    Equal,
    /// `(p, q, size) -> bool`
    EqualSized,
}

impl RuntimeFn {
    /// Symbol name inside the runtime package.
    pub fn name(self) -> &'static str {
        match self {
            RuntimeFn::Memhash0 => "memhash0",
            RuntimeFn::Memhash8 => "memhash8",
            RuntimeFn::Memhash16 => "memhash16",
            RuntimeFn::Memhash32 => "memhash32",
            RuntimeFn::Memhash64 => "memhash64",
            RuntimeFn::Memhash128 => "memhash128",
            RuntimeFn::MemhashVarlen => "memhash_varlen",
            RuntimeFn::Memhash => "memhash",
            RuntimeFn::Strhash => "strhash",
            RuntimeFn::Interhash => "interhash",
            RuntimeFn::Nilinterhash => "nilinterhash",
            RuntimeFn::F32hash => "f32hash",
            RuntimeFn::F64hash => "f64hash",
            RuntimeFn::C64hash => "c64hash",
            RuntimeFn::C128hash => "c128hash",
            RuntimeFn::Memequal0 => "memequal0",
            RuntimeFn::Memequal8 => "memequal8",
            RuntimeFn::Memequal16 => "memequal16",
            RuntimeFn::Memequal32 => "memequal32",
            RuntimeFn::Memequal64 => "memequal64",
            RuntimeFn::Memequal128 => "memequal128",
            RuntimeFn::MemequalVarlen => "memequal_varlen",
            RuntimeFn::Memequal => "memequal",
            RuntimeFn::Strequal => "strequal",
            RuntimeFn::Interequal => "interequal",
            RuntimeFn::Nilinterequal => "nilinterequal",
            RuntimeFn::F32equal => "f32equal",
            RuntimeFn::F64equal => "f64equal",
            RuntimeFn::C64equal => "c64equal",
            RuntimeFn::C128equal => "c128equal",
        }
    }

    /// Name of the read-only closure wrapping this function.
    pub fn closure_symbol(self) -> String {
        format!("runtime.{}·f", self.name())
    }

    pub fn contract(self) -> Contract {
        match self {
            RuntimeFn::MemhashVarlen | RuntimeFn::Memhash => Contract::HashSized,
            RuntimeFn::MemequalVarlen | RuntimeFn::Memequal => Contract::EqualSized,
            RuntimeFn::Memhash0
            | RuntimeFn::Memhash8
            | RuntimeFn::Memhash16
            | RuntimeFn::Memhash32
            | RuntimeFn::Memhash64
            | RuntimeFn::Memhash128
            | RuntimeFn::Strhash
            | RuntimeFn::Interhash
            | RuntimeFn::Nilinterhash
            | RuntimeFn::F32hash
            | RuntimeFn::F64hash
            | RuntimeFn::C64hash
            | RuntimeFn::C128hash => Contract::Hash,
            RuntimeFn::Memequal0
            | RuntimeFn::Memequal8
            | RuntimeFn::Memequal16
            | RuntimeFn::Memequal32
            | RuntimeFn::Memequal64
            | RuntimeFn::Memequal128
            | RuntimeFn::Strequal
            | RuntimeFn::Interequal
            | RuntimeFn::Nilinterequal
            | RuntimeFn::F32equal
            | RuntimeFn::F64equal
            | RuntimeFn::C64equal
            | RuntimeFn::C128equal => Contract::Equal,
        }
    }

    /// Byte width of a fixed-width memory primitive.
    pub fn fixed_width(self) -> Option<u64> {
        let width = match self {
            RuntimeFn::Memhash0 | RuntimeFn::Memequal0 => MemWidth::W0,
            RuntimeFn::Memhash8 | RuntimeFn::Memequal8 => MemWidth::W8,
            RuntimeFn::Memhash16 | RuntimeFn::Memequal16 => MemWidth::W16,
            RuntimeFn::Memhash32 | RuntimeFn::Memequal32 => MemWidth::W32,
            RuntimeFn::Memhash64 | RuntimeFn::Memequal64 => MemWidth::W64,
            RuntimeFn::Memhash128 | RuntimeFn::Memequal128 => MemWidth::W128,
            _ => return None,
        };
        Some(width.bytes())
    }
}

impl fmt::Display for RuntimeFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "runtime.{}", self.name())
    }
}

/// A registry hit: the runtime function, and whether its closure must carry
/// the type's byte size as payload.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Primitive {
    pub func: RuntimeFn,
    pub sized: bool,
}

impl Primitive {
    const fn plain(func: RuntimeFn) -> Self {
        Primitive { func, sized: false }
    }
}

/// Runtime primitive implementing `kind` for `purpose`.
///
/// `None` for [`AlgorithmKind::NoEquality`] (there is nothing to call) and
/// [`AlgorithmKind::Custom`] (a function has to be generated).
pub fn lookup(kind: AlgorithmKind, purpose: Purpose) -> Option<Primitive> {
    use AlgorithmKind as K;
    use RuntimeFn as F;

    let hash = purpose == Purpose::Hash;
    let pick = |h: RuntimeFn, e: RuntimeFn| Primitive::plain(if hash { h } else { e });

    Some(match kind {
        K::FixedMem(width) => match width {
            MemWidth::W0 => pick(F::Memhash0, F::Memequal0),
            MemWidth::W8 => pick(F::Memhash8, F::Memequal8),
            MemWidth::W16 => pick(F::Memhash16, F::Memequal16),
            MemWidth::W32 => pick(F::Memhash32, F::Memequal32),
            MemWidth::W64 => pick(F::Memhash64, F::Memequal64),
            MemWidth::W128 => pick(F::Memhash128, F::Memequal128),
        },
        K::VarMem => Primitive {
            sized: true,
            ..pick(F::MemhashVarlen, F::MemequalVarlen)
        },
        K::String => pick(F::Strhash, F::Strequal),
        K::Interface => pick(F::Interhash, F::Interequal),
        K::NilableInterface => pick(F::Nilinterhash, F::Nilinterequal),
        K::Float32 => pick(F::F32hash, F::F32equal),
        K::Float64 => pick(F::F64hash, F::F64equal),
        K::Complex64 => pick(F::C64hash, F::C64equal),
        K::Complex128 => pick(F::C128hash, F::C128equal),
        K::NoEquality | K::Custom => return None,
    })
}
