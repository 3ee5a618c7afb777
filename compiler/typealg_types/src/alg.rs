//! Base comparison algorithm of a type.

/// How values of a type are hashed and compared, before any refinement by
/// size or alignment.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum AlgKind {
    /// Plain memory: byte-for-byte hash and equality.
    Mem,
    /// Not comparable.
    NoEq,
    String,
    /// Non-empty interface.
    Interface,
    /// Empty interface.
    NilInterface,
    Float32,
    Float64,
    Complex64,
    Complex128,
    /// Aggregate that needs a generated function.
    Special,
}

impl AlgKind {
    #[inline]
    pub fn is_mem(self) -> bool {
        self == AlgKind::Mem
    }
}
