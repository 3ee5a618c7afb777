//! Algorithm classification.
//!
//! Refines a type's base [`AlgKind`] into the algorithm the generator will
//! actually use. Plain memory splits into fixed-width and variable-length
//! variants by size, and under-aligned memory is always variable-length so
//! no fixed-width primitive is handed a pointer it could not load from.

use typealg_types::{AlgKind, Idx, Pool};

/// Width of a fixed-size memory primitive.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum MemWidth {
    W0,
    W8,
    W16,
    W32,
    W64,
    W128,
}

impl MemWidth {
    /// Width for an exact byte size, if there is a primitive for it.
    pub fn from_size(size: u64) -> Option<MemWidth> {
        match size {
            0 => Some(MemWidth::W0),
            1 => Some(MemWidth::W8),
            2 => Some(MemWidth::W16),
            4 => Some(MemWidth::W32),
            8 => Some(MemWidth::W64),
            16 => Some(MemWidth::W128),
            _ => None,
        }
    }

    pub fn bytes(self) -> u64 {
        match self {
            MemWidth::W0 => 0,
            MemWidth::W8 => 1,
            MemWidth::W16 => 2,
            MemWidth::W32 => 4,
            MemWidth::W64 => 8,
            MemWidth::W128 => 16,
        }
    }
}

/// The algorithm used to hash and compare a type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum AlgorithmKind {
    /// Plain memory of a primitive width.
    FixedMem(MemWidth),
    /// Plain memory of any other size, or under-aligned.
    VarMem,
    String,
    Interface,
    NilableInterface,
    Float32,
    Float64,
    Complex64,
    Complex128,
    /// Not comparable.
    NoEquality,
    /// Needs a generated function.
    Custom,
}

/// Classify a type. Total, deterministic, and side-effect free.
pub fn classify(pool: &Pool, ty: Idx) -> AlgorithmKind {
    match pool.alg_type(ty) {
        AlgKind::Mem => classify_mem(pool, ty),
        AlgKind::NoEq => AlgorithmKind::NoEquality,
        AlgKind::String => AlgorithmKind::String,
        AlgKind::Interface => AlgorithmKind::Interface,
        AlgKind::NilInterface => AlgorithmKind::NilableInterface,
        AlgKind::Float32 => AlgorithmKind::Float32,
        AlgKind::Float64 => AlgorithmKind::Float64,
        AlgKind::Complex64 => AlgorithmKind::Complex64,
        AlgKind::Complex128 => AlgorithmKind::Complex128,
        AlgKind::Special => AlgorithmKind::Custom,
    }
}

fn classify_mem(pool: &Pool, ty: Idx) -> AlgorithmKind {
    let size = pool.size(ty);
    let align = pool.align(ty);

    // Under-aligned for a target that needs aligned loads.
    if align < pool.target().min_alignment && align < size {
        return AlgorithmKind::VarMem;
    }

    MemWidth::from_size(size).map_or(AlgorithmKind::VarMem, AlgorithmKind::FixedMem)
}
