//! Type layouts for the hash/equality generator.
//!
//! Every type lives in a [`Pool`] and is addressed by a 32-bit [`Idx`].
//! Structurally equal types intern to the same index, so `Idx` equality is
//! type identity everywhere downstream (caches, symbol names, closures).
//!
//! Layout (size, alignment, field offsets) is computed once at interning
//! time for the pool's [`Target`], together with the base comparison
//! algorithm ([`AlgKind`]) and a few [`TypeFlags`].
//!
//! The comparability predicates the synthesizers rely on live in
//! `compare.rs` as `Pool` methods: regular memory, panicking comparisons,
//! padded fields, memory runs, and the equality cost model.

mod alg;
mod compare;
mod flags;
mod idx;
mod kind;
mod pool;
mod target;

pub use alg::AlgKind;
pub use compare::{FieldCost, MemRun, MAX_INLINE_COMPARE_COST};
pub use flags::TypeFlags;
pub use idx::Idx;
pub use kind::{Field, TypeKind};
pub use pool::{Pool, TypeEntry};
pub use target::Target;
