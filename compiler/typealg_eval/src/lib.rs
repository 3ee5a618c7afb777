//! Reference execution of generated hash and equality code.
//!
//! A [`Machine`] owns a flat byte [`Memory`] holding test values and runs
//! everything an [`AlgSession`](typealg_gen::AlgSession) produces: the
//! runtime primitives ([`runtime`]), closures over them, and generated
//! function bodies (interpreted statement by statement).
//!
//! The primitives follow one contract throughout:
//!
//! - `memhash` is FNV-1a over the bytes with the seed as the running state,
//!   so hashing a run of fields at once equals hashing them one by one.
//! - Floats hash `+0` and `-0` equally and compare numerically.
//! - Interfaces dispatch to the dynamic type's closures and panic when that
//!   type has no equality.
//!
//! [`Machine::structural_equal`] and [`Machine::structural_hash`] compute
//! the same answers by walking the type directly, with no generated code.
//! Tests compare the two.

mod errors;
mod interp;
mod machine;
mod memory;
mod reference;
pub mod runtime;
mod value;

pub use errors::{EvalError, EvalResult};
pub use machine::Machine;
pub use memory::Memory;
pub use value::Value;
