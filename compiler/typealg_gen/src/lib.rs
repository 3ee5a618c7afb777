//! Hash and equality synthesis for composite types.
//!
//! Given a type from a [`Pool`](typealg_types::Pool), this crate either
//! picks one of a fixed set of runtime primitives (fixed-width memory,
//! variable-length memory, string, interface, float, complex) or emits a
//! function body that composes them field by field or element by element.
//!
//! - **Classification** ([`classify`]) refines a type's base algorithm into
//!   an [`AlgorithmKind`], taking size and alignment into account.
//! - **Registry** ([`registry::lookup`]) maps simple kinds to [`RuntimeFn`]s.
//! - **Synthesis** (`hash` and `eq` modules) emits [`GeneratedFunction`]s over a
//!   small statement tree ([`ir`]).
//! - **Closures** ([`Closure`]) wrap either one into a read-only record for
//!   indirect calls.
//! - **Session** ([`AlgSession`]) owns the caches and is the entry point.
//!   Every artifact is built at most once per key, even under concurrent
//!   requests.
//!
//! # Crate Dependencies
//!
//! `typealg_gen` reads layouts from `typealg_types` and names from
//! `typealg_ir`. Executing generated code is left to `typealg_eval` or to
//! a real back end.

mod cache;
mod classify;
mod closure;
pub mod dump;
mod eq;
mod error;
mod hash;
pub mod ir;
pub mod registry;
mod session;

#[cfg(test)]
mod test_helpers;

use std::fmt;
use std::sync::Once;

pub use cache::OnceMap;
pub use classify::{classify, AlgorithmKind, MemWidth};
pub use closure::{Closure, ClosureKey, DataFlags};
pub use error::AlgError;
pub use ir::{Callee, FuncFlags, GeneratedFunction};
pub use registry::{Contract, Primitive, RuntimeFn};
pub use session::{AlgSession, SessionStats, TypeAlgs};

/// Which of the two algorithms is being requested.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum Purpose {
    Hash,
    Equal,
}

impl fmt::Display for Purpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Purpose::Hash => f.write_str("hash"),
            Purpose::Equal => f.write_str("equality"),
        }
    }
}

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call more than once. Enable with `RUST_LOG=typealg_gen=debug`,
/// or `RUST_LOG=typealg_gen=trace` to also print every generated body.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
