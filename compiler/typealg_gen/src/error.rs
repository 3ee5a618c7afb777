//! Internal-consistency failures.
//!
//! None of these can be triggered by user code; each means the caller asked
//! for something classification already ruled out. The compilation that
//! receives one must stop.

use thiserror::Error;
use typealg_types::AlgKind;

use crate::{AlgorithmKind, Purpose};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum AlgError {
    #[error("hash requested for type {ty}, which has no equality")]
    NoHash { ty: String },

    #[error("hash_for called on plain-memory type {ty}")]
    HashForMemory { ty: String },

    #[error("cannot synthesize {purpose} for {ty}: not a struct or array")]
    NotAggregate { ty: String, purpose: Purpose },

    #[error("cannot synthesize {purpose} for {ty}: it classifies as {kind:?}")]
    NotCustom {
        ty: String,
        purpose: Purpose,
        kind: AlgorithmKind,
    },

    #[error("type {ty} has no direct equality callee (algorithm {alg:?})")]
    NoDirectEq { ty: String, alg: AlgKind },

    #[error("element or field type {ty} has no equality")]
    Uncomparable { ty: String },
}
