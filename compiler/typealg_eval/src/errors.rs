//! Evaluation errors.

use thiserror::Error;
use typealg_gen::AlgError;

pub type EvalResult<T> = Result<T, EvalError>;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum EvalError {
    /// A runtime primitive panicked. Generated code passes this through
    /// unchanged.
    #[error("panic: {0}")]
    Panic(String),

    #[error(transparent)]
    Alg(#[from] AlgError),

    #[error("memory access out of bounds: {len} bytes at {addr:#x}")]
    OutOfBounds { addr: u64, len: u64 },

    #[error("index {index} out of range [0, {len})")]
    IndexOutOfRange { index: u64, len: u64 },

    #[error("unknown generated function {0}")]
    UnknownFunction(String),

    #[error("value does not fit type {ty}")]
    ValueMismatch { ty: String },

    #[error("malformed generated code: {0}")]
    Malformed(String),
}

pub(crate) fn unhashable(ty: &str) -> EvalError {
    EvalError::Panic(format!("hash of unhashable type {ty}"))
}

pub(crate) fn uncomparable(ty: &str) -> EvalError {
    EvalError::Panic(format!("comparing uncomparable type {ty}"))
}
