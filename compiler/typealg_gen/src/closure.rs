//! Closure records for indirect calls.
//!
//! A closure is a static read-only record: one word pointing at the code,
//! optionally followed by one word of payload (the byte size for the
//! variable-length memory primitives).

use bitflags::bitflags;
use typealg_ir::Name;
use typealg_types::Idx;

use crate::ir::Callee;
use crate::registry::RuntimeFn;
use crate::Purpose;

bitflags! {
    /// Attributes of an emitted data symbol.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
    pub struct DataFlags: u8 {
        /// Identical copies from several units may be merged.
        const DUPOK = 1 << 0;
        /// Placed in read-only memory.
        const RODATA = 1 << 1;
    }
}

/// What a closure is deduplicated by.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ClosureKey {
    /// One closure per fixed runtime primitive.
    Runtime(RuntimeFn),
    /// One closure per byte size, shared by every type of that size.
    VarLen { purpose: Purpose, size: u64 },
    /// One closure per generated function.
    Type { ty: Idx, purpose: Purpose },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Closure {
    pub symbol: Name,
    pub target: Callee,
    /// Inline size argument passed to the target.
    pub payload: Option<u64>,
    /// Record size in bytes.
    pub size: u64,
    pub flags: DataFlags,
}

impl Closure {
    pub(crate) fn new(symbol: Name, target: Callee, payload: Option<u64>, ptr_size: u64) -> Self {
        let words = if payload.is_some() { 2 } else { 1 };
        Closure {
            symbol,
            target,
            payload,
            size: words * ptr_size,
            flags: DataFlags::DUPOK | DataFlags::RODATA,
        }
    }
}

/// Symbol for a variable-length closure of `size` bytes.
pub(crate) fn varlen_symbol(purpose: Purpose, size: u64) -> String {
    match purpose {
        Purpose::Hash => format!(".hashfunc{size}"),
        Purpose::Equal => format!(".eqfunc{size}"),
    }
}

/// Symbol for the closure wrapping a generated function for type `ty_name`.
pub(crate) fn type_symbol(purpose: Purpose, ty_name: &str) -> String {
    match purpose {
        Purpose::Hash => format!(".hashfunc.{ty_name}"),
        Purpose::Equal => format!(".eqfunc.{ty_name}"),
    }
}

/// Symbol for the generated function itself.
pub(crate) fn function_symbol(purpose: Purpose, ty_name: &str) -> String {
    match purpose {
        Purpose::Hash => format!(".hash.{ty_name}"),
        Purpose::Equal => format!(".eq.{ty_name}"),
    }
}
