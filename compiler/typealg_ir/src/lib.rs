//! Interned names for the typealg crates.
//!
//! Generated function symbols, type names, and struct field names are all
//! stored once in a [`StringInterner`] and passed around as 32-bit [`Name`]s.

mod interner;
mod name;

pub use interner::{StringInterner, StringLookup};
pub use name::Name;
