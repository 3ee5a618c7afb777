//! Structural type descriptions stored in the pool.

use typealg_ir::Name;

use crate::Idx;

/// A struct field with its computed byte offset.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Field {
    /// `None` for a blank (`_`) field.
    pub name: Option<Name>,
    pub ty: Idx,
    pub offset: u64,
}

impl Field {
    #[inline]
    pub fn is_blank(&self) -> bool {
        self.name.is_none()
    }
}

/// Structure of an interned type.
///
/// Children are `Idx` handles, so hashing and equality of a `TypeKind` are
/// shallow and structurally equal types intern to one index.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum TypeKind {
    // Primitives (pre-interned at fixed indices)
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Uintptr,
    Float32,
    Float64,
    Complex64,
    Complex128,
    String,
    UnsafePointer,
    /// Empty interface; holds any value or nil.
    Any,

    // Reference-like kinds, compared as plain words
    Pointer(Idx),
    Chan(Idx),

    // Kinds without equality
    Slice(Idx),
    Map {
        key: Idx,
        value: Idx,
    },
    Func {
        params: Box<[Idx]>,
        results: Box<[Idx]>,
    },

    /// Non-empty interface, identified by name.
    Interface(Name),

    Array {
        elem: Idx,
        len: u64,
    },
    Struct {
        /// `None` for a literal struct type.
        name: Option<Name>,
        fields: Box<[Field]>,
    },
    /// Explicitly laid out plain memory (packed or foreign records).
    Opaque {
        size: u64,
        align: u64,
    },
}
