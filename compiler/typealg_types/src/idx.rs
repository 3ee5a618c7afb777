//! Type index handle.

use std::fmt;

/// A 32-bit index into the type [`Pool`](crate::Pool).
///
/// Types are compared by index equality, never structurally.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct Idx(u32);

impl Idx {
    // === Primitive Types (indices 0-16) ===
    // Pre-interned at pool creation in this order.

    pub const BOOL: Self = Self(0);
    pub const INT8: Self = Self(1);
    pub const INT16: Self = Self(2);
    pub const INT32: Self = Self(3);
    pub const INT64: Self = Self(4);
    pub const UINT8: Self = Self(5);
    pub const UINT16: Self = Self(6);
    pub const UINT32: Self = Self(7);
    pub const UINT64: Self = Self(8);
    pub const UINTPTR: Self = Self(9);
    pub const FLOAT32: Self = Self(10);
    pub const FLOAT64: Self = Self(11);
    pub const COMPLEX64: Self = Self(12);
    pub const COMPLEX128: Self = Self(13);
    pub const STRING: Self = Self(14);
    pub const UNSAFE_POINTER: Self = Self(15);
    /// The empty interface `interface {}`, which may hold nil.
    pub const ANY: Self = Self(16);

    /// Number of pre-interned primitive types.
    pub const PRIMITIVE_COUNT: u32 = 17;

    // === Reserved Range (17-31) ===

    /// First index for dynamically interned types.
    pub const FIRST_DYNAMIC: u32 = 32;

    /// Sentinel value indicating no type.
    pub const NONE: Self = Self(u32::MAX);

    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn is_primitive(self) -> bool {
        self.0 < Self::PRIMITIVE_COUNT
    }

    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    /// Name of a primitive type, `None` for interned compound types.
    #[inline]
    pub const fn name(self) -> Option<&'static str> {
        match self.0 {
            0 => Some("bool"),
            1 => Some("int8"),
            2 => Some("int16"),
            3 => Some("int32"),
            4 => Some("int64"),
            5 => Some("uint8"),
            6 => Some("uint16"),
            7 => Some("uint32"),
            8 => Some("uint64"),
            9 => Some("uintptr"),
            10 => Some("float32"),
            11 => Some("float64"),
            12 => Some("complex64"),
            13 => Some("complex128"),
            14 => Some("string"),
            15 => Some("unsafe.Pointer"),
            16 => Some("interface {}"),
            _ => None,
        }
    }
}

impl fmt::Debug for Idx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "Idx({name})"),
            None if self.is_none() => write!(f, "Idx::NONE"),
            None => write!(f, "Idx({})", self.0),
        }
    }
}

impl fmt::Display for Idx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None if self.is_none() => f.write_str("<none>"),
            None => write!(f, "type#{}", self.0),
        }
    }
}

const _: () = assert!(std::mem::size_of::<Idx>() == 4);
