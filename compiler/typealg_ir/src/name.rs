//! Symbol handles.

use std::fmt;

/// Handle to a string held by a [`StringInterner`](crate::StringInterner).
///
/// Names are dense indices in interning order, so two names from the same
/// interner compare equal exactly when their strings do. Ordering follows
/// interning order, not the strings; sort by the looked-up text when the
/// order has to be stable across runs.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct Name(u32);

impl Name {
    /// The empty string, present in every interner.
    pub const EMPTY: Name = Name(0);

    #[inline]
    pub(crate) const fn from_index(index: u32) -> Self {
        Name(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name({})", self.0)
    }
}

impl Default for Name {
    fn default() -> Self {
        Self::EMPTY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_is_index_zero() {
        assert!(Name::EMPTY.is_empty());
        assert_eq!(Name::EMPTY.index(), 0);
        assert!(!Name::from_index(3).is_empty());
        assert_eq!(Name::default(), Name::EMPTY);
    }

    #[test]
    fn debug_shows_index() {
        assert_eq!(format!("{:?}", Name::from_index(12)), "Name(12)");
    }
}
