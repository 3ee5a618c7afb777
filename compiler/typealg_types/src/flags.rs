//! Pre-computed type metadata flags.
//!
//! Computed once at interning time from the children's flags, so queries
//! never walk the type.

use bitflags::bitflags;

bitflags! {
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct TypeFlags: u32 {
        /// Comparing two values can panic (an interface is reachable
        /// through non-blank fields or array elements).
        const CAN_PANIC = 1 << 0;
        /// Struct or array.
        const IS_AGGREGATE = 1 << 1;
        /// Struct with padding after at least one field.
        const HAS_PADDING = 1 << 2;
        /// Struct carrying a declared name.
        const IS_NAMED = 1 << 3;
    }
}
