//! Target architecture parameters that affect layout and generated code.

/// Architecture description consulted by layout and synthesis.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Target {
    pub name: &'static str,
    /// Size of a pointer (and of `uintptr`) in bytes. A nonzero power of two.
    pub ptr_size: u64,
    /// Size of a general-purpose register in bytes. A nonzero power of two
    /// no larger than 8; comparison costs are counted in registers.
    pub reg_size: u64,
    /// Minimum alignment the hardware requires for a multi-byte memory
    /// access. `1` means unaligned loads are fine.
    pub min_alignment: u64,
    /// Whether adjacent small loads can be combined into one wide load.
    pub can_merge_loads: bool,
}

impl Target {
    pub const AMD64: Target = Target {
        name: "amd64",
        ptr_size: 8,
        reg_size: 8,
        min_alignment: 1,
        can_merge_loads: true,
    };

    pub const ARM64: Target = Target {
        name: "arm64",
        ptr_size: 8,
        reg_size: 8,
        min_alignment: 1,
        can_merge_loads: true,
    };

    pub const I386: Target = Target {
        name: "386",
        ptr_size: 4,
        reg_size: 4,
        min_alignment: 1,
        can_merge_loads: true,
    };

    pub const MIPS: Target = Target {
        name: "mips",
        ptr_size: 4,
        reg_size: 4,
        min_alignment: 4,
        can_merge_loads: false,
    };

    /// Whether the sizes above are usable for layout and cost estimates.
    pub const fn is_valid(&self) -> bool {
        self.ptr_size.is_power_of_two()
            && self.reg_size.is_power_of_two()
            && self.reg_size <= 8
            && self.min_alignment.is_power_of_two()
    }

    /// Alignment of 8-byte scalars (`int64`, `float64`, halves of `complex128`).
    #[inline]
    pub const fn wide_align(&self) -> u64 {
        if self.reg_size < 8 {
            self.reg_size
        } else {
            8
        }
    }
}

impl Default for Target {
    fn default() -> Self {
        Target::AMD64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_are_valid() {
        for target in [Target::AMD64, Target::ARM64, Target::I386, Target::MIPS] {
            assert!(target.is_valid(), "{}", target.name);
        }
    }

    #[test]
    fn zero_sizes_are_invalid() {
        let no_regs = Target {
            reg_size: 0,
            ..Target::AMD64
        };
        let no_ptrs = Target {
            ptr_size: 0,
            ..Target::I386
        };
        let odd = Target {
            min_alignment: 3,
            ..Target::MIPS
        };
        assert!(!no_regs.is_valid());
        assert!(!no_ptrs.is_valid());
        assert!(!odd.is_valid());
    }
}
