//! Flat byte-addressed memory for values under test.

use crate::errors::{EvalError, EvalResult};

/// Address of the first allocation. Zero stays free to mean nil.
const BASE: u64 = 0x1000;

/// A growable arena. Allocations are never freed, so an address stays
/// valid for the life of the arena.
pub struct Memory {
    bytes: Vec<u8>,
}

impl Memory {
    pub fn new() -> Self {
        Memory {
            bytes: Vec::with_capacity(1024),
        }
    }

    /// Allocate `size` bytes aligned to `align`, every byte set to `fill`.
    pub fn alloc(&mut self, size: u64, align: u64, fill: u8) -> u64 {
        let align = align.max(1);
        let start = (BASE + self.bytes.len() as u64).div_ceil(align) * align;
        let end = start + size;
        self.bytes.resize(to_usize(end - BASE), fill);
        start
    }

    pub fn read(&self, addr: u64, len: u64) -> EvalResult<&[u8]> {
        let range = self.range(addr, len)?;
        Ok(&self.bytes[range])
    }

    pub fn write(&mut self, addr: u64, data: &[u8]) -> EvalResult<()> {
        let range = self.range(addr, data.len() as u64)?;
        self.bytes[range].copy_from_slice(data);
        Ok(())
    }

    /// Little-endian unsigned integer of `width` bytes (at most 8).
    pub fn read_uint(&self, addr: u64, width: u64) -> EvalResult<u64> {
        let bytes = self.read(addr, width)?;
        let mut buf = [0u8; 8];
        buf[..bytes.len()].copy_from_slice(bytes);
        Ok(u64::from_le_bytes(buf))
    }

    /// Store the low `width` bytes of `value`, little-endian.
    pub fn write_uint(&mut self, addr: u64, width: u64, value: u64) -> EvalResult<()> {
        let bytes = value.to_le_bytes();
        self.write(addr, &bytes[..to_usize(width.min(8))])
    }

    /// Bytes in use, including alignment gaps.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    fn range(&self, addr: u64, len: u64) -> EvalResult<std::ops::Range<usize>> {
        let out_of_bounds = || EvalError::OutOfBounds { addr, len };
        if len == 0 {
            return Ok(0..0);
        }
        if addr < BASE {
            return Err(out_of_bounds());
        }
        let start = addr - BASE;
        let end = start.checked_add(len).ok_or_else(out_of_bounds)?;
        if end > self.bytes.len() as u64 {
            return Err(out_of_bounds());
        }
        Ok(to_usize(start)..to_usize(end))
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "arena offsets are bounded by the Vec length"
)]
#[inline]
fn to_usize(n: u64) -> usize {
    n as usize
}
