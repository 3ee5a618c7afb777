//! Reference implementations of the runtime primitives.

#![allow(clippy::float_cmp, reason = "float primitives compare numerically")]

use typealg_gen::{AlgorithmKind, Contract, RuntimeFn};

use crate::errors::{unhashable, uncomparable, EvalError, EvalResult};
use crate::Machine;

/// FNV-1a 64-bit prime.
pub const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Mixing constants for floats and interfaces.
pub const C0: u64 = 33_054_211_828_000_289;
pub const C1: u64 = 23_344_194_077_549_503;

/// FNV-1a over `bytes`, continuing from `seed`.
///
/// `fnv(a ++ b, h) == fnv(b, fnv(a, h))`.
pub fn fnv(bytes: &[u8], seed: u64) -> u64 {
    bytes
        .iter()
        .fold(seed, |h, &b| (h ^ u64::from(b)).wrapping_mul(FNV_PRIME))
}

fn arity(contract: Contract) -> usize {
    match contract {
        Contract::Hash | Contract::Equal => 2,
        Contract::HashSized | Contract::EqualSized => 3,
    }
}

impl Machine<'_> {
    /// Invoke a runtime primitive. Equality results are `0` or `1`.
    pub fn call_runtime(&self, func: RuntimeFn, args: &[u64]) -> EvalResult<u64> {
        use RuntimeFn as F;

        let arity = arity(func.contract());
        if args.len() != arity {
            return Err(EvalError::Malformed(format!(
                "{func} takes {arity} arguments, got {}",
                args.len()
            )));
        }
        let width = || {
            func.fixed_width()
                .ok_or_else(|| EvalError::Malformed(format!("{func} has no fixed width")))
        };

        match func {
            F::Memhash0 | F::Memhash8 | F::Memhash16 | F::Memhash32 | F::Memhash64
            | F::Memhash128 => self.memhash(args[0], width()?, args[1]),
            F::MemhashVarlen | F::Memhash => self.memhash(args[0], args[1], args[2]),
            F::Strhash => self.strhash(args[0], args[1]),
            F::Interhash | F::Nilinterhash => self.interhash(args[0], args[1]),
            F::F32hash => self.f32hash(args[0], args[1]),
            F::F64hash => self.f64hash(args[0], args[1]),
            F::C64hash => {
                let h = self.f32hash(args[0], args[1])?;
                self.f32hash(args[0] + 4, h)
            }
            F::C128hash => {
                let h = self.f64hash(args[0], args[1])?;
                self.f64hash(args[0] + 8, h)
            }
            F::Memequal0 | F::Memequal8 | F::Memequal16 | F::Memequal32 | F::Memequal64
            | F::Memequal128 => self.memequal(args[0], args[1], width()?).map(u64::from),
            F::MemequalVarlen | F::Memequal => {
                self.memequal(args[0], args[1], args[2]).map(u64::from)
            }
            F::Strequal => self.strequal(args[0], args[1]).map(u64::from),
            F::Interequal | F::Nilinterequal => self.interequal(args[0], args[1]).map(u64::from),
            F::F32equal => self.f32_eq(args[0], args[1]).map(u64::from),
            F::F64equal => self.f64_eq(args[0], args[1]).map(u64::from),
            F::C64equal => self.c64_eq(args[0], args[1]).map(u64::from),
            F::C128equal => self.c128_eq(args[0], args[1]).map(u64::from),
        }
    }

    // ── Hashing ─────────────────────────────────────────────────────

    pub(crate) fn memhash(&self, p: u64, size: u64, h: u64) -> EvalResult<u64> {
        Ok(fnv(self.mem.read(p, size)?, h))
    }

    pub(crate) fn strhash(&self, p: u64, h: u64) -> EvalResult<u64> {
        let (data, len) = self.string_header(p)?;
        self.memhash(data, len, h)
    }

    /// `+0` and `-0` hash alike. NaN hashes by its bits; it never equals
    /// anything, so any hash is consistent.
    pub(crate) fn f32hash(&self, p: u64, h: u64) -> EvalResult<u64> {
        if self.load_f32(p)? == 0.0 {
            return Ok(C1.wrapping_mul(C0 ^ h));
        }
        self.memhash(p, 4, h)
    }

    pub(crate) fn f64hash(&self, p: u64, h: u64) -> EvalResult<u64> {
        if self.load_f64(p)? == 0.0 {
            return Ok(C1.wrapping_mul(C0 ^ h));
        }
        self.memhash(p, 8, h)
    }

    /// A nil interface hashes to the seed. Otherwise the dynamic value is
    /// hashed by its own closure, which panics if it has no equality.
    pub(crate) fn interhash(&self, p: u64, h: u64) -> EvalResult<u64> {
        let (tab, data) = self.iface_words(p)?;
        if tab == 0 {
            return Ok(h);
        }
        let ty = self.dynamic_type(tab)?;
        if self.session.classify(ty) == AlgorithmKind::NoEquality {
            return Err(unhashable(&self.session.type_name(ty)));
        }
        let closure = self.session.hash_closure(ty)?;
        Ok(C1.wrapping_mul(self.call_closure(&closure, &[data, h ^ C0])?))
    }

    // ── Equality ────────────────────────────────────────────────────

    pub(crate) fn memequal(&self, p: u64, q: u64, size: u64) -> EvalResult<bool> {
        Ok(self.mem.read(p, size)? == self.mem.read(q, size)?)
    }

    pub(crate) fn strequal(&self, p: u64, q: u64) -> EvalResult<bool> {
        let (pd, plen) = self.string_header(p)?;
        let (qd, qlen) = self.string_header(q)?;
        Ok(plen == qlen && self.memequal(pd, qd, plen)?)
    }

    /// Different dynamic types are unequal; equal types compare with the
    /// type's own closure, which must exist.
    pub(crate) fn interequal(&self, p: u64, q: u64) -> EvalResult<bool> {
        let (ptab, pdata) = self.iface_words(p)?;
        let (qtab, qdata) = self.iface_words(q)?;
        if ptab != qtab {
            return Ok(false);
        }
        if ptab == 0 {
            return Ok(true);
        }
        let ty = self.dynamic_type(ptab)?;
        let Some(closure) = self.session.eq_closure(ty)? else {
            return Err(uncomparable(&self.session.type_name(ty)));
        };
        Ok(self.call_closure(&closure, &[pdata, qdata])? != 0)
    }

    pub(crate) fn f32_eq(&self, p: u64, q: u64) -> EvalResult<bool> {
        Ok(self.load_f32(p)? == self.load_f32(q)?)
    }

    pub(crate) fn f64_eq(&self, p: u64, q: u64) -> EvalResult<bool> {
        Ok(self.load_f64(p)? == self.load_f64(q)?)
    }

    pub(crate) fn c64_eq(&self, p: u64, q: u64) -> EvalResult<bool> {
        Ok(self.f32_eq(p, q)? && self.f32_eq(p + 4, q + 4)?)
    }

    pub(crate) fn c128_eq(&self, p: u64, q: u64) -> EvalResult<bool> {
        Ok(self.f64_eq(p, q)? && self.f64_eq(p + 8, q + 8)?)
    }

    // ── Loads ───────────────────────────────────────────────────────

    pub(crate) fn load_word(&self, p: u64) -> EvalResult<u64> {
        self.mem.read_uint(p, self.ptr_size)
    }

    /// Data pointer and length of the string at `p`.
    pub(crate) fn string_header(&self, p: u64) -> EvalResult<(u64, u64)> {
        Ok((self.load_word(p)?, self.load_word(p + self.ptr_size)?))
    }

    /// Type word and data pointer of the interface at `p`.
    pub(crate) fn iface_words(&self, p: u64) -> EvalResult<(u64, u64)> {
        Ok((self.load_word(p)?, self.load_word(p + self.ptr_size)?))
    }

    fn load_f32(&self, p: u64) -> EvalResult<f32> {
        let bits = u32::try_from(self.mem.read_uint(p, 4)?)
            .map_err(|_| EvalError::Malformed("float32 load".to_owned()))?;
        Ok(f32::from_bits(bits))
    }

    fn load_f64(&self, p: u64) -> EvalResult<f64> {
        Ok(f64::from_bits(self.mem.read_uint(p, 8)?))
    }
}

#[cfg(test)]
mod tests;
