//! Structural hash and equality, computed straight from the type.
//!
//! No closures, no generated code, no run merging: every non-blank field
//! and every element is visited in order. Interfaces recurse into their
//! dynamic type the same way.

use typealg_stack::ensure_sufficient_stack;
use typealg_types::{AlgKind, Idx, TypeKind};

use crate::errors::{unhashable, uncomparable, EvalResult};
use crate::runtime::{C0, C1};
use crate::Machine;

impl Machine<'_> {
    pub fn structural_equal(&self, ty: Idx, p: u64, q: u64) -> EvalResult<bool> {
        ensure_sufficient_stack(|| {
            let pool = self.pool;
            match pool.kind(ty) {
                TypeKind::Array { elem, len } => {
                    let size = pool.size(*elem);
                    for i in 0..*len {
                        if !self.structural_equal(*elem, p + i * size, q + i * size)? {
                            return Ok(false);
                        }
                    }
                    Ok(true)
                }
                TypeKind::Struct { fields, .. } => {
                    for field in fields.iter().filter(|f| !f.is_blank()) {
                        if !self.structural_equal(field.ty, p + field.offset, q + field.offset)? {
                            return Ok(false);
                        }
                    }
                    Ok(true)
                }
                TypeKind::Any | TypeKind::Interface(_) => {
                    let (ptab, pdata) = self.iface_words(p)?;
                    let (qtab, qdata) = self.iface_words(q)?;
                    if ptab != qtab {
                        return Ok(false);
                    }
                    if ptab == 0 {
                        return Ok(true);
                    }
                    let dyn_ty = self.dynamic_type(ptab)?;
                    if pool.alg_type(dyn_ty) == AlgKind::NoEq {
                        return Err(uncomparable(&self.session.type_name(dyn_ty)));
                    }
                    self.structural_equal(dyn_ty, pdata, qdata)
                }
                _ => match pool.alg_type(ty) {
                    AlgKind::Float32 => self.f32_eq(p, q),
                    AlgKind::Float64 => self.f64_eq(p, q),
                    AlgKind::Complex64 => self.c64_eq(p, q),
                    AlgKind::Complex128 => self.c128_eq(p, q),
                    AlgKind::String => self.strequal(p, q),
                    AlgKind::NoEq => Err(uncomparable(&self.session.type_name(ty))),
                    _ => self.memequal(p, q, pool.size(ty)),
                },
            }
        })
    }

    pub fn structural_hash(&self, ty: Idx, p: u64, h: u64) -> EvalResult<u64> {
        ensure_sufficient_stack(|| {
            let pool = self.pool;
            match pool.kind(ty) {
                TypeKind::Array { elem, len } => {
                    let size = pool.size(*elem);
                    (0..*len).try_fold(h, |h, i| self.structural_hash(*elem, p + i * size, h))
                }
                TypeKind::Struct { fields, .. } => fields
                    .iter()
                    .filter(|f| !f.is_blank())
                    .try_fold(h, |h, f| self.structural_hash(f.ty, p + f.offset, h)),
                TypeKind::Any | TypeKind::Interface(_) => {
                    let (tab, data) = self.iface_words(p)?;
                    if tab == 0 {
                        return Ok(h);
                    }
                    let dyn_ty = self.dynamic_type(tab)?;
                    if pool.alg_type(dyn_ty) == AlgKind::NoEq {
                        return Err(unhashable(&self.session.type_name(dyn_ty)));
                    }
                    Ok(C1.wrapping_mul(self.structural_hash(dyn_ty, data, h ^ C0)?))
                }
                _ => match pool.alg_type(ty) {
                    AlgKind::Float32 => self.f32hash(p, h),
                    AlgKind::Float64 => self.f64hash(p, h),
                    AlgKind::Complex64 => {
                        let h = self.f32hash(p, h)?;
                        self.f32hash(p + 4, h)
                    }
                    AlgKind::Complex128 => {
                        let h = self.f64hash(p, h)?;
                        self.f64hash(p + 8, h)
                    }
                    AlgKind::String => self.strhash(p, h),
                    AlgKind::NoEq => Err(unhashable(&self.session.type_name(ty))),
                    _ => self.memhash(p, pool.size(ty), h),
                },
            }
        })
    }
}
