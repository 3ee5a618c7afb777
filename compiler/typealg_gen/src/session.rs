//! The synthesis session: entry point and owner of every cache.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use rayon::prelude::*;
use rustc_hash::FxBuildHasher;
use tracing::{debug, error, trace};
use typealg_ir::{Name, StringInterner};
use typealg_stack::ensure_sufficient_stack;
use typealg_types::{AlgKind, Idx, Pool, TypeFlags};

use crate::closure::{function_symbol, type_symbol, varlen_symbol};
use crate::ir::{Callee, GeneratedFunction};
use crate::registry::{self, RuntimeFn};
use crate::{classify, dump, eq, hash, AlgError, AlgorithmKind, Closure, ClosureKey, OnceMap, Purpose};

type FunctionResult = Result<Arc<GeneratedFunction>, AlgError>;
type ClosureResult = Result<Arc<Closure>, AlgError>;

/// Hash and equality closures for one type. Both are `None` for a type
/// without equality.
#[derive(Clone, Debug)]
pub struct TypeAlgs {
    pub ty: Idx,
    pub hash: Option<Arc<Closure>>,
    pub eq: Option<Arc<Closure>>,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Functions synthesized (each at most once per type and purpose).
    pub functions: usize,
    /// Distinct closure keys requested.
    pub closures: usize,
}

/// One compilation's worth of generated algorithms.
///
/// Borrows an immutable type pool and interner and owns the memo tables.
/// The session is `Sync`: any number of tasks may request closures at once,
/// and each (type, purpose) is still synthesized at most once.
pub struct AlgSession<'a> {
    pool: &'a Pool,
    interner: &'a StringInterner,
    functions: OnceMap<(Idx, Purpose), FunctionResult>,
    closures: OnceMap<ClosureKey, ClosureResult>,
    symbols: DashMap<Name, Arc<GeneratedFunction>, FxBuildHasher>,
    synthesized: AtomicUsize,
}

impl<'a> AlgSession<'a> {
    pub fn new(pool: &'a Pool, interner: &'a StringInterner) -> Self {
        AlgSession {
            pool,
            interner,
            functions: OnceMap::new(),
            closures: OnceMap::new(),
            symbols: DashMap::with_hasher(FxBuildHasher),
            synthesized: AtomicUsize::new(0),
        }
    }

    #[inline]
    pub fn pool(&self) -> &'a Pool {
        self.pool
    }

    #[inline]
    pub fn interner(&self) -> &'a StringInterner {
        self.interner
    }

    pub fn classify(&self, ty: Idx) -> AlgorithmKind {
        classify(self.pool, ty)
    }

    /// Rendered type, as used in symbol names and errors.
    pub fn type_name(&self, ty: Idx) -> String {
        self.pool.format_type(ty, self.interner)
    }

    // ── Closures ────────────────────────────────────────────────────

    /// Closure hashing values of `ty`.
    ///
    /// Asking for the hash of a type without equality is an error.
    pub fn hash_closure(&self, ty: Idx) -> Result<Arc<Closure>, AlgError> {
        match self.classify(ty) {
            AlgorithmKind::NoEquality => Err(self.fail(AlgError::NoHash {
                ty: self.type_name(ty),
            })),
            AlgorithmKind::Custom => {
                let key = ClosureKey::Type {
                    ty,
                    purpose: Purpose::Hash,
                };
                self.closures.get_or_create(key, || {
                    self.pregenerate_hash_closures(ty)?;
                    let func = self.hash_func(ty)?;
                    Ok(self.wrap_function(ty, &func))
                })
            }
            kind => self.primitive_closure(ty, kind, Purpose::Hash),
        }
    }

    /// Closure comparing values of `ty`, or `None` if `ty` has no equality.
    pub fn eq_closure(&self, ty: Idx) -> Result<Option<Arc<Closure>>, AlgError> {
        match self.classify(ty) {
            AlgorithmKind::NoEquality => Ok(None),
            AlgorithmKind::Custom => {
                let key = ClosureKey::Type {
                    ty,
                    purpose: Purpose::Equal,
                };
                self.closures
                    .get_or_create(key, || {
                        let func = self.eq_func(ty)?;
                        Ok(self.wrap_function(ty, &func))
                    })
                    .map(Some)
            }
            kind => self.primitive_closure(ty, kind, Purpose::Equal).map(Some),
        }
    }

    /// Hash closures of the field or element types. They are cheap and
    /// deduplicated, and an unused one is dropped by the linker.
    fn pregenerate_hash_closures(&self, ty: Idx) -> Result<(), AlgError> {
        if let Some((elem, _)) = self.pool.array_elem(ty) {
            self.hash_closure(elem)?;
        }
        for field in self.pool.fields(ty) {
            self.hash_closure(field.ty)?;
        }
        Ok(())
    }

    fn wrap_function(&self, ty: Idx, func: &GeneratedFunction) -> Arc<Closure> {
        let symbol = self
            .interner
            .intern_owned(type_symbol(func.purpose, &self.type_name(ty)));
        let closure = Closure::new(
            symbol,
            Callee::Generated(func.name),
            None,
            self.pool.target().ptr_size,
        );
        debug!(symbol = %self.interner.lookup(symbol), "closure over generated function");
        Arc::new(closure)
    }

    fn primitive_closure(
        &self,
        ty: Idx,
        kind: AlgorithmKind,
        purpose: Purpose,
    ) -> Result<Arc<Closure>, AlgError> {
        let Some(prim) = registry::lookup(kind, purpose) else {
            return Err(self.fail(AlgError::NoHash {
                ty: self.type_name(ty),
            }));
        };
        let ptr_size = self.pool.target().ptr_size;

        if prim.sized {
            let size = self.pool.size(ty);
            let key = ClosureKey::VarLen { purpose, size };
            return self.closures.get_or_create(key, || {
                let symbol = self.interner.intern_owned(varlen_symbol(purpose, size));
                debug!(symbol = %self.interner.lookup(symbol), size, "variable-length closure");
                Ok(Arc::new(Closure::new(
                    symbol,
                    Callee::Runtime(prim.func),
                    Some(size),
                    ptr_size,
                )))
            });
        }

        self.closures
            .get_or_create(ClosureKey::Runtime(prim.func), || {
                let symbol = self.interner.intern_owned(prim.func.closure_symbol());
                Ok(Arc::new(Closure::new(
                    symbol,
                    Callee::Runtime(prim.func),
                    None,
                    ptr_size,
                )))
            })
    }

    // ── Functions ───────────────────────────────────────────────────

    /// Generated hash function for a struct or array type.
    pub fn hash_func(&self, ty: Idx) -> Result<Arc<GeneratedFunction>, AlgError> {
        self.generated(ty, Purpose::Hash)
    }

    /// Generated equality function for a struct or array type.
    pub fn eq_func(&self, ty: Idx) -> Result<Arc<GeneratedFunction>, AlgError> {
        self.generated(ty, Purpose::Equal)
    }

    fn generated(&self, ty: Idx, purpose: Purpose) -> Result<Arc<GeneratedFunction>, AlgError> {
        self.functions.get_or_create((ty, purpose), || {
            if !self.pool.flags(ty).contains(TypeFlags::IS_AGGREGATE) {
                return Err(self.fail(AlgError::NotAggregate {
                    ty: self.type_name(ty),
                    purpose,
                }));
            }
            let kind = self.classify(ty);
            if kind != AlgorithmKind::Custom {
                return Err(self.fail(AlgError::NotCustom {
                    ty: self.type_name(ty),
                    purpose,
                    kind,
                }));
            }
            ensure_sufficient_stack(|| {
                let type_name = self.type_name(ty);
                let name = self
                    .interner
                    .intern_owned(function_symbol(purpose, &type_name));
                let func = match purpose {
                    Purpose::Hash => hash::synthesize(self, ty, name)?,
                    Purpose::Equal => eq::synthesize(self, ty, name)?,
                };
                let func = Arc::new(func);

                self.synthesized.fetch_add(1, Ordering::Relaxed);
                self.symbols.insert(name, Arc::clone(&func));
                debug!(
                    name = %self.interner.lookup(name),
                    %purpose,
                    stmts = func.body.len(),
                    "synthesized"
                );
                trace!(
                    "{}",
                    dump::function(&func, self.pool, self.interner)
                );
                Ok(func)
            })
        })
    }

    /// Hash callee for a field or element of type `ty` that is not plain
    /// memory: a runtime primitive for strings, interfaces and floats, the
    /// generated function for aggregates.
    pub fn hash_for(&self, ty: Idx) -> Result<Callee, AlgError> {
        let func = match self.pool.alg_type(ty) {
            AlgKind::Mem => {
                return Err(self.fail(AlgError::HashForMemory {
                    ty: self.type_name(ty),
                }))
            }
            AlgKind::NoEq => {
                return Err(self.fail(AlgError::NoHash {
                    ty: self.type_name(ty),
                }))
            }
            AlgKind::Interface => RuntimeFn::Interhash,
            AlgKind::NilInterface => RuntimeFn::Nilinterhash,
            AlgKind::String => RuntimeFn::Strhash,
            AlgKind::Float32 => RuntimeFn::F32hash,
            AlgKind::Float64 => RuntimeFn::F64hash,
            AlgKind::Complex64 => RuntimeFn::C64hash,
            AlgKind::Complex128 => RuntimeFn::C128hash,
            AlgKind::Special => return Ok(Callee::Generated(self.hash_func(ty)?.name)),
        };
        Ok(Callee::Runtime(func))
    }

    /// Direct equality callee for `ty`, and whether it takes the byte size
    /// as a third argument.
    ///
    /// Plain memory uses `memequal`; aggregates use their generated
    /// function. Other kinds are compared inline and have no callee.
    pub fn eq_for(&self, ty: Idx) -> Result<(Callee, bool), AlgError> {
        match self.pool.alg_type(ty) {
            AlgKind::Mem => Ok((Callee::Runtime(RuntimeFn::Memequal), true)),
            AlgKind::Special => Ok((Callee::Generated(self.eq_func(ty)?.name), false)),
            alg => Err(self.fail(AlgError::NoDirectEq {
                ty: self.type_name(ty),
                alg,
            })),
        }
    }

    // ── Lookup & batch ──────────────────────────────────────────────

    /// Generated function by symbol.
    pub fn function(&self, name: Name) -> Option<Arc<GeneratedFunction>> {
        self.symbols.get(&name).map(|f| Arc::clone(&f))
    }

    /// Every generated function, sorted by symbol.
    pub fn functions(&self) -> Vec<Arc<GeneratedFunction>> {
        let mut funcs: Vec<_> = self.symbols.iter().map(|f| Arc::clone(f.value())).collect();
        funcs.sort_by(|a, b| self.interner.lookup(a.name).cmp(self.interner.lookup(b.name)));
        funcs
    }

    /// Every closure created so far, sorted by symbol.
    pub fn closures(&self) -> Vec<Arc<Closure>> {
        let mut closures: Vec<_> = self.closures.values().into_iter().flatten().collect();
        closures.sort_by(|a, b| {
            self.interner
                .lookup(a.symbol)
                .cmp(self.interner.lookup(b.symbol))
        });
        closures
    }

    /// Hash and equality closures for every type, computed in parallel.
    /// Results are in input order.
    pub fn generate_all(&self, types: &[Idx]) -> Vec<Result<TypeAlgs, AlgError>> {
        types.par_iter().map(|&ty| self.algs_for(ty)).collect()
    }

    fn algs_for(&self, ty: Idx) -> Result<TypeAlgs, AlgError> {
        if self.classify(ty) == AlgorithmKind::NoEquality {
            return Ok(TypeAlgs {
                ty,
                hash: None,
                eq: None,
            });
        }
        Ok(TypeAlgs {
            ty,
            hash: Some(self.hash_closure(ty)?),
            eq: self.eq_closure(ty)?,
        })
    }

    pub fn stats(&self) -> SessionStats {
        SessionStats {
            functions: self.synthesized.load(Ordering::Relaxed),
            closures: self.closures.len(),
        }
    }

    /// Log an internal-consistency violation where it happens.
    pub(crate) fn fail(&self, err: AlgError) -> AlgError {
        error!(%err, "internal consistency violation");
        err
    }
}

#[cfg(test)]
mod tests;
