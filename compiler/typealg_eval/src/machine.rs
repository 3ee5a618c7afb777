//! The evaluation context.

use tracing::trace;
use typealg_gen::{AlgSession, Callee, Closure, Contract};
use typealg_ir::Name;
use typealg_types::{Idx, Pool};

use crate::errors::{uncomparable, EvalError, EvalResult};
use crate::Memory;

/// Memory plus the session whose artifacts it runs.
pub struct Machine<'s> {
    pub(crate) session: &'s AlgSession<'s>,
    pub(crate) pool: &'s Pool,
    pub(crate) mem: Memory,
    pub(crate) ptr_size: u64,
}

impl<'s> Machine<'s> {
    pub fn new(session: &'s AlgSession<'s>) -> Self {
        let pool = session.pool();
        Machine {
            session,
            pool,
            mem: Memory::new(),
            ptr_size: pool.target().ptr_size,
        }
    }

    pub fn session(&self) -> &'s AlgSession<'s> {
        self.session
    }

    pub fn memory(&self) -> &Memory {
        &self.mem
    }

    /// Hash the value of type `ty` at `p` through its hash closure.
    pub fn hash(&self, ty: Idx, p: u64, seed: u64) -> EvalResult<u64> {
        let closure = self.session.hash_closure(ty)?;
        self.call_closure(&closure, &[p, seed])
    }

    /// Compare the values of type `ty` at `p` and `q` through their
    /// equality closure.
    pub fn equal(&self, ty: Idx, p: u64, q: u64) -> EvalResult<bool> {
        match self.session.eq_closure(ty)? {
            Some(closure) => Ok(self.call_closure(&closure, &[p, q])? != 0),
            None => Err(uncomparable(&self.session.type_name(ty))),
        }
    }

    /// Invoke a closure with the arguments of its contract, minus the
    /// size payload (which comes from the record).
    pub fn call_closure(&self, closure: &Closure, args: &[u64]) -> EvalResult<u64> {
        let (Callee::Runtime(func), Some(size)) = (closure.target, closure.payload) else {
            return self.call(closure.target, args);
        };
        match (func.contract(), args) {
            (Contract::HashSized, &[p, h]) => self.call_runtime(func, &[p, size, h]),
            (Contract::EqualSized, &[p, q]) => self.call_runtime(func, &[p, q, size]),
            _ => Err(EvalError::Malformed(format!(
                "closure over {func} cannot carry a size"
            ))),
        }
    }

    pub(crate) fn call(&self, callee: Callee, args: &[u64]) -> EvalResult<u64> {
        match callee {
            Callee::Runtime(func) => {
                trace!(%func, ?args, "runtime call");
                self.call_runtime(func, args)
            }
            Callee::Generated(name) => self.call_generated(name, args),
        }
    }

    /// Run the generated function `name` on raw argument words.
    pub fn call_generated(&self, name: Name, args: &[u64]) -> EvalResult<u64> {
        let func = self.session.function(name).ok_or_else(|| {
            EvalError::UnknownFunction(self.session.interner().lookup(name).to_owned())
        })?;
        trace!(name = %self.session.interner().lookup(name), ?args, "call");
        self.run(&func, args)
    }

    /// Dynamic type recorded in an interface type word.
    pub(crate) fn dynamic_type(&self, tab: u64) -> EvalResult<Idx> {
        tab.checked_sub(1)
            .and_then(|raw| u32::try_from(raw).ok())
            .map(Idx::from_raw)
            .filter(|ty| ty.is_primitive() || ty.raw() >= Idx::FIRST_DYNAMIC)
            .ok_or_else(|| EvalError::Malformed(format!("bad interface type word {tab:#x}")))
    }

    /// Type word stored in an interface holding a `ty`.
    pub(crate) fn type_word(ty: Idx) -> u64 {
        u64::from(ty.raw()) + 1
    }
}
