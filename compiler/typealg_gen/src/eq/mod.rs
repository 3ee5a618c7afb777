//! Equality function synthesis.
//!
//! Every generated body shares one failure label:
//!
//! ```text
//! func .eq.T(p, q *T) (r bool) {
//!     if cond_0 {} else { goto neq }
//!     ...
//!     r = cond_n
//! ret:
//!     return
//! neq:
//!     r = false
//!     return          // or `goto ret`, see below
//! }
//! ```
//!
//! The failure tail jumps back to the shared `return` when the comparison
//! can panic or the body calls anything; otherwise it returns directly.
//! Either choice is correct, the split only affects code size.

use tracing::debug;
use typealg_ir::Name;
use typealg_types::{Idx, TypeKind};

use crate::ir::{any_call, Expr, FuncFlags, FunctionBuilder, GeneratedFunction, LocalTy, Stmt};
use crate::{AlgError, AlgSession, Purpose};

mod conds;
mod unroll;

use conds::{element_eq, flatten_struct_conds, string_conds};
use unroll::ArrayChecks;

pub(crate) fn synthesize(
    session: &AlgSession<'_>,
    ty: Idx,
    name: Name,
) -> Result<GeneratedFunction, AlgError> {
    let pool = session.pool();
    let mut b = FunctionBuilder::new();
    let p = b.param("p", LocalTy::Ptr(ty));
    let q = b.param("q", LocalTy::Ptr(ty));
    let r = b.local("r", LocalTy::Bool);
    let neq = b.label("neq");
    let ret = b.label("ret");

    match *pool.kind(ty) {
        TypeKind::Array { elem, len } => {
            let mut checks = ArrayChecks::new(&mut b, p, q, r, neq, ty, elem, len);
            emit_array(session, &mut checks)?;
        }
        TypeKind::Struct { .. } => {
            let flat = flatten_struct_conds(session, ty, &Expr::deref(p, ty), &Expr::deref(q, ty))?;
            match flat.conds.split_last() {
                None => b.push(Stmt::assign(r, Expr::Bool(true))),
                Some((last, rest)) => {
                    for cond in rest {
                        b.push(Stmt::guard(cond.clone(), neq));
                    }
                    b.push(Stmt::assign(r, last.clone()));
                }
            }
        }
        _ => {
            return Err(session.fail(AlgError::NotAggregate {
                ty: session.type_name(ty),
                purpose: Purpose::Equal,
            }))
        }
    }

    // ret:
    //   return
    b.push(Stmt::Label(ret));
    b.push(Stmt::Return(None));

    // neq:
    //   r = false
    //   return (or goto ret)
    b.push(Stmt::Label(neq));
    b.push(Stmt::assign(r, Expr::Bool(false)));
    if pool.eq_can_panic(ty) || any_call(b.body()) {
        b.push(Stmt::Goto(ret));
    } else {
        b.push(Stmt::Return(None));
    }

    Ok(b.finish(
        name,
        ty,
        Purpose::Equal,
        Some(r),
        FuncFlags::NOINLINE | FuncFlags::DUPOK | FuncFlags::NIL_CHECK_DISABLED,
    ))
}

fn emit_array(session: &AlgSession<'_>, checks: &mut ArrayChecks<'_>) -> Result<(), AlgError> {
    let pool = session.pool();
    let elem = checks.elem;

    match pool.kind(elem) {
        TypeKind::String => {
            // All lengths first, contents only once every length matched.
            checks.check_all(3, false, |pi, qi| Ok(string_conds(pi, qi).0))?;
            checks.check_all(1, true, |pi, qi| Ok(string_conds(pi, qi).1))?;
        }
        TypeKind::Float32 | TypeKind::Float64 => {
            checks.check_all(2, true, |pi, qi| Ok(Expr::eq(pi, qi)))?;
        }
        TypeKind::Struct { .. } => {
            let (p0, q0) = checks.elements(&Expr::Const(0));
            let elem_conds = flatten_struct_conds(session, elem, &p0, &q0)?;
            let has_calls = elem_conds.conds.iter().any(Expr::is_call);
            let all_calls = elem_conds.conds.iter().all(Expr::is_call);

            if !has_calls || all_calls || elem_conds.can_panic {
                checks.check_all(1, true, |pi, qi| element_eq(session, pi, qi, elem))?;
            } else {
                debug!(elem = %session.type_name(elem), "splitting struct array comparison");
                // Cheap conditions for every element, then the calls.
                checks.check_all(4, false, |pi, qi| {
                    let flat = flatten_struct_conds(session, elem, &pi, &qi)?;
                    let cheap = flat
                        .conds
                        .into_iter()
                        .filter(|c| !c.is_call())
                        .fold(None, |acc, c| Some(Expr::and(acc, c)));
                    Ok(cheap.unwrap_or(Expr::Bool(true)))
                })?;
                checks.check_all(2, true, |pi, qi| {
                    let flat = flatten_struct_conds(session, elem, &pi, &qi)?;
                    let calls = flat
                        .conds
                        .into_iter()
                        .filter(Expr::is_call)
                        .fold(None, |acc, c| Some(Expr::and(acc, c)));
                    Ok(calls.unwrap_or(Expr::Bool(true)))
                })?;
            }
        }
        _ => {
            checks.check_all(1, true, |pi, qi| element_eq(session, pi, qi, elem))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests;
