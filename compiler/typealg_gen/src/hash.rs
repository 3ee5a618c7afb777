//! Hash function synthesis.
//!
//! ```text
//! func .hash.[N]T(p *[N]T, h uintptr) uintptr {
//!     for i = 0; i < N; i = i + 1 {
//!         h = hashel(&p[i], h)
//!     }
//!     return h
//! }
//!
//! func .hash.struct{...}(p *struct{...}, h uintptr) uintptr {
//!     h = hashfor(f)(&p.f, h)            // non-memory field
//!     h = runtime.memhash(&p.a, size, h)  // run of memory fields a..
//!     return h
//! }
//! ```
//!
//! Blank fields contribute nothing. Runs of plain-memory fields are hashed
//! with one `memhash` call each.

use typealg_ir::Name;
use typealg_types::{Idx, TypeKind};

use crate::ir::{BinaryOp, Expr, FuncFlags, FunctionBuilder, GeneratedFunction, LocalTy, Stmt};
use crate::registry::RuntimeFn;
use crate::{AlgError, AlgSession, Callee, Purpose};

pub(crate) fn synthesize(
    session: &AlgSession<'_>,
    ty: Idx,
    name: Name,
) -> Result<GeneratedFunction, AlgError> {
    let pool = session.pool();
    let mut b = FunctionBuilder::new();
    let p = b.param("p", LocalTy::Ptr(ty));
    let h = b.param("h", LocalTy::Uintptr);

    match pool.kind(ty) {
        TypeKind::Array { elem, len } => {
            let (elem, len) = (*elem, *len);
            let hashel = session.hash_for(elem)?;
            let i = b.local("i", LocalTy::Int);

            // h = hashel(&p[i], h)
            let element = Expr::index(Expr::deref(p, ty), Expr::Local(i), elem);
            let call = Expr::call(hashel, vec![Expr::addr_of(element), Expr::Local(h)]);

            b.push(Stmt::For {
                init: Some(Box::new(Stmt::assign(i, Expr::Const(0)))),
                cond: Expr::binary(BinaryOp::Lt, Expr::Local(i), Expr::Const(len)),
                post: Some(Box::new(Stmt::assign(
                    i,
                    Expr::binary(BinaryOp::Add, Expr::Local(i), Expr::Const(1)),
                ))),
                body: vec![Stmt::assign(h, call)],
            });
        }
        TypeKind::Struct { fields, .. } => {
            let mut i = 0;
            while i < fields.len() {
                let field = &fields[i];
                if field.is_blank() {
                    i += 1;
                    continue;
                }

                let place = Expr::addr_of(Expr::field(Expr::deref(p, ty), ty, i));

                if !pool.is_regular_memory(field.ty) {
                    // h = hashfor(f)(&p.f, h)
                    let hashf = session.hash_for(field.ty)?;
                    b.push(Stmt::assign(
                        h,
                        Expr::call(hashf, vec![place, Expr::Local(h)]),
                    ));
                    i += 1;
                    continue;
                }

                // h = memhash(&p.f, size, h)
                let run = pool.memrun(ty, i);
                b.push(Stmt::assign(
                    h,
                    Expr::call(
                        Callee::Runtime(RuntimeFn::Memhash),
                        vec![place, Expr::Const(run.size), Expr::Local(h)],
                    ),
                ));
                i = run.next;
            }
        }
        _ => {
            return Err(session.fail(AlgError::NotAggregate {
                ty: session.type_name(ty),
                purpose: Purpose::Hash,
            }))
        }
    }

    b.push(Stmt::Return(Some(Expr::Local(h))));

    Ok(b.finish(
        name,
        ty,
        Purpose::Hash,
        None,
        FuncFlags::NOINLINE | FuncFlags::DUPOK | FuncFlags::NIL_CHECK_DISABLED,
    ))
}
