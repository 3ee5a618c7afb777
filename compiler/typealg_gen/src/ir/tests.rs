use pretty_assertions::assert_eq;
use typealg_types::Idx;

use super::*;

fn memequal_call() -> Expr {
    Expr::call(
        Callee::Runtime(RuntimeFn::Memequal),
        vec![Expr::Const(0), Expr::Const(0), Expr::Const(8)],
    )
}

#[test]
fn call_detection_is_shallow_for_is_call() {
    let nested = Expr::and(Some(Expr::Bool(true)), memequal_call());
    assert!(!nested.is_call());
    assert!(nested.contains_call());
    assert!(memequal_call().is_call());
}

#[test]
fn and_without_lhs_is_rhs() {
    assert_eq!(Expr::and(None, Expr::Bool(false)), Expr::Bool(false));
}

#[test]
fn guard_jumps_on_false() {
    let label = LabelId::new(0);
    let stmt = Stmt::guard(Expr::Bool(true), label);
    assert_eq!(
        stmt,
        Stmt::If {
            cond: Expr::Bool(true),
            then_body: vec![],
            else_body: vec![Stmt::Goto(label)],
        }
    );
    assert!(!stmt.contains_call());
}

#[test]
fn calls_found_inside_loops() {
    let i = LocalId::new(0);
    let body = vec![Stmt::For {
        init: Some(Box::new(Stmt::assign(i, Expr::Const(0)))),
        cond: Expr::binary(BinaryOp::Lt, Expr::Local(i), Expr::Const(4)),
        post: None,
        body: vec![Stmt::guard(memequal_call(), LabelId::new(0))],
    }];
    assert!(any_call(&body));
}

#[test]
fn builder_orders_params_first() {
    let mut b = FunctionBuilder::new();
    let p = b.param("p", LocalTy::Ptr(Idx::STRING));
    let h = b.param("h", LocalTy::Uintptr);
    let i = b.local("i", LocalTy::Int);
    b.push(Stmt::Return(Some(Expr::Local(h))));
    let f = b.finish(
        typealg_ir::Name::EMPTY,
        Idx::STRING,
        crate::Purpose::Hash,
        None,
        FuncFlags::DUPOK,
    );
    assert_eq!((p.raw(), h.raw(), i.raw()), (0, 1, 2));
    assert_eq!(f.params, 2);
    assert_eq!(f.param_ids().collect::<Vec<_>>(), vec![p, h]);
    assert_eq!(f.local(i).name, "i");
}
