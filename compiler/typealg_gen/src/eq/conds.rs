//! Per-field and per-element equality conditions.

use smallvec::SmallVec;
use typealg_types::{AlgKind, Idx, MAX_INLINE_COMPARE_COST};

use crate::ir::Expr;
use crate::registry::RuntimeFn;
use crate::{AlgError, AlgSession, Callee};

/// Flattened equality conditions of a struct.
pub(super) struct StructConds {
    /// Conditions in evaluation order; all must hold.
    pub conds: SmallVec<[Expr; 8]>,
    /// Some field comparison can panic, so the order was pinned around it.
    pub can_panic: bool,
}

/// `len(p) == len(q)` and `memequal(p.ptr, q.ptr, len(p))` for two string
/// places. The second must only run once the first holds.
pub(super) fn string_conds(p: Expr, q: Expr) -> (Expr, Expr) {
    let len_eq = Expr::eq(Expr::StrLen(Box::new(p.clone())), Expr::StrLen(Box::new(q.clone())));
    let mem_eq = Expr::call(
        Callee::Runtime(RuntimeFn::Memequal),
        vec![
            Expr::StrPtr(Box::new(p.clone())),
            Expr::StrPtr(Box::new(q)),
            Expr::StrLen(Box::new(p)),
        ],
    );
    (len_eq, mem_eq)
}

/// Condition that two places of type `ty` hold equal values.
pub(super) fn element_eq(
    session: &AlgSession<'_>,
    p: Expr,
    q: Expr,
    ty: Idx,
) -> Result<Expr, AlgError> {
    let runtime = |func: RuntimeFn, p: Expr, q: Expr| {
        Expr::call(Callee::Runtime(func), vec![Expr::addr_of(p), Expr::addr_of(q)])
    };

    match session.pool().alg_type(ty) {
        AlgKind::Mem
        | AlgKind::Float32
        | AlgKind::Float64
        | AlgKind::Complex64
        | AlgKind::Complex128 => Ok(Expr::eq(p, q)),
        AlgKind::String => {
            let (len_eq, mem_eq) = string_conds(p, q);
            Ok(Expr::and(Some(len_eq), mem_eq))
        }
        AlgKind::Interface => Ok(runtime(RuntimeFn::Interequal, p, q)),
        AlgKind::NilInterface => Ok(runtime(RuntimeFn::Nilinterequal, p, q)),
        AlgKind::Special => {
            let (callee, _) = session.eq_for(ty)?;
            Ok(Expr::call(callee, vec![Expr::addr_of(p), Expr::addr_of(q)]))
        }
        AlgKind::NoEq => Err(session.fail(AlgError::Uncomparable {
            ty: session.type_name(ty),
        })),
    }
}

/// Equality conditions for struct `ty` between places `p` and `q`.
///
/// Conditions form ordering groups. A field whose comparison can panic
/// sits alone in its own group, so nothing is moved across it. Inside a
/// group, non-call conditions are stably moved ahead of calls.
pub(super) fn flatten_struct_conds(
    session: &AlgSession<'_>,
    ty: Idx,
    p: &Expr,
    q: &Expr,
) -> Result<StructConds, AlgError> {
    let pool = session.pool();
    let fields = pool.fields(ty);
    let field = |base: &Expr, i: usize| Expr::field(base.clone(), ty, i);

    let mut groups: SmallVec<[SmallVec<[Expr; 4]>; 2]> = SmallVec::new();
    groups.push(SmallVec::new());
    let and = |groups: &mut SmallVec<[SmallVec<[Expr; 4]>; 2]>, cond: Expr| {
        if let Some(group) = groups.last_mut() {
            group.push(cond);
        }
    };

    let mut i = 0;
    while i < fields.len() {
        let f = &fields[i];
        if f.is_blank() {
            i += 1;
            continue;
        }

        if !pool.is_regular_memory(f.ty) {
            let panics = pool.eq_can_panic(f.ty);
            if panics {
                groups.push(SmallVec::new());
            }
            if pool.is_string(f.ty) {
                let (len_eq, mem_eq) = string_conds(field(p, i), field(q, i));
                and(&mut groups, len_eq);
                and(&mut groups, mem_eq);
            } else {
                and(&mut groups, element_eq(session, field(p, i), field(q, i), f.ty)?);
            }
            if panics {
                groups.push(SmallVec::new());
            }
            i += 1;
            continue;
        }

        let cost = pool.eq_field_cost(ty, i);
        if cost.cost <= MAX_INLINE_COMPARE_COST {
            for j in i..cost.next {
                and(&mut groups, Expr::eq(field(p, j), field(q, j)));
            }
        } else {
            let call = Expr::call(
                Callee::Runtime(RuntimeFn::Memequal),
                vec![
                    Expr::addr_of(field(p, i)),
                    Expr::addr_of(field(q, i)),
                    Expr::Const(cost.size),
                ],
            );
            and(&mut groups, call);
        }
        i = cost.next;
    }

    let can_panic = groups.len() > 1;
    let mut conds = SmallVec::new();
    for mut group in groups {
        group.sort_by_key(Expr::is_call);
        conds.extend(group);
    }
    Ok(StructConds { conds, can_panic })
}
