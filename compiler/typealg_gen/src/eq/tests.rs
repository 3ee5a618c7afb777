use pretty_assertions::assert_eq;
use typealg_types::Idx;

use crate::dump;
use crate::test_helpers::Fixture;
use crate::{AlgError, AlgorithmKind, Purpose};

fn eq_text(fx: &Fixture, ty: Idx) -> String {
    let session = fx.session();
    let func = session.eq_func(ty).unwrap_or_else(|e| panic!("{e}"));
    dump::function(&func, &fx.pool, &fx.interner)
}

// ── Arrays ──────────────────────────────────────────────────

#[test]
fn string_array_checks_every_length_before_any_contents() {
    let mut fx = Fixture::new();
    let ty = fx.pool.array(Idx::STRING, 4);

    assert_eq!(
        eq_text(&fx, ty),
        "\
func .eq.[4]string(p *[4]string, q *[4]string) (r bool) {
    var i int
    if len(p[0]) == len(q[0]) {} else { goto neq }
    if len(p[1]) == len(q[1]) {} else { goto neq }
    if len(p[2]) == len(q[2]) {} else { goto neq }
    if len(p[3]) == len(q[3]) {} else { goto neq }
    for i = 0; i < 4; {
        if runtime.memequal(p[i].ptr, q[i].ptr, len(p[i])) {} else { goto neq }
        i = i + 1
    }
    r = true
ret:
    return
neq:
    r = false
    goto ret
}
"
    );
}

#[test]
fn float_array_unrolls_by_two_with_tail() {
    let mut fx = Fixture::new();
    let ty = fx.pool.array(Idx::FLOAT64, 5);

    assert_eq!(
        eq_text(&fx, ty),
        "\
func .eq.[5]float64(p *[5]float64, q *[5]float64) (r bool) {
    var i int
    for i = 0; i < 4; {
        if p[i] == q[i] {} else { goto neq }
        i = i + 1
        if p[i] == q[i] {} else { goto neq }
        i = i + 1
    }
    r = p[4] == q[4]
ret:
    return
neq:
    r = false
    return
}
"
    );
}

#[test]
fn single_iteration_is_straight_line() {
    let mut fx = Fixture::new();
    let ty = fx.pool.array(Idx::FLOAT32, 3);

    assert_eq!(
        eq_text(&fx, ty),
        "\
func .eq.[3]float32(p *[3]float32, q *[3]float32) (r bool) {
    if p[0] == q[0] {} else { goto neq }
    if p[1] == q[1] {} else { goto neq }
    r = p[2] == q[2]
ret:
    return
neq:
    r = false
    return
}
"
    );
}

#[test]
fn struct_array_splits_cheap_checks_from_calls() {
    let mut fx = Fixture::new();
    let elem = fx.named_struct("P", &[("n", Idx::INT32), ("s", Idx::STRING)]);
    let ty = fx.pool.array(elem, 4);

    assert_eq!(
        eq_text(&fx, ty),
        "\
func .eq.[4]P(p *[4]P, q *[4]P) (r bool) {
    var i int
    if p[0].n == q[0].n && len(p[0].s) == len(q[0].s) {} else { goto neq }
    if p[1].n == q[1].n && len(p[1].s) == len(q[1].s) {} else { goto neq }
    if p[2].n == q[2].n && len(p[2].s) == len(q[2].s) {} else { goto neq }
    if p[3].n == q[3].n && len(p[3].s) == len(q[3].s) {} else { goto neq }
    for i = 0; i < 4; {
        if runtime.memequal(p[i].s.ptr, q[i].s.ptr, len(p[i].s)) {} else { goto neq }
        i = i + 1
        if runtime.memequal(p[i].s.ptr, q[i].s.ptr, len(p[i].s)) {} else { goto neq }
        i = i + 1
    }
    r = true
ret:
    return
neq:
    r = false
    goto ret
}
"
    );
}

#[test]
fn panicking_struct_array_compares_whole_elements() {
    let mut fx = Fixture::new();
    let elem = fx.named_struct("E", &[("e", Idx::ANY), ("n", Idx::INT32)]);
    let ty = fx.pool.array(elem, 2);

    assert_eq!(
        eq_text(&fx, ty),
        "\
func .eq.[2]E(p *[2]E, q *[2]E) (r bool) {
    var i int
    for i = 0; i < 2; {
        if .eq.E(&p[i], &q[i]) {} else { goto neq }
        i = i + 1
    }
    r = true
ret:
    return
neq:
    r = false
    goto ret
}
"
    );
}

// ── Structs ─────────────────────────────────────────────────

#[test]
fn calls_move_behind_cheap_checks() {
    let mut fx = Fixture::new();
    let ty = fx.named_struct("S", &[("s", Idx::STRING), ("a", Idx::INT64)]);

    assert_eq!(
        eq_text(&fx, ty),
        "\
func .eq.S(p *S, q *S) (r bool) {
    if len(p.s) == len(q.s) {} else { goto neq }
    if p.a == q.a {} else { goto neq }
    r = runtime.memequal(p.s.ptr, q.s.ptr, len(p.s))
ret:
    return
neq:
    r = false
    goto ret
}
"
    );
}

#[test]
fn panicking_field_pins_the_order() {
    let mut fx = Fixture::new();
    let ty = fx.named_struct(
        "S",
        &[("a", Idx::INT32), ("e", Idx::ANY), ("b", Idx::INT32), ("s", Idx::STRING)],
    );

    assert_eq!(
        eq_text(&fx, ty),
        "\
func .eq.S(p *S, q *S) (r bool) {
    if p.a == q.a {} else { goto neq }
    if runtime.nilinterequal(&p.e, &q.e) {} else { goto neq }
    if p.b == q.b {} else { goto neq }
    if len(p.s) == len(q.s) {} else { goto neq }
    r = runtime.memequal(p.s.ptr, q.s.ptr, len(p.s))
ret:
    return
neq:
    r = false
    goto ret
}
"
    );
}

#[test]
fn expensive_run_uses_memequal() {
    let mut fx = Fixture::new();
    let words = fx.pool.array(Idx::INT64, 5);
    let ty = fx.named_struct("L", &[("a", words), ("s", Idx::STRING)]);

    let text = eq_text(&fx, ty);
    assert!(text.contains("if runtime.memequal(&p.a, &q.a, 40) {} else { goto neq }"), "{text}");
}

#[test]
fn cheap_run_compares_field_by_field() {
    let mut fx = Fixture::new();
    let ty = fx.named_struct(
        "C",
        &[("a", Idx::INT32), ("b", Idx::INT32), ("x", Idx::FLOAT64)],
    );

    assert_eq!(
        eq_text(&fx, ty),
        "\
func .eq.C(p *C, q *C) (r bool) {
    if p.a == q.a {} else { goto neq }
    if p.b == q.b {} else { goto neq }
    r = p.x == q.x
ret:
    return
neq:
    r = false
    return
}
"
    );
}

#[test]
fn all_blank_struct_is_always_equal() {
    let mut fx = Fixture::new();
    let ty = fx.named_struct("B", &[("_", Idx::INT32), ("_", Idx::STRING)]);

    assert_eq!(
        eq_text(&fx, ty),
        "\
func .eq.B(p *B, q *B) (r bool) {
    r = true
ret:
    return
neq:
    r = false
    return
}
"
    );
}

#[test]
fn uncomparable_struct_is_never_synthesized() {
    let mut fx = Fixture::new();
    let slice = fx.pool.slice(Idx::INT32);
    let ty = fx.named_struct("N", &[("a", Idx::INT32), ("xs", slice)]);
    let session = fx.session();

    assert_eq!(session.eq_closure(ty).map(|c| c.is_none()), Ok(true));
    assert_eq!(
        session.eq_func(ty).map(|_| ()),
        Err(AlgError::NotCustom {
            ty: "N".to_owned(),
            purpose: Purpose::Equal,
            kind: AlgorithmKind::NoEquality,
        })
    );
}

#[test]
fn scalar_is_not_an_aggregate() {
    let fx = Fixture::new();
    let session = fx.session();

    assert_eq!(
        session.eq_func(Idx::STRING).map(|_| ()),
        Err(AlgError::NotAggregate {
            ty: "string".to_owned(),
            purpose: Purpose::Equal,
        })
    );
}
