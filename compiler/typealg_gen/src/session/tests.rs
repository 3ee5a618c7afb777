use std::sync::Arc;

use pretty_assertions::assert_eq;
use rayon::prelude::*;
use typealg_types::{AlgKind, Idx};

use crate::registry::RuntimeFn;
use crate::test_helpers::Fixture;
use crate::{
    AlgError, AlgorithmKind, Callee, ClosureKey, DataFlags, MemWidth, Purpose, SessionStats,
};

// ── Primitive closures ──────────────────────────────────────

#[test]
fn fixed_width_types_share_one_runtime_closure() {
    let fx = Fixture::new();
    let session = fx.session();

    let int = session.hash_closure(Idx::INT32).unwrap_or_else(|e| panic!("{e}"));
    let uint = session.hash_closure(Idx::UINT32).unwrap_or_else(|e| panic!("{e}"));

    assert!(Arc::ptr_eq(&int, &uint));
    assert_eq!(fx.name(int.symbol), "runtime.memhash32·f");
    assert_eq!(int.target, Callee::Runtime(RuntimeFn::Memhash32));
    assert_eq!(int.payload, None);
    assert_eq!(int.size, 8);
    assert_eq!(int.flags, DataFlags::DUPOK | DataFlags::RODATA);
}

#[test]
fn same_sized_unrelated_types_share_a_varlen_closure() {
    let mut fx = Fixture::new();
    let bytes = fx.pool.array(Idx::UINT8, 9);
    let blob = fx.pool.opaque(9, 1);
    let session = fx.session();

    let a = session.hash_closure(bytes).unwrap_or_else(|e| panic!("{e}"));
    let b = session.hash_closure(blob).unwrap_or_else(|e| panic!("{e}"));
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(fx.name(a.symbol), ".hashfunc9");
    assert_eq!(a.target, Callee::Runtime(RuntimeFn::MemhashVarlen));
    assert_eq!(a.payload, Some(9));
    assert_eq!(a.size, 16);

    let eq = session
        .eq_closure(bytes)
        .unwrap_or_else(|e| panic!("{e}"))
        .unwrap_or_else(|| panic!("no equality closure"));
    assert_eq!(fx.name(eq.symbol), ".eqfunc9");
    assert_eq!(eq.target, Callee::Runtime(RuntimeFn::MemequalVarlen));
}

#[test]
fn uncomparable_types_have_no_algorithms() {
    let mut fx = Fixture::new();
    let slice = fx.pool.slice(Idx::INT32);
    let session = fx.session();

    assert_eq!(session.eq_closure(slice).map(|c| c.is_none()), Ok(true));
    assert_eq!(
        session.hash_closure(slice).map(|_| ()),
        Err(AlgError::NoHash {
            ty: "[]int32".to_owned(),
        })
    );
}

// ── Generated closures ──────────────────────────────────────

#[test]
fn custom_type_closure_wraps_generated_function() {
    let mut fx = Fixture::new();
    let ty = fx.named_struct("S", &[("s", Idx::STRING), ("a", Idx::INT64)]);
    let session = fx.session();

    let hash = session.hash_closure(ty).unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(fx.name(hash.symbol), ".hashfunc.S");
    assert_eq!(hash.payload, None);
    let Callee::Generated(func) = hash.target else {
        panic!("expected generated target, got {:?}", hash.target);
    };
    assert_eq!(fx.name(func), ".hash.S");

    let eq = session
        .eq_closure(ty)
        .unwrap_or_else(|e| panic!("{e}"))
        .unwrap_or_else(|| panic!("no equality closure"));
    assert_eq!(fx.name(eq.symbol), ".eqfunc.S");

    let names: Vec<_> = session.functions().iter().map(|f| fx.name(f.name).to_owned()).collect();
    assert_eq!(names, [".eq.S", ".hash.S"]);
}

#[test]
fn repeated_requests_return_the_same_artifacts() {
    let mut fx = Fixture::new();
    let ty = fx.named_struct("S", &[("s", Idx::STRING), ("a", Idx::INT64)]);
    let session = fx.session();

    let c1 = session.hash_closure(ty).unwrap_or_else(|e| panic!("{e}"));
    let c2 = session.hash_closure(ty).unwrap_or_else(|e| panic!("{e}"));
    let f1 = session.hash_func(ty).unwrap_or_else(|e| panic!("{e}"));
    let f2 = session.hash_func(ty).unwrap_or_else(|e| panic!("{e}"));

    assert!(Arc::ptr_eq(&c1, &c2));
    assert!(Arc::ptr_eq(&f1, &f2));
    assert_eq!(session.stats().functions, 1);
}

#[test]
fn hash_closure_pregenerates_field_closures() {
    let mut fx = Fixture::new();
    let inner = fx.named_struct("Inner", &[("s", Idx::STRING), ("n", Idx::INT64)]);
    let outer = fx.named_struct("Outer", &[("in", inner), ("s", Idx::STRING)]);
    let session = fx.session();

    session.hash_closure(outer).unwrap_or_else(|e| panic!("{e}"));

    let closures: Vec<_> = session
        .closures()
        .iter()
        .map(|c| fx.name(c.symbol).to_owned())
        .collect();
    assert_eq!(
        closures,
        [
            ".hashfunc.Inner",
            ".hashfunc.Outer",
            "runtime.memhash64·f",
            "runtime.strhash·f",
        ]
    );
    let functions: Vec<_> = session.functions().iter().map(|f| fx.name(f.name).to_owned()).collect();
    assert_eq!(functions, [".hash.Inner", ".hash.Outer"]);
}

#[test]
fn structs_sharing_a_name_get_distinct_symbols() {
    let mut fx = Fixture::new();
    let first = fx.named_struct("T", &[("s", Idx::STRING), ("n", Idx::INT32)]);
    let second = fx.named_struct(
        "T",
        &[("n", Idx::INT64), ("u", Idx::FLOAT64), ("s", Idx::STRING)],
    );
    let session = fx.session();

    let eq = |ty| {
        session
            .eq_closure(ty)
            .unwrap_or_else(|e| panic!("{e}"))
            .unwrap_or_else(|| panic!("no equality closure"))
    };
    let (a, b) = (eq(first), eq(second));
    assert_eq!(fx.name(a.symbol), ".eqfunc.T");
    assert_eq!(fx.name(b.symbol), ".eqfunc.T·1");

    let functions: Vec<_> = session.functions().iter().map(|f| fx.name(f.name).to_owned()).collect();
    assert_eq!(functions, [".eq.T", ".eq.T·1"]);
    for (closure, ty) in [(a, first), (b, second)] {
        let Callee::Generated(name) = closure.target else {
            panic!("expected generated target, got {:?}", closure.target);
        };
        let func = session
            .function(name)
            .unwrap_or_else(|| panic!("{} not registered", fx.name(name)));
        assert_eq!(func.ty, ty);
    }
}

#[test]
fn synthesis_requires_a_custom_classification() {
    let mut fx = Fixture::new();
    let pair = fx.struct_of(&[("a", Idx::INT32), ("b", Idx::INT32)]);
    let session = fx.session();

    assert_eq!(
        session.hash_func(pair).map(|_| ()),
        Err(AlgError::NotCustom {
            ty: "struct { a int32; b int32 }".to_owned(),
            purpose: Purpose::Hash,
            kind: AlgorithmKind::FixedMem(MemWidth::W64),
        })
    );
    assert_eq!(
        session.eq_func(pair).map(|_| ()),
        Err(AlgError::NotCustom {
            ty: "struct { a int32; b int32 }".to_owned(),
            purpose: Purpose::Equal,
            kind: AlgorithmKind::FixedMem(MemWidth::W64),
        })
    );
    assert_eq!(session.stats().functions, 0);
    assert!(session.functions().is_empty());
}

// ── Callee lookup ───────────────────────────────────────────

#[test]
fn hash_for_rejects_plain_memory() {
    let fx = Fixture::new();
    let session = fx.session();

    assert_eq!(session.hash_for(Idx::STRING), Ok(Callee::Runtime(RuntimeFn::Strhash)));
    assert_eq!(
        session.hash_for(Idx::INT32),
        Err(AlgError::HashForMemory {
            ty: "int32".to_owned(),
        })
    );
}

#[test]
fn eq_for_covers_memory_and_aggregates_only() {
    let mut fx = Fixture::new();
    let ty = fx.named_struct("S", &[("s", Idx::STRING), ("a", Idx::INT64)]);
    let session = fx.session();

    assert_eq!(
        session.eq_for(Idx::INT64),
        Ok((Callee::Runtime(RuntimeFn::Memequal), true))
    );
    assert!(matches!(session.eq_for(ty), Ok((Callee::Generated(_), false))));
    assert_eq!(
        session.eq_for(Idx::STRING),
        Err(AlgError::NoDirectEq {
            ty: "string".to_owned(),
            alg: AlgKind::String,
        })
    );
}

#[test]
fn failures_are_cached_without_counting_as_synthesized() {
    let fx = Fixture::new();
    let session = fx.session();

    let first = session.hash_func(Idx::INT32).map(|_| ());
    let second = session.hash_func(Idx::INT32).map(|_| ());
    assert!(first.is_err());
    assert_eq!(first, second);
    assert_eq!(session.stats().functions, 0);
}

// ── Concurrency ─────────────────────────────────────────────

#[test]
fn concurrent_requests_synthesize_once() {
    let mut fx = Fixture::new();
    let ty = fx.named_struct("S", &[("s", Idx::STRING), ("a", Idx::INT64)]);
    let session = fx.session();

    let closures: Vec<_> = (0..64)
        .into_par_iter()
        .map(|_| session.hash_closure(ty).unwrap_or_else(|e| panic!("{e}")))
        .collect();

    assert!(closures.iter().all(|c| Arc::ptr_eq(c, &closures[0])));
    assert_eq!(session.stats().functions, 1);
}

#[test]
fn generate_all_keeps_input_order() {
    let mut fx = Fixture::new();
    let slice = fx.pool.slice(Idx::INT32);
    let ty = fx.named_struct("S", &[("s", Idx::STRING), ("a", Idx::INT64)]);
    let bytes = fx.pool.array(Idx::UINT8, 9);
    let session = fx.session();

    let types = [Idx::INT32, slice, ty, bytes];
    let results = session.generate_all(&types);

    assert_eq!(results.len(), types.len());
    for (result, &expected) in results.iter().zip(&types) {
        let algs = result.as_ref().unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(algs.ty, expected);
    }
    let slice_algs = results[1].as_ref().unwrap_or_else(|e| panic!("{e}"));
    assert!(slice_algs.hash.is_none() && slice_algs.eq.is_none());
    let struct_algs = results[2].as_ref().unwrap_or_else(|e| panic!("{e}"));
    assert!(struct_algs.hash.is_some() && struct_algs.eq.is_some());

    // Hash and equality of the one aggregate.
    assert_eq!(session.stats().functions, 2);
}

#[test]
fn fresh_session_is_empty() {
    let fx = Fixture::new();
    let session = fx.session();
    assert_eq!(session.stats(), SessionStats::default());
    assert!(session.functions().is_empty());
}

#[test]
fn closure_keys_distinguish_purpose() {
    let a = ClosureKey::VarLen {
        purpose: Purpose::Hash,
        size: 9,
    };
    let b = ClosureKey::VarLen {
        purpose: Purpose::Equal,
        size: 9,
    };
    assert_ne!(a, b);
}
