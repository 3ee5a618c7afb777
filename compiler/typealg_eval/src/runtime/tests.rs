use pretty_assertions::assert_eq;
use typealg_gen::{AlgSession, RuntimeFn};
use typealg_ir::StringInterner;
use typealg_types::{Idx, Pool};

use super::*;
use crate::Value;

#[test]
fn fnv_composes_over_concatenation() {
    let whole = fnv(b"abcdef", 7);
    let split = fnv(b"def", fnv(b"abc", 7));
    assert_eq!(whole, split);
    assert_eq!(fnv(&[], 42), 42);
}

#[test]
fn signed_zeros_hash_and_compare_equal() -> EvalResult<()> {
    let (pool, interner) = (Pool::new(), StringInterner::new());
    let session = AlgSession::new(&pool, &interner);
    let mut m = Machine::new(&session);
    let pos = m.store(Idx::FLOAT64, &Value::F64(0.0))?;
    let neg = m.store(Idx::FLOAT64, &Value::F64(-0.0))?;

    assert_eq!(
        m.call_runtime(RuntimeFn::F64hash, &[pos, 3])?,
        m.call_runtime(RuntimeFn::F64hash, &[neg, 3])?
    );
    assert_eq!(m.call_runtime(RuntimeFn::F64equal, &[pos, neg])?, 1);
    Ok(())
}

#[test]
fn nan_is_not_equal_to_itself() -> EvalResult<()> {
    let (pool, interner) = (Pool::new(), StringInterner::new());
    let session = AlgSession::new(&pool, &interner);
    let mut m = Machine::new(&session);
    let nan = m.store(Idx::FLOAT32, &Value::F32(f32::NAN))?;

    assert_eq!(m.call_runtime(RuntimeFn::F32equal, &[nan, nan])?, 0);
    Ok(())
}

#[test]
fn strings_compare_by_contents() -> EvalResult<()> {
    let (pool, interner) = (Pool::new(), StringInterner::new());
    let session = AlgSession::new(&pool, &interner);
    let mut m = Machine::new(&session);
    let a = m.store(Idx::STRING, &Value::str("hello"))?;
    let b = m.store(Idx::STRING, &Value::str("hello"))?;
    let c = m.store(Idx::STRING, &Value::str("help!"))?;
    let empty = m.store(Idx::STRING, &Value::str(""))?;

    assert_ne!(a, b);
    assert_eq!(m.call_runtime(RuntimeFn::Strequal, &[a, b])?, 1);
    assert_eq!(m.call_runtime(RuntimeFn::Strequal, &[a, c])?, 0);
    assert_eq!(m.call_runtime(RuntimeFn::Strequal, &[a, empty])?, 0);
    assert_eq!(
        m.call_runtime(RuntimeFn::Strhash, &[a, 0])?,
        m.call_runtime(RuntimeFn::Strhash, &[b, 0])?
    );
    assert_eq!(m.call_runtime(RuntimeFn::Strhash, &[empty, 9])?, 9);
    Ok(())
}

#[test]
fn nil_interfaces() -> EvalResult<()> {
    let (pool, interner) = (Pool::new(), StringInterner::new());
    let session = AlgSession::new(&pool, &interner);
    let mut m = Machine::new(&session);
    let nil = m.store(Idx::ANY, &Value::nil())?;
    let also_nil = m.store(Idx::ANY, &Value::nil())?;
    let one = m.store(Idx::ANY, &Value::iface(Idx::INT32, Value::Int(1)))?;

    assert_eq!(m.call_runtime(RuntimeFn::Nilinterhash, &[nil, 5])?, 5);
    assert_eq!(m.call_runtime(RuntimeFn::Nilinterequal, &[nil, also_nil])?, 1);
    assert_eq!(m.call_runtime(RuntimeFn::Nilinterequal, &[nil, one])?, 0);
    Ok(())
}

#[test]
fn interfaces_dispatch_on_dynamic_type() -> EvalResult<()> {
    let (pool, interner) = (Pool::new(), StringInterner::new());
    let session = AlgSession::new(&pool, &interner);
    let mut m = Machine::new(&session);
    let int = m.store(Idx::ANY, &Value::iface(Idx::INT32, Value::Int(7)))?;
    let same = m.store(Idx::ANY, &Value::iface(Idx::INT32, Value::Int(7)))?;
    let uint = m.store(Idx::ANY, &Value::iface(Idx::UINT32, Value::Int(7)))?;

    assert_eq!(m.call_runtime(RuntimeFn::Nilinterequal, &[int, same])?, 1);
    // Same bytes, different dynamic type.
    assert_eq!(m.call_runtime(RuntimeFn::Nilinterequal, &[int, uint])?, 0);
    assert_eq!(
        m.call_runtime(RuntimeFn::Nilinterhash, &[int, 1])?,
        m.call_runtime(RuntimeFn::Nilinterhash, &[same, 1])?
    );
    Ok(())
}

#[test]
fn uncomparable_dynamic_type_panics() -> EvalResult<()> {
    let (mut pool, interner) = (Pool::new(), StringInterner::new());
    let slice = pool.slice(Idx::INT32);
    let session = AlgSession::new(&pool, &interner);
    let mut m = Machine::new(&session);
    let raw = Value::Bytes(vec![0; 24]);
    let a = m.store(Idx::ANY, &Value::iface(slice, raw.clone()))?;
    let b = m.store(Idx::ANY, &Value::iface(slice, raw))?;

    assert_eq!(
        m.call_runtime(RuntimeFn::Nilinterhash, &[a, 0]),
        Err(EvalError::Panic("hash of unhashable type []int32".to_owned()))
    );
    assert_eq!(
        m.call_runtime(RuntimeFn::Nilinterequal, &[a, b]),
        Err(EvalError::Panic("comparing uncomparable type []int32".to_owned()))
    );
    Ok(())
}

#[test]
fn wrong_arity_is_malformed() {
    let (pool, interner) = (Pool::new(), StringInterner::new());
    let session = AlgSession::new(&pool, &interner);
    let m = Machine::new(&session);

    assert!(matches!(
        m.call_runtime(RuntimeFn::Memhash, &[0, 0]),
        Err(EvalError::Malformed(_))
    ));
}
