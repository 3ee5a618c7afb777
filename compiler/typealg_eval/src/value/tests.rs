use pretty_assertions::assert_eq;
use typealg_gen::AlgSession;
use typealg_ir::StringInterner;
use typealg_types::{Idx, Pool};

use crate::{EvalError, EvalResult, Machine, Value};

#[test]
fn struct_fields_land_at_their_offsets() -> EvalResult<()> {
    let interner = StringInterner::new();
    let mut pool = Pool::new();
    let ty = pool.struct_type(&[
        (Some(interner.intern("a")), Idx::UINT8),
        (Some(interner.intern("b")), Idx::INT32),
    ]);
    let session = AlgSession::new(&pool, &interner);
    let mut m = Machine::new(&session);

    let addr = m.store_filled(ty, &Value::List(vec![Value::Uint(0x7F), Value::Int(-1)]), 0xCC)?;
    assert_eq!(
        m.memory().read(addr, 8)?,
        &[0x7F, 0xCC, 0xCC, 0xCC, 0xFF, 0xFF, 0xFF, 0xFF]
    );
    Ok(())
}

#[test]
fn string_header_points_at_its_bytes() -> EvalResult<()> {
    let interner = StringInterner::new();
    let pool = Pool::new();
    let session = AlgSession::new(&pool, &interner);
    let mut m = Machine::new(&session);

    let addr = m.store(Idx::STRING, &Value::str("hey"))?;
    let data = m.memory().read_uint(addr, 8)?;
    assert_eq!(m.memory().read_uint(addr + 8, 8)?, 3);
    assert_eq!(m.memory().read(data, 3)?, b"hey");
    Ok(())
}

#[test]
fn shape_mismatch_names_the_type() {
    let interner = StringInterner::new();
    let mut pool = Pool::new();
    let arr = pool.array(Idx::INT32, 2);
    let session = AlgSession::new(&pool, &interner);
    let mut m = Machine::new(&session);

    assert_eq!(
        m.store(arr, &Value::List(vec![Value::Int(1)])),
        Err(EvalError::ValueMismatch {
            ty: "[2]int32".to_owned(),
        })
    );
    assert!(m.store(Idx::FLOAT32, &Value::F64(1.0)).is_err());
}
