use super::*;
use pretty_assertions::assert_eq;
use rayon::prelude::*;

#[test]
fn symbols_intern_once() {
    let interner = StringInterner::new();

    let hash = interner.intern(".hash.T");
    let eq = interner.intern(".eq.T");

    assert_eq!(interner.intern(".hash.T"), hash);
    assert_ne!(hash, eq);
    assert_eq!(interner.lookup(hash), ".hash.T");
    assert_eq!(interner.lookup(eq), ".eq.T");
}

#[test]
fn prelude_is_in_place() {
    let interner = StringInterner::new();
    assert!(interner.is_empty());

    assert_eq!(interner.intern(""), Name::EMPTY);
    assert_eq!(interner.lookup(interner.intern("neq")), "neq");
    assert_eq!(interner.len(), PRELUDE.len());
}

#[test]
fn owned_and_borrowed_agree() {
    let interner = StringInterner::new();

    let owned = interner.intern_owned(String::from(".hashfunc9"));
    let borrowed = interner.intern(".hashfunc9");

    assert_eq!(owned, borrowed);
    assert!(!interner.is_empty());
}

#[test]
fn names_are_dense() {
    let interner = StringInterner::new();
    let first = interner.intern("runtime.memhash64·f");
    let second = interner.intern("runtime.strhash·f");
    assert_eq!(second.index(), first.index() + 1);
}

#[test]
fn concurrent_interning_agrees() {
    let interner = StringInterner::new();

    let names: Vec<Name> = (0..64)
        .into_par_iter()
        .map(|i| interner.intern_owned(format!(".eq.[{}]int32", i % 8)))
        .collect();

    for (i, name) in names.iter().enumerate() {
        assert_eq!(interner.lookup(*name), format!(".eq.[{}]int32", i % 8));
    }
    assert_eq!(interner.len(), PRELUDE.len() + 8);
}
