//! Shared fixtures for unit tests.

use typealg_ir::{Name, StringInterner};
use typealg_types::{Idx, Pool, Target};

use crate::AlgSession;

/// A pool plus the interner its names live in.
pub struct Fixture {
    pub interner: StringInterner,
    pub pool: Pool,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_target(Target::AMD64)
    }

    pub fn with_target(target: Target) -> Self {
        Fixture {
            interner: StringInterner::new(),
            pool: Pool::with_target(target),
        }
    }

    fn fields(&self, fields: &[(&str, Idx)]) -> Vec<(Option<Name>, Idx)> {
        fields
            .iter()
            .map(|&(name, ty)| ((name != "_").then(|| self.interner.intern(name)), ty))
            .collect()
    }

    /// Literal struct; a field named `_` is blank.
    pub fn struct_of(&mut self, fields: &[(&str, Idx)]) -> Idx {
        let fields = self.fields(fields);
        self.pool.struct_type(&fields)
    }

    pub fn named_struct(&mut self, name: &str, fields: &[(&str, Idx)]) -> Idx {
        let fields = self.fields(fields);
        let name = self.interner.intern(name);
        self.pool.named_struct(name, &fields)
    }

    pub fn interface(&mut self, name: &str) -> Idx {
        let name = self.interner.intern(name);
        self.pool.interface(name)
    }

    pub fn session(&self) -> AlgSession<'_> {
        AlgSession::new(&self.pool, &self.interner)
    }

    pub fn name(&self, name: Name) -> &str {
        self.interner.lookup(name)
    }
}
