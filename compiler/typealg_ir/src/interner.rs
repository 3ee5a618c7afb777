//! Symbol interner.
//!
//! Sessions intern generated symbols from several threads at once. Hits only
//! take the read lock; a miss upgrades to the write lock and re-checks.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use super::Name;

/// Strings every generated body refers to, interned up front so that hot
/// lookups during synthesis never take the write lock.
const PRELUDE: &[&str] = &[
    "", "_", "p", "q", "h", "r", "i", "neq", "ret", "runtime",
];

#[derive(Default)]
struct Table {
    names: FxHashMap<&'static str, Name>,
    strings: Vec<&'static str>,
}

impl Table {
    fn get(&self, s: &str) -> Option<Name> {
        self.names.get(s).copied()
    }

    fn push(&mut self, s: &'static str) -> Name {
        let index = u32::try_from(self.strings.len())
            .unwrap_or_else(|_| panic!("symbol table full at {} entries", self.strings.len()));
        let name = Name::from_index(index);
        self.strings.push(s);
        self.names.insert(s, name);
        name
    }
}

/// Concurrent string interner.
///
/// Interned strings are leaked and live for the rest of the process, so
/// [`StringInterner::lookup`] hands out `&'static str`.
pub struct StringInterner {
    table: RwLock<Table>,
}

impl StringInterner {
    pub fn new() -> Self {
        let mut table = Table::default();
        for s in PRELUDE {
            table.push(s);
        }
        StringInterner {
            table: RwLock::new(table),
        }
    }

    /// Intern `s`, copying it only the first time it is seen.
    pub fn intern(&self, s: &str) -> Name {
        let hit = self.table.read().get(s);
        hit.unwrap_or_else(|| self.insert(s.to_owned()))
    }

    /// Intern an owned string, reusing its allocation on a miss.
    pub fn intern_owned(&self, s: String) -> Name {
        let hit = self.table.read().get(&s);
        hit.unwrap_or_else(|| self.insert(s))
    }

    fn insert(&self, s: String) -> Name {
        let mut table = self.table.write();
        // Lost the race between the read and the write lock.
        if let Some(name) = table.get(&s) {
            return name;
        }
        table.push(Box::leak(s.into_boxed_str()))
    }

    pub fn lookup(&self, name: Name) -> &'static str {
        self.table.read().strings.get(name.index()).copied().unwrap_or("")
    }

    /// Number of interned strings, the prelude included.
    pub fn len(&self) -> usize {
        self.table.read().strings.len()
    }

    /// True when nothing beyond the prelude has been interned.
    pub fn is_empty(&self) -> bool {
        self.len() <= PRELUDE.len()
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

/// Read access to interned strings.
///
/// The type pool formatter and the dump printer take `&dyn StringLookup`.
pub trait StringLookup {
    fn lookup(&self, name: Name) -> &str;
}

impl StringLookup for StringInterner {
    fn lookup(&self, name: Name) -> &str {
        StringInterner::lookup(self, name)
    }
}

#[cfg(test)]
mod tests;
