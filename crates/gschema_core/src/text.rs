//! String interning shared by the parser and the compilers.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// An interned identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Text(u32);

impl Text {
    #[must_use]
    pub const fn from_raw(index: u32) -> Self {
        Self(index)
    }

    #[must_use]
    pub const fn as_raw(self) -> u32 {
        self.0
    }
}

#[derive(Debug, Default)]
struct Strings {
    map: FxHashMap<Arc<str>, Text>,
    values: Vec<Arc<str>>,
}

/// Deduplicating string table.
///
/// Safe to share across the per-module compile workers.
#[derive(Debug)]
pub struct Interner {
    inner: RwLock<Strings>,
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}

impl Interner {
    /// Creates an interner with the built-in scalar names and GraphQL keywords
    /// already registered.
    #[must_use]
    pub fn new() -> Self {
        let interner = Self {
            inner: RwLock::new(Strings::default()),
        };
        for keyword in [
            "Int",
            "Float",
            "String",
            "Boolean",
            "ID",
            "type",
            "interface",
            "union",
            "enum",
            "input",
            "scalar",
            "schema",
            "query",
            "mutation",
            "subscription",
            "fragment",
            "on",
            "directive",
            "extend",
            "implements",
            "true",
            "false",
            "null",
            "__typename",
        ] {
            interner.intern(keyword);
        }
        interner
    }

    pub fn intern(&self, s: &str) -> Text {
        if let Some(&id) = self.inner.read().map.get(s) {
            return id;
        }
        let mut strings = self.inner.write();
        if let Some(&id) = strings.map.get(s) {
            return id;
        }
        let id = Text(strings.values.len() as u32);
        let shared: Arc<str> = Arc::from(s);
        strings.values.push(Arc::clone(&shared));
        strings.map.insert(shared, id);
        id
    }

    /// Returns the string behind `id`, or an empty string for a foreign id.
    #[must_use]
    pub fn get(&self, id: Text) -> String {
        self.resolve(id).map(|s| s.to_string()).unwrap_or_default()
    }

    #[must_use]
    pub fn resolve(&self, id: Text) -> Option<Arc<str>> {
        self.inner.read().values.get(id.0 as usize).cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.read().values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_deduplicates() {
        let interner = Interner::new();
        let a = interner.intern("User");
        let b = interner.intern("User");
        let c = interner.intern("Post");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(interner.get(c), "Post");
    }

    #[test]
    fn keywords_are_preregistered() {
        let interner = Interner::new();
        let before = interner.len();
        interner.intern("__typename");
        interner.intern("ID");
        assert_eq!(interner.len(), before);
    }

    #[test]
    fn shared_between_threads() {
        let interner = Arc::new(Interner::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let interner = Arc::clone(&interner);
                std::thread::spawn(move || interner.intern("Shared"))
            })
            .collect();
        let ids: Vec<Text> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(ids.windows(2).all(|w| w[0] == w[1]));
    }
}
