//! Interned fact keys.

use std::borrow::Borrow;
use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Mutex, OnceLock};

/// Name of a fact in a [`WorldState`](super::WorldState).
///
/// Keys are interned: creating the same name twice yields handles that share
/// one allocation, so cloning a key (and therefore a world state) never copies
/// text. Equality, ordering and hashing are by content, which keeps them
/// independent of interning order and thread.
///
/// The intern pool is process-wide and only grows: every distinct name
/// created through [`FactKey::new`], `From<&str>`, `From<String>` or serde
/// deserialization stays allocated until exit. Hosts should build their
/// keys while setting up actions and goals and clone them afterwards rather
/// than formatting fresh names per tick.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(into = "String", from = "String")
)]
pub struct FactKey(Arc<str>);

fn pool() -> &'static Mutex<HashSet<Arc<str>>> {
    static POOL: OnceLock<Mutex<HashSet<Arc<str>>>> = OnceLock::new();
    POOL.get_or_init(|| Mutex::new(HashSet::new()))
}

impl FactKey {
    /// Interns `name` and returns its key.
    ///
    /// A name seen for the first time is added to the pool for the rest of
    /// the process.
    pub fn new(name: &str) -> Self {
        // The pool only ever grows; a poisoned lock still holds a valid set.
        let mut pool = pool().lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(existing) = pool.get(name) {
            return Self(Arc::clone(existing));
        }
        let symbol: Arc<str> = Arc::from(name);
        pool.insert(Arc::clone(&symbol));
        Self(symbol)
    }

    /// Returns the key text.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if both keys share the same interned allocation.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for FactKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for FactKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for FactKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for FactKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for FactKey {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for FactKey {
    fn from(name: String) -> Self {
        Self::new(&name)
    }
}

impl From<&FactKey> for FactKey {
    fn from(key: &FactKey) -> Self {
        key.clone()
    }
}

impl From<FactKey> for String {
    fn from(key: FactKey) -> Self {
        key.0.to_string()
    }
}
