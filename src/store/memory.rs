use super::Store;
use crate::Result;
use std::collections::HashMap;

/// In-process store, for tests and benchmarks.
///
/// Counts writes so callers can check how many `set`s an import performed.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    data: HashMap<String, String>,
    writes: usize,
}

impl MemoryStore {
    #[allow(missing_docs)]
    pub fn new() -> MemoryStore {
        MemoryStore::default()
    }

    /// Number of `set` calls so far, including overwrites.
    pub fn writes(&self) -> usize {
        self.writes
    }

    /// Number of distinct keys held.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[allow(missing_docs)]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Look at a value without going through [`Store`].
    pub fn peek(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(String::as_str)
    }
}

impl Store for MemoryStore {
    fn set(&mut self, key: String, value: String) -> Result<()> {
        self.writes += 1;
        self.data.insert(key, value);
        Ok(())
    }

    fn get(&mut self, key: String) -> Result<Option<String>> {
        Ok(self.data.get(&key).cloned())
    }
}
