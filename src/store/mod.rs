//! Key-value storage the dashboard keeps small client-side state in.
//! The statistics engine never touches it.

pub mod file;
pub mod location;
pub mod transcript;

use std::collections::HashMap;

use crate::error::Result;

pub use file::JsonFileStore;
pub use location::LocationCache;
pub use transcript::ChatTranscript;

/// String-keyed, string-valued storage, in the manner of browser local storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// In-process store; nothing survives the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_basics() {
        let mut store = MemoryStore::new();
        assert!(store.get("k").is_none());
        store.set("k", "v".to_string()).unwrap();
        assert_eq!(store.get("k").as_deref(), Some("v"));
        store.set("k", "w".to_string()).unwrap();
        assert_eq!(store.len(), 1);
        store.remove("k").unwrap();
        store.remove("missing").unwrap();
        assert!(store.is_empty());
    }
}
