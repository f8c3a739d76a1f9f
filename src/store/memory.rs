//! In-process store backend.

use std::collections::BTreeMap;

use super::{Key, PersistentStore, StoreResult};

/// Map-backed store that lives as long as the process.
///
/// Used for ephemeral sessions and as the fake behind tracker tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: BTreeMap<Key, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently holding a value
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl PersistentStore for MemoryStore {
    fn get_raw(&self, key: Key) -> StoreResult<Option<String>> {
        Ok(self.values.get(&key).cloned())
    }

    fn set_raw(&mut self, key: Key, value: String) -> StoreResult<()> {
        self.values.insert(key, value);
        Ok(())
    }

    fn clear_all(&mut self) -> StoreResult<()> {
        self.values.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_clear() {
        let mut store = MemoryStore::new();
        assert!(store.is_empty());

        store.set_raw(Key::Meals, "[]".to_string()).unwrap();
        store.set_raw(Key::CalorieLimit, "1500".to_string()).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.get_raw(Key::Meals).unwrap().as_deref(), Some("[]"));

        store.clear_all().unwrap();
        assert!(store.is_empty());
        assert_eq!(store.get_raw(Key::CalorieLimit).unwrap(), None);
    }
}
