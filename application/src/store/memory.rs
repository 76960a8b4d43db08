//! In-memory storage medium

use crate::ports::storage::{StorageMedium, StoreError};
use consent_domain::Collection;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::RwLock;

#[derive(Default)]
struct Table {
    /// key → (insertion sequence, record)
    rows: HashMap<String, (u64, Value)>,
    next_seq: u64,
}

/// Process-local medium for tests and throwaway sessions.
///
/// A replaced record keeps its original insertion position.
#[derive(Default)]
pub struct InMemoryMedium {
    tables: RwLock<HashMap<Collection, Table>>,
}

impl InMemoryMedium {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> StoreError {
    StoreError::Other("in-memory store lock poisoned".to_string())
}

impl StorageMedium for InMemoryMedium {
    fn get(&self, collection: Collection, key: &str) -> Result<Option<Value>, StoreError> {
        let tables = self.tables.read().map_err(|_| poisoned())?;
        Ok(tables
            .get(&collection)
            .and_then(|t| t.rows.get(key))
            .map(|(_, v)| v.clone()))
    }

    fn list(&self, collection: Collection) -> Result<Vec<(String, Value)>, StoreError> {
        let tables = self.tables.read().map_err(|_| poisoned())?;
        let Some(table) = tables.get(&collection) else {
            return Ok(Vec::new());
        };
        let mut rows: Vec<(&String, &(u64, Value))> = table.rows.iter().collect();
        rows.sort_by_key(|(_, (seq, _))| *seq);
        Ok(rows
            .into_iter()
            .map(|(k, (_, v))| (k.clone(), v.clone()))
            .collect())
    }

    fn put(&self, collection: Collection, key: &str, record: Value) -> Result<(), StoreError> {
        let mut tables = self.tables.write().map_err(|_| poisoned())?;
        let table = tables.entry(collection).or_default();
        match table.rows.get_mut(key) {
            Some((_, existing)) => *existing = record,
            None => {
                let seq = table.next_seq;
                table.next_seq += 1;
                table.rows.insert(key.to_string(), (seq, record));
            }
        }
        Ok(())
    }

    fn delete(&self, collection: Collection, key: &str) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().map_err(|_| poisoned())?;
        Ok(tables
            .get_mut(&collection)
            .is_some_and(|t| t.rows.remove(key).is_some()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_read_after_write() {
        let medium = InMemoryMedium::new();
        medium.put(Collection::Sessions, "a", json!({"n": 1})).unwrap();
        assert_eq!(medium.get(Collection::Sessions, "a").unwrap(), Some(json!({"n": 1})));
        assert_eq!(medium.get(Collection::Documents, "a").unwrap(), None);
    }

    #[test]
    fn test_list_keeps_insertion_order_on_replace() {
        let medium = InMemoryMedium::new();
        medium.put(Collection::Votes, "b", json!(1)).unwrap();
        medium.put(Collection::Votes, "a", json!(2)).unwrap();
        medium.put(Collection::Votes, "b", json!(3)).unwrap();
        let rows = medium.list(Collection::Votes).unwrap();
        assert_eq!(rows, vec![("b".to_string(), json!(3)), ("a".to_string(), json!(2))]);
    }

    #[test]
    fn test_delete() {
        let medium = InMemoryMedium::new();
        medium.put(Collection::Votes, "a", json!(1)).unwrap();
        assert!(medium.delete(Collection::Votes, "a").unwrap());
        assert!(!medium.delete(Collection::Votes, "a").unwrap());
        assert!(medium.list(Collection::Votes).unwrap().is_empty());
    }
}
