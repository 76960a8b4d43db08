//! JSON-file storage medium
//!
//! One file per collection under the data directory:
//!
//! ```text
//! <data_dir>/
//!   sessions.json         [{"key": "...", "record": {...}}, ...]
//!   approved_texts.json
//!   ...
//! ```
//!
//! Files hold an array so insertion order survives a reload. Each collection
//! is read once and cached; every write rewrites the whole file through a
//! temporary file and a rename, so a crash never leaves a half-written file.

use consent_application::ports::storage::{StorageMedium, StoreError};
use consent_domain::Collection;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::{debug, trace};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Row {
    key: String,
    record: Value,
}

/// File-backed medium for a single local writer
pub struct JsonFileMedium {
    dir: PathBuf,
    cache: RwLock<HashMap<Collection, Vec<Row>>>,
}

fn poisoned() -> StoreError {
    StoreError::Other("json store lock poisoned".to_string())
}

impl JsonFileMedium {
    /// Open the medium, creating the data directory if needed
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        debug!("Opened JSON store at {}", dir.display());
        Ok(Self {
            dir,
            cache: RwLock::new(HashMap::new()),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn file_for(&self, collection: Collection) -> PathBuf {
        self.dir.join(format!("{}.json", collection.as_str()))
    }

    fn read_file(&self, collection: Collection) -> Result<Vec<Row>, StoreError> {
        let path = self.file_for(collection);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let bytes = fs::read(&path)?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }
        serde_json::from_slice(&bytes).map_err(|e| StoreError::Serialization {
            collection,
            message: format!("{}: {}", path.display(), e),
        })
    }

    fn write_file(&self, collection: Collection, rows: &[Row]) -> Result<(), StoreError> {
        let path = self.file_for(collection);
        let tmp = path.with_extension("json.tmp");
        let json = serde_json::to_vec_pretty(rows).map_err(|e| StoreError::Serialization {
            collection,
            message: e.to_string(),
        })?;
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &path)?;
        trace!("Wrote {} rows to {}", rows.len(), path.display());
        Ok(())
    }

    /// Run `f` on the cached rows of a collection, loading them on first use
    fn with_rows<R>(
        &self,
        collection: Collection,
        f: impl FnOnce(&[Row]) -> R,
    ) -> Result<R, StoreError> {
        let mut cache = self.cache.write().map_err(|_| poisoned())?;
        if !cache.contains_key(&collection) {
            let rows = self.read_file(collection)?;
            cache.insert(collection, rows);
        }
        Ok(f(cache.entry(collection).or_default().as_slice()))
    }

    /// Apply `change` to a copy of the rows and write it out.
    ///
    /// The cache only takes the new rows once the file is written, so a failed
    /// write leaves both the cache and the file untouched. Nothing is written
    /// when `change` returns `false`.
    fn modify_rows(
        &self,
        collection: Collection,
        change: impl FnOnce(&mut Vec<Row>) -> bool,
    ) -> Result<bool, StoreError> {
        let mut cache = self.cache.write().map_err(|_| poisoned())?;
        let mut rows = match cache.get(&collection) {
            Some(rows) => rows.clone(),
            None => self.read_file(collection)?,
        };
        if !change(&mut rows) {
            return Ok(false);
        }
        self.write_file(collection, &rows)?;
        cache.insert(collection, rows);
        Ok(true)
    }
}

impl StorageMedium for JsonFileMedium {
    fn get(&self, collection: Collection, key: &str) -> Result<Option<Value>, StoreError> {
        self.with_rows(collection, |rows| {
            rows.iter().find(|r| r.key == key).map(|r| r.record.clone())
        })
    }

    fn list(&self, collection: Collection) -> Result<Vec<(String, Value)>, StoreError> {
        self.with_rows(collection, |rows| {
            rows.iter()
                .map(|r| (r.key.clone(), r.record.clone()))
                .collect()
        })
    }

    fn put(&self, collection: Collection, key: &str, record: Value) -> Result<(), StoreError> {
        self.modify_rows(collection, |rows| {
            match rows.iter_mut().find(|r| r.key == key) {
                Some(row) => row.record = record,
                None => rows.push(Row {
                    key: key.to_string(),
                    record,
                }),
            }
            true
        })?;
        Ok(())
    }

    fn delete(&self, collection: Collection, key: &str) -> Result<bool, StoreError> {
        self.modify_rows(collection, |rows| {
            let before = rows.len();
            rows.retain(|r| r.key != key);
            rows.len() != before
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use consent_application::{EntityStore, SessionFacade, WorkflowParams};
    use consent_domain::{ApprovedText, FlowStep, QuestionType};
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn test_put_get_delete() {
        let dir = tempfile::tempdir().unwrap();
        let medium = JsonFileMedium::open(dir.path()).unwrap();

        medium.put(Collection::Sessions, "a", json!({"name": "A"})).unwrap();
        medium.put(Collection::Sessions, "b", json!({"name": "B"})).unwrap();
        medium.put(Collection::Sessions, "a", json!({"name": "A2"})).unwrap();

        assert_eq!(medium.get(Collection::Sessions, "a").unwrap(), Some(json!({"name": "A2"})));
        let keys: Vec<String> = medium.list(Collection::Sessions).unwrap().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "b"]);

        assert!(medium.delete(Collection::Sessions, "a").unwrap());
        assert!(!medium.delete(Collection::Sessions, "a").unwrap());
        assert!(medium.get(Collection::Votes, "x").unwrap().is_none());
    }

    #[test]
    fn test_records_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let medium = JsonFileMedium::open(dir.path()).unwrap();
            medium.put(Collection::Votes, "s/p/v/r", json!({"value": "agree"})).unwrap();
        }
        assert!(dir.path().join("votes.json").exists());
        let medium = JsonFileMedium::open(dir.path()).unwrap();
        assert_eq!(
            medium.get(Collection::Votes, "s/p/v/r").unwrap(),
            Some(json!({"value": "agree"}))
        );
    }

    #[test]
    fn test_failed_write_leaves_cache_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let medium = JsonFileMedium::open(dir.path()).unwrap();
        medium.put(Collection::Votes, "kept", json!({"v": 0})).unwrap();

        // a directory in place of the temporary file makes every write fail
        std::fs::create_dir(dir.path().join("votes.json.tmp")).unwrap();
        assert!(medium.put(Collection::Votes, "k", json!({"v": 1})).is_err());
        assert!(medium.delete(Collection::Votes, "kept").is_err());

        assert_eq!(medium.get(Collection::Votes, "k").unwrap(), None);
        assert_eq!(medium.get(Collection::Votes, "kept").unwrap(), Some(json!({"v": 0})));
        assert_eq!(medium.list(Collection::Votes).unwrap().len(), 1);

        let reopened = JsonFileMedium::open(dir.path()).unwrap();
        assert_eq!(reopened.get(Collection::Votes, "k").unwrap(), None);
        assert_eq!(reopened.get(Collection::Votes, "kept").unwrap(), Some(json!({"v": 0})));
    }

    #[test]
    fn test_corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("documents.json"), "{ niet json").unwrap();
        let medium = JsonFileMedium::open(dir.path()).unwrap();
        assert!(matches!(
            medium.list(Collection::Documents),
            Err(StoreError::Serialization { .. })
        ));
    }

    #[test]
    fn test_facade_session_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let open = || {
            SessionFacade::new(
                EntityStore::new(Arc::new(JsonFileMedium::open(dir.path()).unwrap())),
                WorkflowParams::default(),
            )
        };

        let session = open().create_session("MT").unwrap().session;
        let handle = session.handle();
        let facade = open();
        facade
            .save_approved_text(&handle, QuestionType::CurrentSituation, "Nu", "p", "v")
            .unwrap();

        let reloaded = open().load_session(&session.id).unwrap();
        assert!(reloaded.flow_state.status(FlowStep::VisieHuidige).is_completed());
        let texts: Vec<ApprovedText> = open().approved_texts(&handle).unwrap();
        assert_eq!(texts[0].approved_at, facade.approved_texts(&handle).unwrap()[0].approved_at);
    }
}
