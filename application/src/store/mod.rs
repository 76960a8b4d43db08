//! Typed, session-scoped access to the storage medium
//!
//! [`EntityStore`] maps each [`StoredEntity`] to its collection and composite
//! key. Records are stored as JSON; timestamps round-trip through their
//! RFC 3339 text form on every read.
//!
//! ```text
//! EntityStore::upsert(&approved_text)
//!        │  key = "{session}/{question}"
//!        ▼
//! StorageMedium::put(ApprovedTexts, key, json)   ← replaces any earlier record
//! ```

pub mod memory;

pub use memory::InMemoryMedium;

use crate::ports::storage::{StorageMedium, StoreError};
use consent_domain::store::key_in_session;
use consent_domain::{Collection, StoredEntity};
use std::sync::Arc;
use tracing::debug;

#[derive(Clone)]
pub struct EntityStore {
    medium: Arc<dyn StorageMedium>,
}

impl EntityStore {
    pub fn new(medium: Arc<dyn StorageMedium>) -> Self {
        Self { medium }
    }

    /// Store a new entity; fails if its key is already taken
    pub fn create<T: StoredEntity>(&self, entity: &T) -> Result<(), StoreError> {
        let key = entity.key();
        if self.medium.get(T::COLLECTION, &key)?.is_some() {
            return Err(StoreError::AlreadyExists {
                collection: T::COLLECTION,
                key,
            });
        }
        self.write(entity, &key)
    }

    /// Store an entity, replacing whatever was stored under the same key
    pub fn upsert<T: StoredEntity>(&self, entity: &T) -> Result<(), StoreError> {
        self.write(entity, &entity.key())
    }

    fn write<T: StoredEntity>(&self, entity: &T, key: &str) -> Result<(), StoreError> {
        let record = serde_json::to_value(entity).map_err(|e| StoreError::Serialization {
            collection: T::COLLECTION,
            message: e.to_string(),
        })?;
        self.medium.put(T::COLLECTION, key, record)?;
        debug!("Stored {}/{}", T::COLLECTION, key);
        Ok(())
    }

    pub fn get<T: StoredEntity>(&self, key: &str) -> Result<Option<T>, StoreError> {
        self.medium
            .get(T::COLLECTION, key)?
            .map(decode::<T>)
            .transpose()
    }

    /// Every entity of one session, in insertion order
    pub fn list<T: StoredEntity>(&self, session_id: &str) -> Result<Vec<T>, StoreError> {
        self.medium
            .list(T::COLLECTION)?
            .into_iter()
            .filter(|(key, _)| key_in_session(key, session_id))
            .map(|(_, record)| decode::<T>(record))
            .collect()
    }

    /// Every entity in the collection, across sessions
    pub fn list_all<T: StoredEntity>(&self) -> Result<Vec<T>, StoreError> {
        self.medium
            .list(T::COLLECTION)?
            .into_iter()
            .map(|(_, record)| decode::<T>(record))
            .collect()
    }

    pub fn delete<T: StoredEntity>(&self, key: &str) -> Result<bool, StoreError> {
        let removed = self.medium.delete(T::COLLECTION, key)?;
        if removed {
            debug!("Deleted {}/{}", T::COLLECTION, key);
        }
        Ok(removed)
    }

    /// Remove every record of a session from every collection.
    ///
    /// Returns the number of records removed.
    pub fn delete_session(&self, session_id: &str) -> Result<usize, StoreError> {
        let mut removed = 0;
        for collection in Collection::ALL {
            let keys: Vec<String> = self
                .medium
                .list(collection)?
                .into_iter()
                .map(|(key, _)| key)
                .filter(|key| key_in_session(key, session_id))
                .collect();
            for key in keys {
                if self.medium.delete(collection, &key)? {
                    removed += 1;
                }
            }
        }
        debug!("Deleted session {} ({} records)", session_id, removed);
        Ok(removed)
    }
}

fn decode<T: StoredEntity>(record: serde_json::Value) -> Result<T, StoreError> {
    serde_json::from_value(record).map_err(|e| StoreError::Serialization {
        collection: T::COLLECTION,
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use consent_domain::{
        ApprovedText, CanvasResponses, Document, FlowState, FlowStateRecord, QuestionType,
        Session, Vote, VoteValue,
    };

    fn store() -> EntityStore {
        EntityStore::new(Arc::new(InMemoryMedium::new()))
    }

    #[test]
    fn test_create_rejects_duplicate_key() {
        let store = store();
        let session = Session::new("s");
        store.create(&session).unwrap();
        assert!(matches!(
            store.create(&session),
            Err(StoreError::AlreadyExists { .. })
        ));
    }

    #[test]
    fn test_approved_text_is_singleton() {
        let store = store();
        let first = ApprovedText::new("s1", QuestionType::Goal1, "eerste", "p", "v1");
        let second = ApprovedText::new("s1", QuestionType::Goal1, "tweede", "p", "v2");
        store.upsert(&first).unwrap();
        store.upsert(&second).unwrap();

        let texts: Vec<ApprovedText> = store.list("s1").unwrap();
        assert_eq!(texts.len(), 1);
        assert_eq!(texts[0].text, "tweede");
        assert_eq!(texts[0].approved_at, second.approved_at);
    }

    #[test]
    fn test_repeat_vote_replaces() {
        let store = store();
        let agree = Vote::new("s1", "p", "v", "anne", VoteValue::Agree, None).unwrap();
        let disagree =
            Vote::new("s1", "p", "v", "anne", VoteValue::Disagree, Some("te vaag".into())).unwrap();
        store.upsert(&agree).unwrap();
        store.upsert(&disagree).unwrap();
        let votes: Vec<Vote> = store.list("s1").unwrap();
        assert_eq!(votes.len(), 1);
        assert_eq!(votes[0].value, VoteValue::Disagree);
    }

    #[test]
    fn test_dates_round_trip() {
        let store = store();
        let doc = Document::new("s1", "a.docx", "anne", "tekst", CanvasResponses::default());
        store.create(&doc).unwrap();
        let read: Document = store.get(&doc.key()).unwrap().unwrap();
        assert_eq!(read.uploaded_at, doc.uploaded_at);
        assert_eq!(read, doc);
    }

    #[test]
    fn test_list_is_session_scoped() {
        let store = store();
        let a = Document::new("s1", "a", "anne", "", CanvasResponses::default());
        let b = Document::new("s10", "b", "bert", "", CanvasResponses::default());
        store.create(&a).unwrap();
        store.create(&b).unwrap();
        let docs: Vec<Document> = store.list("s1").unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].respondent_id, "anne");
        assert_eq!(store.list_all::<Document>().unwrap().len(), 2);
    }

    #[test]
    fn test_delete_session_cascades() {
        let store = store();
        let session = Session::new("s");
        let other = Session::new("other");
        let sid = session.id.clone();
        store.create(&session).unwrap();
        store.create(&other).unwrap();
        store
            .upsert(&FlowStateRecord {
                session_id: sid.clone(),
                state: FlowState::initial(),
            })
            .unwrap();
        store
            .create(&Document::new(&sid, "a", "anne", "", CanvasResponses::default()))
            .unwrap();
        store
            .upsert(&ApprovedText::new(&sid, QuestionType::Stakeholders, "x", "p", "v"))
            .unwrap();
        store
            .create(&Document::new(&other.id, "b", "bert", "", CanvasResponses::default()))
            .unwrap();

        assert_eq!(store.delete_session(&sid).unwrap(), 4);
        assert!(store.get::<Session>(&sid).unwrap().is_none());
        assert!(store.list::<Document>(&sid).unwrap().is_empty());
        assert_eq!(store.list::<Document>(&other.id).unwrap().len(), 1);
        assert!(store.get::<Session>(&other.id).unwrap().is_some());
    }

    #[test]
    fn test_delete_single_record() {
        let store = store();
        let doc = Document::new("s1", "a", "anne", "", CanvasResponses::default());
        store.create(&doc).unwrap();
        assert!(store.delete::<Document>(&doc.key()).unwrap());
        assert!(!store.delete::<Document>(&doc.key()).unwrap());
    }
}
