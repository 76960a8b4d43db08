//! Keyed collections of persisted entities
//!
//! Every entity lives in one [`Collection`] under a composite key that
//! starts with its session id. Singletons (approved text, analysis, vote,
//! final document, flow state) are singletons because their key is:
//! writing the same key twice replaces the record.
//!
//! | Collection | Key |
//! |------------|-----|
//! | sessions | `{session}` |
//! | documents | `{session}/{document}` |
//! | analyses | `{session}/{question}` |
//! | proposals | `{session}/{proposal}` |
//! | votes | `{session}/{proposal}/{variant}/{respondent}` |
//! | approved_texts | `{session}/{question}` |
//! | final_documents | `{session}` |
//! | flow_states | `{session}` |

use crate::analysis::StoredAnalysis;
use crate::approval::{ApprovedText, FinalDocument};
use crate::consensus::Vote;
use crate::document::Document;
use crate::proposal::Proposal;
use crate::session::{FlowStateRecord, Session};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Collection {
    Sessions,
    Documents,
    Analyses,
    Proposals,
    Votes,
    ApprovedTexts,
    FinalDocuments,
    FlowStates,
}

impl Collection {
    pub const ALL: [Collection; 8] = [
        Collection::Sessions,
        Collection::Documents,
        Collection::Analyses,
        Collection::Proposals,
        Collection::Votes,
        Collection::ApprovedTexts,
        Collection::FinalDocuments,
        Collection::FlowStates,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Sessions => "sessions",
            Collection::Documents => "documents",
            Collection::Analyses => "analyses",
            Collection::Proposals => "proposals",
            Collection::Votes => "votes",
            Collection::ApprovedTexts => "approved_texts",
            Collection::FinalDocuments => "final_documents",
            Collection::FlowStates => "flow_states",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Whether `key` belongs to `session_id`
pub fn key_in_session(key: &str, session_id: &str) -> bool {
    key == session_id
        || key
            .strip_prefix(session_id)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// An entity that can be written to a collection
pub trait StoredEntity: Serialize + DeserializeOwned {
    const COLLECTION: Collection;

    /// Composite key, unique within the collection
    fn key(&self) -> String;

    fn session_id(&self) -> &str;
}

impl StoredEntity for Session {
    const COLLECTION: Collection = Collection::Sessions;

    fn key(&self) -> String {
        self.id.clone()
    }

    fn session_id(&self) -> &str {
        &self.id
    }
}

impl StoredEntity for Document {
    const COLLECTION: Collection = Collection::Documents;

    fn key(&self) -> String {
        format!("{}/{}", self.session_id, self.id)
    }

    fn session_id(&self) -> &str {
        &self.session_id
    }
}

impl StoredEntity for StoredAnalysis {
    const COLLECTION: Collection = Collection::Analyses;

    fn key(&self) -> String {
        format!("{}/{}", self.session_id, self.question_type)
    }

    fn session_id(&self) -> &str {
        &self.session_id
    }
}

impl StoredEntity for Proposal {
    const COLLECTION: Collection = Collection::Proposals;

    fn key(&self) -> String {
        format!("{}/{}", self.session_id, self.id)
    }

    fn session_id(&self) -> &str {
        &self.session_id
    }
}

impl StoredEntity for Vote {
    const COLLECTION: Collection = Collection::Votes;

    fn key(&self) -> String {
        format!(
            "{}/{}/{}/{}",
            self.session_id, self.proposal_id, self.variant_id, self.respondent_id
        )
    }

    fn session_id(&self) -> &str {
        &self.session_id
    }
}

impl StoredEntity for ApprovedText {
    const COLLECTION: Collection = Collection::ApprovedTexts;

    fn key(&self) -> String {
        format!("{}/{}", self.session_id, self.question_type)
    }

    fn session_id(&self) -> &str {
        &self.session_id
    }
}

impl StoredEntity for FinalDocument {
    const COLLECTION: Collection = Collection::FinalDocuments;

    fn key(&self) -> String {
        self.session_id.clone()
    }

    fn session_id(&self) -> &str {
        &self.session_id
    }
}

impl StoredEntity for FlowStateRecord {
    const COLLECTION: Collection = Collection::FlowStates;

    fn key(&self) -> String {
        self.session_id.clone()
    }

    fn session_id(&self) -> &str {
        &self.session_id
    }
}
