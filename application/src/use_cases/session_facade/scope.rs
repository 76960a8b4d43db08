//! Scope items: collection, categorisation and approval.

use super::{FacadeError, SessionFacade};
use crate::ports::audit_log::AuditEvent;
use consent_domain::approval::{SCOPE_FINAL_VARIANT, SCOPE_SOURCE};
use consent_domain::scope;
use consent_domain::{ApprovedText, QuestionType, ScopeCategory, ScopeItem, SessionHandle, Topic};
use serde_json::json;
use tracing::info;

impl SessionFacade {
    /// Split every respondent's out-of-scope answer into items to categorise.
    ///
    /// Replaces any earlier collection, manual items included.
    pub fn collect_scope(&self, handle: &SessionHandle) -> Result<Vec<ScopeItem>, FacadeError> {
        let items = scope::collect_scope_items(&self.documents(handle)?);
        let stored = items.clone();
        self.update_flow_state(handle, |state| {
            let sub = state.sub_step_mut(Topic::Scope);
            sub.begin_analysis();
            sub.scope_items = Some(stored);
            Ok(())
        })?;
        info!("Collected {} scope items", items.len());
        Ok(items)
    }

    pub fn scope_items(&self, handle: &SessionHandle) -> Result<Vec<ScopeItem>, FacadeError> {
        self.flow_state(handle)?
            .sub_step(Topic::Scope)
            .scope_items
            .clone()
            .ok_or(FacadeError::NoScopeItems)
    }

    pub fn categorize_scope_item(
        &self,
        handle: &SessionHandle,
        item_id: &str,
        category: ScopeCategory,
    ) -> Result<(), FacadeError> {
        self.update_flow_state(handle, |state| {
            let items = state
                .sub_step_mut(Topic::Scope)
                .scope_items
                .as_mut()
                .ok_or(FacadeError::NoScopeItems)?;
            if scope::categorize(items, item_id, category) {
                Ok(())
            } else {
                Err(FacadeError::ScopeItemNotFound(item_id.to_string()))
            }
        })
    }

    /// Add an item by hand; returns its id
    pub fn add_scope_item(
        &self,
        handle: &SessionHandle,
        text: &str,
        category: ScopeCategory,
    ) -> Result<String, FacadeError> {
        self.update_flow_state(handle, |state| {
            let items = state
                .sub_step_mut(Topic::Scope)
                .scope_items
                .get_or_insert_with(Vec::new);
            Ok(scope::add_manual_item(items, text.trim(), category))
        })
    }

    /// Approve the scope: unclear items become out of scope and the
    /// out-of-scope list becomes the approved `out_of_scope` text.
    pub fn approve_scope(&self, handle: &SessionHandle) -> Result<ApprovedText, FacadeError> {
        let items = self.update_flow_state(handle, |state| {
            let items = state
                .sub_step_mut(Topic::Scope)
                .scope_items
                .as_mut()
                .ok_or(FacadeError::NoScopeItems)?;
            scope::finalize(items);
            Ok(items.clone())
        })?;

        let text = scope::scope_text(&items);
        let approved = self.save_approved_text(
            handle,
            QuestionType::OutOfScope,
            &text,
            SCOPE_SOURCE,
            SCOPE_FINAL_VARIANT,
        )?;
        self.audit.log(AuditEvent::new(
            "scope_approved",
            json!({
                "session_id": handle.id(),
                "out_of_scope": items.iter().filter(|i| i.category == ScopeCategory::OutOfScope).count(),
            }),
        ));
        Ok(approved)
    }
}
