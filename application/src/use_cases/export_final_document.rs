//! Export final document use case
//!
//! Projects the approved texts into a [`FinalDocument`], serializes it with
//! the exporter registered for the requested format and stores the document
//! (replacing the previous export) with its export timestamp.

use crate::ports::audit_log::{AuditEvent, AuditLog, NoAuditLog};
use crate::ports::exporter::{DocumentExporter, ExportError};
use crate::use_cases::session_facade::{FacadeError, SessionFacade};
use consent_domain::{FinalDocument, SessionHandle};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum ExportDocumentError {
    #[error(transparent)]
    Export(#[from] ExportError),

    #[error(transparent)]
    Facade(#[from] FacadeError),
}

/// A serialized final document ready to be written out
#[derive(Debug, Clone)]
pub struct ExportOutput {
    pub document: FinalDocument,
    pub format: &'static str,
    /// Suggested file name, e.g. `visiedocument.md`
    pub filename: String,
    pub bytes: Vec<u8>,
}

pub struct ExportFinalDocumentUseCase {
    facade: SessionFacade,
    exporters: Vec<Arc<dyn DocumentExporter>>,
    audit: Arc<dyn AuditLog>,
}

impl ExportFinalDocumentUseCase {
    pub fn new(facade: SessionFacade) -> Self {
        Self {
            facade,
            exporters: Vec::new(),
            audit: Arc::new(NoAuditLog),
        }
    }

    pub fn with_exporter(mut self, exporter: Arc<dyn DocumentExporter>) -> Self {
        self.exporters.push(exporter);
        self
    }

    pub fn with_audit_log(mut self, audit: Arc<dyn AuditLog>) -> Self {
        self.audit = audit;
        self
    }

    pub fn formats(&self) -> Vec<&'static str> {
        self.exporters.iter().map(|e| e.format()).collect()
    }

    fn exporter(&self, format: &str) -> Result<&Arc<dyn DocumentExporter>, ExportError> {
        self.exporters
            .iter()
            .find(|e| e.format().eq_ignore_ascii_case(format))
            .ok_or_else(|| ExportError::UnknownFormat(format.to_string()))
    }

    /// Build, serialize and store the final document.
    ///
    /// An incomplete document (missing vision text or no goals) is still
    /// exported; the gap is logged.
    pub fn execute(&self, handle: &SessionHandle, format: &str) -> Result<ExportOutput, ExportDocumentError> {
        let exporter = self.exporter(format)?;
        let mut document = self.facade.build_final_document(handle)?;
        if !document.is_complete() {
            warn!("Exporting an incomplete final document for {}", handle);
        }

        document.mark_exported();
        let bytes = exporter.export(&document)?;
        self.facade.save_final_document(handle, &document)?;

        let filename = format!("visiedocument.{}", exporter.extension());
        info!("Exported {} ({} bytes)", filename, bytes.len());
        self.audit.log(AuditEvent::new(
            "export_generated",
            json!({
                "session_id": handle.id(),
                "format": exporter.format(),
                "complete": document.is_complete(),
            }),
        ));
        Ok(ExportOutput {
            document,
            format: exporter.format(),
            filename,
            bytes,
        })
    }

    /// Read an exported document and load its texts into the session
    pub fn import(
        &self,
        handle: &SessionHandle,
        format: &str,
        bytes: &[u8],
    ) -> Result<FinalDocument, ExportDocumentError> {
        let document = self.exporter(format)?.import(bytes)?;
        self.facade.import_final_document(handle, &document)?;
        Ok(document)
    }
}
