//! Application layer for consent
//!
//! This crate contains use cases, port definitions, the typed entity store
//! and application configuration. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod store;
pub mod use_cases;

// Re-export commonly used types
pub use config::WorkflowParams;
pub use ports::{
    audit_log::{AuditEvent, AuditLog, NoAuditLog},
    completion_gateway::{CompletionGateway, GatewayError, UnavailableGateway},
    document_extractor::{DocumentTextExtractor, ImportError},
    exporter::{DocumentExporter, ExportError},
    progress::{NoProgress, ProgressNotifier},
    storage::{StorageMedium, StoreError},
};
pub use store::{EntityStore, InMemoryMedium};
pub use use_cases::analyze_themes::{AnalyzeError, AnalyzeThemesUseCase};
pub use use_cases::export_final_document::{
    ExportDocumentError, ExportFinalDocumentUseCase, ExportOutput,
};
pub use use_cases::generate_proposals::GenerateProposalsUseCase;
pub use use_cases::import_document::{
    ImportDocumentError, ImportDocumentInput, ImportDocumentUseCase,
};
pub use use_cases::session_facade::{
    FacadeError, LoadedSession, RankAction, SessionExport, SessionFacade, ThemeEdit,
};
