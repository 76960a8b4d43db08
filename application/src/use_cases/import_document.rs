//! Import document use case
//!
//! Turns an uploaded canvas into a stored [`Document`]:
//!
//! 1. pick the extractor for the file extension
//! 2. read the raw text; empty text rejects the upload
//! 3. ask the completion collaborator to split the text into the eight answers
//! 4. store the document
//!
//! A readable document is never rejected because field extraction failed; it
//! is stored with empty answers for the facilitator to fill in.

use crate::ports::completion_gateway::CompletionGateway;
use crate::ports::document_extractor::{DocumentTextExtractor, ImportError};
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::use_cases::session_facade::{FacadeError, SessionFacade};
use crate::use_cases::shared::request_completion;
use consent_domain::{CanvasExtraction, Document, PromptTemplate, SessionHandle, parse_canvas_fields};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum ImportDocumentError {
    #[error(transparent)]
    Import(#[from] ImportError),

    #[error(transparent)]
    Facade(#[from] FacadeError),
}

/// One uploaded file
#[derive(Debug, Clone)]
pub struct ImportDocumentInput {
    pub filename: String,
    pub bytes: Vec<u8>,
    /// Overrides the extracted respondent name
    pub respondent: Option<String>,
}

impl ImportDocumentInput {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            bytes,
            respondent: None,
        }
    }

    pub fn with_respondent(mut self, respondent: impl Into<String>) -> Self {
        self.respondent = Some(respondent.into());
        self
    }
}

pub struct ImportDocumentUseCase {
    gateway: Arc<dyn CompletionGateway>,
    extractors: Vec<Arc<dyn DocumentTextExtractor>>,
    facade: SessionFacade,
}

impl ImportDocumentUseCase {
    pub fn new(gateway: Arc<dyn CompletionGateway>, facade: SessionFacade) -> Self {
        Self {
            gateway,
            extractors: Vec::new(),
            facade,
        }
    }

    pub fn with_extractor(mut self, extractor: Arc<dyn DocumentTextExtractor>) -> Self {
        self.extractors.push(extractor);
        self
    }

    /// Extensions accepted by the registered extractors
    pub fn supported_extensions(&self) -> Vec<&'static str> {
        self.extractors
            .iter()
            .flat_map(|e| e.extensions().iter().copied())
            .collect()
    }

    pub async fn execute(
        &self,
        handle: &SessionHandle,
        input: ImportDocumentInput,
    ) -> Result<Document, ImportDocumentError> {
        self.execute_with_progress(handle, input, &NoProgress).await
    }

    /// # Errors
    ///
    /// - [`ImportError::UnsupportedFormat`] - no extractor for the extension
    /// - [`ImportError::Empty`] - the document holds no text
    /// - [`ImportDocumentError::Facade`] - the session or store failed
    pub async fn execute_with_progress(
        &self,
        handle: &SessionHandle,
        input: ImportDocumentInput,
        progress: &dyn ProgressNotifier,
    ) -> Result<Document, ImportDocumentError> {
        self.facade.session(handle)?;
        let extractor = self
            .extractors
            .iter()
            .find(|e| e.supports(&input.filename))
            .ok_or_else(|| ImportError::UnsupportedFormat(extension_of(&input.filename)))?;

        let raw_text = extractor.extract_text(&input.bytes)?;
        if raw_text.trim().is_empty() {
            return Err(ImportError::Empty.into());
        }

        let label = format!("inlezen {}", input.filename);
        progress.on_task_start(&label);
        let prompt = PromptTemplate::parse_canvas(&raw_text);
        let extraction = request_completion(self.gateway.as_ref(), &prompt, self.facade.params(), &label)
            .await
            .and_then(|text| parse_canvas_fields(&text));
        progress.on_task_complete(&label, extraction.is_none());

        let CanvasExtraction {
            respondent_name,
            responses,
        } = extraction.unwrap_or_else(|| {
            warn!("{}: field extraction failed, answers left empty", input.filename);
            CanvasExtraction::default()
        });
        let respondent = input
            .respondent
            .or(respondent_name)
            .unwrap_or_else(|| file_stem(&input.filename));

        let document = Document::new(handle.id(), input.filename, respondent, raw_text, responses);
        let document = self.facade.add_document(handle, document)?;
        info!(
            "Imported {} ({} of 8 answers)",
            document.filename,
            document.parsed_responses.answered()
        );
        Ok(document)
    }
}

fn extension_of(filename: &str) -> String {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_else(|| filename.to_string())
}

fn file_stem(filename: &str) -> String {
    Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(filename)
        .to_string()
}
