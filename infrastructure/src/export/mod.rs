//! Final-document exporters implementing
//! [`DocumentExporter`](consent_application::DocumentExporter).
//!
//! | Format | Extension | Re-importable |
//! |--------|-----------|---------------|
//! | `json` | `.json` | yes |
//! | `markdown` | `.md` | no |

mod json;
mod markdown;

pub use json::JsonExporter;
pub use markdown::MarkdownExporter;

use consent_application::DocumentExporter;
use std::sync::Arc;

/// Every built-in exporter
pub fn default_exporters() -> Vec<Arc<dyn DocumentExporter>> {
    vec![Arc::new(JsonExporter), Arc::new(MarkdownExporter)]
}
