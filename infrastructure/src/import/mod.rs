//! Document text extractors implementing
//! [`DocumentTextExtractor`](consent_application::DocumentTextExtractor).

mod plain_text;

pub use plain_text::PlainTextExtractor;
