//! Identifier and clock helpers.

use chrono::{DateTime, Utc};

/// Generate a fresh random record id.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Current wall-clock time in UTC.
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        assert_ne!(new_id(), new_id());
    }

    #[test]
    fn ids_parse_as_uuid() {
        assert!(uuid::Uuid::parse_str(&new_id()).is_ok());
    }
}
