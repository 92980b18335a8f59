//! Url mapping entity: an original URL paired with its short code.

use chrono::{DateTime, Utc};

/// A persisted mapping between a submitted URL and its short code.
///
/// `original_url` is stored exactly as submitted. Mappings are never
/// mutated or deleted once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlMapping {
    pub original_url: String,
    pub short_code: i64,
    pub created_at: DateTime<Utc>,
}

impl UrlMapping {
    /// Creates a new UrlMapping instance.
    pub fn new(original_url: String, short_code: i64, created_at: DateTime<Utc>) -> Self {
        Self {
            original_url,
            short_code,
            created_at,
        }
    }
}

/// Input data for persisting a new mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUrlMapping {
    pub original_url: String,
    pub short_code: i64,
}
