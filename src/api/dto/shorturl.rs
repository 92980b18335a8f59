//! DTOs for the short url endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::entities::UrlMapping;

/// Form body of `POST /api/shorturl`.
///
/// `url` is optional so that a missing field is reported as an invalid URL
/// rather than a form rejection.
#[derive(Debug, Deserialize)]
pub struct ShortenForm {
    pub url: Option<String>,
}

/// Successful response of `POST /api/shorturl`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShortenResponse {
    pub original_url: String,
    pub short_url: i64,
}

impl From<UrlMapping> for ShortenResponse {
    fn from(mapping: UrlMapping) -> Self {
        Self {
            original_url: mapping.original_url,
            short_url: mapping.short_code,
        }
    }
}
