//! Helpers for interpreting PostgreSQL constraint violations.

use std::fmt;

/// Unique constraint name guarding `url_mappings.original_url`.
pub const ORIGINAL_URL_KEY: &str = "url_mappings_original_url_key";

/// Unique constraint name guarding `url_mappings.short_code`.
pub const SHORT_CODE_KEY: &str = "url_mappings_short_code_key";

/// Which uniqueness rule of a mapping was violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueKey {
    OriginalUrl,
    ShortCode,
    Other,
}

impl UniqueKey {
    fn from_constraint(name: Option<&str>) -> Self {
        match name {
            Some(ORIGINAL_URL_KEY) => Self::OriginalUrl,
            Some(SHORT_CODE_KEY) => Self::ShortCode,
            _ => Self::Other,
        }
    }
}

impl fmt::Display for UniqueKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OriginalUrl => f.write_str("original_url"),
            Self::ShortCode => f.write_str("short_code"),
            Self::Other => f.write_str("unknown key"),
        }
    }
}

/// Returns the violated key if `e` is a unique violation.
pub fn unique_violation(e: &sqlx::Error) -> Option<UniqueKey> {
    let db_err = e.as_database_error()?;

    if !db_err.is_unique_violation() {
        return None;
    }

    Some(UniqueKey::from_constraint(db_err.constraint()))
}
