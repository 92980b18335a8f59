//! Repository trait for url mapping storage.

use crate::domain::entities::{NewUrlMapping, UrlMapping};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for url mappings.
///
/// Implementations own the short-code counter as well as the records, so
/// that allocation and uniqueness are enforced in one place.
///
/// "Not found" is always `Ok(None)`; `Err` is reserved for backend failures.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgMappingRepository`] - PostgreSQL
/// - [`crate::infrastructure::persistence::InMemoryMappingRepository`] - process-local
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MappingRepository: Send + Sync {
    /// Finds a mapping by exact match on the original URL.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StorageFailure`] on backend errors.
    async fn find_by_url(&self, original_url: &str) -> Result<Option<UrlMapping>, AppError>;

    /// Finds a mapping by its short code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StorageFailure`] on backend errors.
    async fn find_by_code(&self, short_code: i64) -> Result<Option<UrlMapping>, AppError>;

    /// Allocates the next short code.
    ///
    /// Codes start at 0 and increase by one per call. Concurrent callers
    /// never receive the same value; a code is consumed even if the
    /// subsequent insert fails.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StorageFailure`] on backend errors.
    async fn next_code(&self) -> Result<i64, AppError>;

    /// Persists a new mapping.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the URL or the code is already taken.
    /// Returns [`AppError::StorageFailure`] on any other write failure.
    async fn insert(&self, new_mapping: NewUrlMapping) -> Result<UrlMapping, AppError>;

    /// Counts stored mappings.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StorageFailure`] on backend errors.
    async fn count(&self) -> Result<i64, AppError>;

    /// Verifies the backend is reachable.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StorageFailure`] if it is not.
    async fn ping(&self) -> Result<(), AppError>;
}
