//! Process-local mapping repository.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;

use crate::domain::entities::{NewUrlMapping, UrlMapping};
use crate::domain::repositories::MappingRepository;
use crate::error::AppError;
use crate::utils::db_error::UniqueKey;

/// In-memory repository for development and tests.
///
/// Both indexes are updated under a single write lock, so the URL and code
/// uniqueness rules hold under concurrent inserts. Data is lost on restart.
#[derive(Default)]
pub struct InMemoryMappingRepository {
    next_code: AtomicI64,
    mappings: RwLock<Mappings>,
}

#[derive(Default)]
struct Mappings {
    by_code: BTreeMap<i64, UrlMapping>,
    code_by_url: HashMap<String, i64>,
}

impl InMemoryMappingRepository {
    /// Creates an empty repository whose first code is 0.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MappingRepository for InMemoryMappingRepository {
    async fn find_by_url(&self, original_url: &str) -> Result<Option<UrlMapping>, AppError> {
        let mappings = self.mappings.read().await;

        Ok(mappings
            .code_by_url
            .get(original_url)
            .and_then(|code| mappings.by_code.get(code))
            .cloned())
    }

    async fn find_by_code(&self, short_code: i64) -> Result<Option<UrlMapping>, AppError> {
        Ok(self.mappings.read().await.by_code.get(&short_code).cloned())
    }

    async fn next_code(&self) -> Result<i64, AppError> {
        Ok(self.next_code.fetch_add(1, Ordering::Relaxed))
    }

    async fn insert(&self, new_mapping: NewUrlMapping) -> Result<UrlMapping, AppError> {
        let mut mappings = self.mappings.write().await;

        if mappings.code_by_url.contains_key(&new_mapping.original_url) {
            return Err(AppError::Conflict {
                key: UniqueKey::OriginalUrl,
            });
        }
        if mappings.by_code.contains_key(&new_mapping.short_code) {
            return Err(AppError::Conflict {
                key: UniqueKey::ShortCode,
            });
        }

        let mapping = UrlMapping::new(new_mapping.original_url, new_mapping.short_code, Utc::now());
        mappings
            .code_by_url
            .insert(mapping.original_url.clone(), mapping.short_code);
        mappings.by_code.insert(mapping.short_code, mapping.clone());

        Ok(mapping)
    }

    async fn count(&self) -> Result<i64, AppError> {
        Ok(self.mappings.read().await.by_code.len() as i64)
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}
