//! Create-or-fetch and resolve orchestration.

use std::sync::Arc;
use std::time::Duration;

use tokio_retry::RetryIf;
use tokio_retry::strategy::FixedInterval;

use crate::application::services::UrlValidator;
use crate::domain::entities::{NewUrlMapping, UrlMapping};
use crate::domain::host_resolver::HostResolver;
use crate::domain::repositories::MappingRepository;
use crate::error::AppError;
use crate::utils::db_error::UniqueKey;
use crate::utils::url_grammar::host_token;

/// Pause before the single retry of a transient insert failure.
const INSERT_RETRY_DELAY: Duration = Duration::from_millis(50);

/// Service mapping URLs to short codes and back.
///
/// All steps of an operation happen within the calling request; no
/// intermediate state is persisted.
pub struct ResolutionService<M: MappingRepository + ?Sized, R: HostResolver + ?Sized> {
    repository: Arc<M>,
    validator: UrlValidator<R>,
}

/// The service as wired at runtime, with backends chosen by configuration.
pub type DynResolutionService = ResolutionService<dyn MappingRepository, dyn HostResolver>;

impl<M: MappingRepository + ?Sized, R: HostResolver + ?Sized> ResolutionService<M, R> {
    /// Creates a new resolution service.
    pub fn new(repository: Arc<M>, resolver: Arc<R>) -> Self {
        Self {
            repository,
            validator: UrlValidator::new(resolver),
        }
    }

    /// Returns the mapping for `original_url`, creating it if needed.
    ///
    /// # Flow
    ///
    /// 1. Grammar check on the URL as submitted
    /// 2. Existing mapping for the exact URL is returned as-is
    /// 3. Host must resolve
    /// 4. Allocate the next code and insert
    ///
    /// A transient storage failure on insert is retried once. If a
    /// concurrent request inserted the same URL first, its mapping is
    /// returned.
    ///
    /// # Errors
    ///
    /// - [`AppError::MalformedUrl`] if the grammar does not match
    /// - [`AppError::UnresolvableHost`] if the host lookup fails
    /// - [`AppError::StorageFailure`] on backend errors
    pub async fn create(&self, original_url: &str) -> Result<UrlMapping, AppError> {
        let host = host_token(original_url);

        self.validator.check_syntax(original_url)?;

        if let Some(existing) = self.repository.find_by_url(original_url).await? {
            tracing::debug!(
                short_code = existing.short_code,
                "returning existing mapping"
            );
            return Ok(existing);
        }

        self.validator.check_host(host).await?;

        let short_code = self.repository.next_code().await?;
        let new_mapping = NewUrlMapping {
            original_url: original_url.to_string(),
            short_code,
        };

        match self.insert_with_retry(&new_mapping).await {
            Ok(mapping) => {
                tracing::info!(short_code, "created mapping");
                Ok(mapping)
            }
            Err(AppError::Conflict {
                key: UniqueKey::OriginalUrl,
            }) => {
                tracing::debug!(short_code, "lost insert race, re-reading mapping");
                self.repository
                    .find_by_url(original_url)
                    .await?
                    .ok_or_else(|| AppError::storage("mapping missing after url conflict"))
            }
            Err(AppError::Conflict { key }) => Err(AppError::storage(format!(
                "unexpected conflict on {key} for code {short_code}"
            ))),
            Err(e) => Err(e),
        }
    }

    /// Resolves a short code, given as path text, to its mapping.
    ///
    /// The text is parsed as an integer; unparsable input is treated as an
    /// unknown code and never reaches storage.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] if the code is unparsable or unknown
    /// - [`AppError::StorageFailure`] on backend errors
    pub async fn resolve(&self, short_code: &str) -> Result<UrlMapping, AppError> {
        let code: i64 = short_code
            .parse()
            .map_err(|_| AppError::not_found(short_code))?;

        self.repository
            .find_by_code(code)
            .await?
            .ok_or_else(|| AppError::not_found(short_code))
    }

    async fn insert_with_retry(&self, new_mapping: &NewUrlMapping) -> Result<UrlMapping, AppError> {
        let strategy = FixedInterval::new(INSERT_RETRY_DELAY).take(1);

        RetryIf::start(
            strategy,
            || self.repository.insert(new_mapping.clone()),
            |e: &AppError| {
                let transient = e.is_transient();
                if transient {
                    tracing::warn!(error = %e, "transient insert failure, retrying");
                }
                transient
            },
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::host_resolver::{MockHostResolver, ResolveError};
    use crate::domain::repositories::MockMappingRepository;
    use crate::infrastructure::persistence::InMemoryMappingRepository;
    use chrono::Utc;
    use std::net::IpAddr;

    fn mapping(url: &str, code: i64) -> UrlMapping {
        UrlMapping::new(url.to_string(), code, Utc::now())
    }

    fn resolving() -> MockHostResolver {
        let mut resolver = MockHostResolver::new();
        resolver
            .expect_resolve()
            .returning(|_| Ok(vec!["93.184.216.34".parse::<IpAddr>().unwrap()]));
        resolver
    }

    fn transient() -> AppError {
        AppError::StorageFailure {
            message: "connection reset".to_string(),
            transient: true,
        }
    }

    #[tokio::test]
    async fn test_create_new_mapping() {
        let mut repo = MockMappingRepository::new();
        repo.expect_find_by_url().times(1).returning(|_| Ok(None));
        repo.expect_next_code().times(1).returning(|| Ok(0));
        repo.expect_insert()
            .withf(|new| new.original_url == "https://example.com" && new.short_code == 0)
            .times(1)
            .returning(|new| Ok(mapping(&new.original_url, new.short_code)));

        let service = ResolutionService::new(Arc::new(repo), Arc::new(resolving()));
        let created = service.create("https://example.com").await.unwrap();

        assert_eq!(created.original_url, "https://example.com");
        assert_eq!(created.short_code, 0);
    }

    #[tokio::test]
    async fn test_create_returns_existing_without_lookup() {
        let mut repo = MockMappingRepository::new();
        let existing = mapping("https://example.com", 7);
        repo.expect_find_by_url()
            .times(1)
            .returning(move |_| Ok(Some(existing.clone())));
        repo.expect_next_code().times(0);
        repo.expect_insert().times(0);

        let mut resolver = MockHostResolver::new();
        resolver.expect_resolve().times(0);

        let service = ResolutionService::new(Arc::new(repo), Arc::new(resolver));
        let found = service.create("https://example.com").await.unwrap();

        assert_eq!(found.short_code, 7);
    }

    #[tokio::test]
    async fn test_create_malformed_touches_nothing() {
        let mut repo = MockMappingRepository::new();
        repo.expect_find_by_url().times(0);

        let mut resolver = MockHostResolver::new();
        resolver.expect_resolve().times(0);

        let service = ResolutionService::new(Arc::new(repo), Arc::new(resolver));
        let result = service.create("ftp:/bad url with spaces").await;

        assert!(matches!(result, Err(AppError::MalformedUrl { .. })));
    }

    #[tokio::test]
    async fn test_create_unresolvable_allocates_nothing() {
        let mut repo = MockMappingRepository::new();
        repo.expect_find_by_url().times(1).returning(|_| Ok(None));
        repo.expect_next_code().times(0);
        repo.expect_insert().times(0);

        let mut resolver = MockHostResolver::new();
        resolver
            .expect_resolve()
            .withf(|host| host == "this-domain-should-not-exist-xyz123.invalid")
            .times(1)
            .returning(|_| Err(ResolveError::NoAddresses));

        let service = ResolutionService::new(Arc::new(repo), Arc::new(resolver));
        let result = service
            .create("https://this-domain-should-not-exist-xyz123.invalid")
            .await;

        assert!(matches!(result, Err(AppError::UnresolvableHost { .. })));
    }

    #[tokio::test]
    async fn test_create_lookup_failure_is_storage_failure() {
        let mut repo = MockMappingRepository::new();
        repo.expect_find_by_url()
            .times(1)
            .returning(|_| Err(AppError::storage("connection refused")));

        let service = ResolutionService::new(Arc::new(repo), Arc::new(resolving()));
        let result = service.create("https://example.com").await;

        assert!(matches!(result, Err(AppError::StorageFailure { .. })));
    }

    #[tokio::test]
    async fn test_create_retries_transient_insert_once() {
        let mut repo = MockMappingRepository::new();
        repo.expect_find_by_url().times(1).returning(|_| Ok(None));
        repo.expect_next_code().times(1).returning(|| Ok(3));

        let mut seq = mockall::Sequence::new();
        repo.expect_insert()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(transient()));
        repo.expect_insert()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|new| Ok(mapping(&new.original_url, new.short_code)));

        let service = ResolutionService::new(Arc::new(repo), Arc::new(resolving()));
        let created = service.create("https://example.com").await.unwrap();

        assert_eq!(created.short_code, 3);
    }

    #[tokio::test]
    async fn test_create_gives_up_after_one_retry() {
        let mut repo = MockMappingRepository::new();
        repo.expect_find_by_url().times(1).returning(|_| Ok(None));
        repo.expect_next_code().times(1).returning(|| Ok(0));
        repo.expect_insert().times(2).returning(|_| Err(transient()));

        let service = ResolutionService::new(Arc::new(repo), Arc::new(resolving()));
        let result = service.create("https://example.com").await;

        assert!(matches!(result, Err(AppError::StorageFailure { .. })));
    }

    #[tokio::test]
    async fn test_create_does_not_retry_permanent_failure() {
        let mut repo = MockMappingRepository::new();
        repo.expect_find_by_url().times(1).returning(|_| Ok(None));
        repo.expect_next_code().times(1).returning(|| Ok(0));
        repo.expect_insert()
            .times(1)
            .returning(|_| Err(AppError::storage("value too long")));

        let service = ResolutionService::new(Arc::new(repo), Arc::new(resolving()));
        let result = service.create("https://example.com").await;

        assert!(matches!(result, Err(AppError::StorageFailure { .. })));
    }

    #[tokio::test]
    async fn test_create_url_conflict_returns_winner() {
        let mut repo = MockMappingRepository::new();
        let winner = mapping("https://example.com", 4);

        let mut seq = mockall::Sequence::new();
        repo.expect_find_by_url()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(None));
        repo.expect_find_by_url()
            .times(1)
            .in_sequence(&mut seq)
            .returning(move |_| Ok(Some(winner.clone())));
        repo.expect_next_code().times(1).returning(|| Ok(5));
        repo.expect_insert().times(1).returning(|_| {
            Err(AppError::Conflict {
                key: UniqueKey::OriginalUrl,
            })
        });

        let service = ResolutionService::new(Arc::new(repo), Arc::new(resolving()));
        let result = service.create("https://example.com").await.unwrap();

        assert_eq!(result.short_code, 4);
    }

    #[tokio::test]
    async fn test_create_code_conflict_is_storage_failure() {
        let mut repo = MockMappingRepository::new();
        repo.expect_find_by_url().times(1).returning(|_| Ok(None));
        repo.expect_next_code().times(1).returning(|| Ok(0));
        repo.expect_insert().times(1).returning(|_| {
            Err(AppError::Conflict {
                key: UniqueKey::ShortCode,
            })
        });

        let service = ResolutionService::new(Arc::new(repo), Arc::new(resolving()));
        let result = service.create("https://example.com").await;

        assert!(matches!(result, Err(AppError::StorageFailure { .. })));
    }

    #[tokio::test]
    async fn test_resolve_found() {
        let mut repo = MockMappingRepository::new();
        repo.expect_find_by_code()
            .withf(|code| *code == 12)
            .times(1)
            .returning(|code| Ok(Some(mapping("https://example.com/target", code))));

        let service = ResolutionService::new(Arc::new(repo), Arc::new(MockHostResolver::new()));
        let found = service.resolve("12").await.unwrap();

        assert_eq!(found.original_url, "https://example.com/target");
    }

    #[tokio::test]
    async fn test_resolve_unknown_code() {
        let mut repo = MockMappingRepository::new();
        repo.expect_find_by_code().times(1).returning(|_| Ok(None));

        let service = ResolutionService::new(Arc::new(repo), Arc::new(MockHostResolver::new()));
        let result = service.resolve("99999").await;

        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_resolve_unparsable_code_skips_storage() {
        let mut repo = MockMappingRepository::new();
        repo.expect_find_by_code().times(0);

        let service = ResolutionService::new(Arc::new(repo), Arc::new(MockHostResolver::new()));

        for input in ["abc", "", "1.5", "99999999999999999999999"] {
            let result = service.resolve(input).await;
            assert!(matches!(result, Err(AppError::NotFound { .. })));
        }
    }

    #[tokio::test]
    async fn test_sequential_codes_and_idempotence() {
        let service = ResolutionService::new(
            Arc::new(InMemoryMappingRepository::new()),
            Arc::new(resolving()),
        );

        let first = service.create("https://example.com").await.unwrap();
        let second = service.create("https://rust-lang.org").await.unwrap();
        let again = service.create("https://example.com").await.unwrap();

        assert_eq!(first.short_code, 0);
        assert_eq!(second.short_code, 1);
        assert_eq!(again.short_code, 0);
    }

    #[tokio::test]
    async fn test_round_trip() {
        let service = ResolutionService::new(
            Arc::new(InMemoryMappingRepository::new()),
            Arc::new(resolving()),
        );

        let created = service
            .create("https://Example.com/Some/Path?q=1")
            .await
            .unwrap();
        let resolved = service
            .resolve(&created.short_code.to_string())
            .await
            .unwrap();

        assert_eq!(resolved.original_url, "https://Example.com/Some/Path?q=1");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_creates_get_unique_codes() {
        let service = Arc::new(ResolutionService::new(
            Arc::new(InMemoryMappingRepository::new()),
            Arc::new(resolving()),
        ));
        let mut tasks = tokio::task::JoinSet::new();

        for i in 0..32 {
            let service = service.clone();
            tasks.spawn(async move {
                service
                    .create(&format!("https://example.com/page/{i}"))
                    .await
                    .unwrap()
                    .short_code
            });
        }

        let mut codes = Vec::new();
        while let Some(code) = tasks.join_next().await {
            codes.push(code.unwrap());
        }
        codes.sort_unstable();

        assert_eq!(codes, (0..32).collect::<Vec<i64>>());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_same_url_yields_one_mapping() {
        let repo = Arc::new(InMemoryMappingRepository::new());
        let service = Arc::new(ResolutionService::new(repo.clone(), Arc::new(resolving())));
        let mut tasks = tokio::task::JoinSet::new();

        for _ in 0..16 {
            let service = service.clone();
            tasks.spawn(async move {
                service
                    .create("https://example.com")
                    .await
                    .unwrap()
                    .short_code
            });
        }

        let mut codes = Vec::new();
        while let Some(code) = tasks.join_next().await {
            codes.push(code.unwrap());
        }
        codes.dedup();

        assert_eq!(codes.len(), 1);
        assert_eq!(repo.count().await.unwrap(), 1);
    }
}
