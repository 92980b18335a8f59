//! Two-stage URL validation: grammar first, then DNS.

use std::sync::Arc;

use crate::domain::host_resolver::HostResolver;
use crate::error::AppError;
use crate::utils::url_grammar::{host_token, is_well_formed};

/// Decides whether a submitted string is an acceptable URL.
///
/// A URL is acceptable when it matches the grammar in
/// [`crate::utils::url_grammar`] and its host resolves to at least one
/// address. Shape alone is not enough.
pub struct UrlValidator<R: HostResolver + ?Sized> {
    resolver: Arc<R>,
}

impl<R: HostResolver + ?Sized> UrlValidator<R> {
    /// Creates a validator backed by `resolver`.
    pub fn new(resolver: Arc<R>) -> Self {
        Self { resolver }
    }

    /// Runs both stages on `url` in one call.
    ///
    /// For callers with nothing to do between the stages. Create-or-fetch
    /// looks up existing mappings after the grammar check and before any DNS
    /// traffic, so it calls [`Self::check_syntax`] and [`Self::check_host`]
    /// separately.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::MalformedUrl`] if the grammar does not match (the
    /// resolver is not consulted), or [`AppError::UnresolvableHost`] if the
    /// host lookup fails.
    pub async fn validate(&self, url: &str) -> Result<(), AppError> {
        self.check_syntax(url)?;
        self.check_host(host_token(url)).await
    }

    /// Stage one: grammar check.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::MalformedUrl`] on mismatch.
    pub fn check_syntax(&self, url: &str) -> Result<(), AppError> {
        if is_well_formed(url) {
            Ok(())
        } else {
            Err(AppError::malformed(url))
        }
    }

    /// Stage two: the host must resolve.
    ///
    /// An empty host is rejected without calling the resolver.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::UnresolvableHost`] if the host is empty or its
    /// lookup fails.
    pub async fn check_host(&self, host: &str) -> Result<(), AppError> {
        if host.is_empty() {
            return Err(AppError::unresolvable(host, "empty host"));
        }

        match self.resolver.resolve(host).await {
            Ok(addrs) => {
                tracing::debug!(host, addresses = addrs.len(), "host resolved");
                Ok(())
            }
            Err(e) => Err(AppError::unresolvable(host, e)),
        }
    }
}
