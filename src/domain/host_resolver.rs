//! DNS resolution seam used by the URL validator.

use async_trait::async_trait;
use std::net::IpAddr;
use std::time::Duration;

/// Errors that can occur while resolving a host.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("empty host")]
    EmptyHost,

    #[error("lookup failed: {0}")]
    LookupFailed(String),

    #[error("resolver returned no addresses")]
    NoAddresses,

    #[error("lookup timed out after {0:?}")]
    TimedOut(Duration),
}

/// Resolves host names to network addresses.
///
/// # Implementations
///
/// - [`crate::infrastructure::dns::SystemResolver`] - system resolver with a timeout
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HostResolver: Send + Sync {
    /// Resolves `host` to at least one address.
    ///
    /// # Errors
    ///
    /// Returns a [`ResolveError`] when the host is empty, unknown, has no
    /// addresses, or the lookup does not finish in time.
    async fn resolve(&self, host: &str) -> Result<Vec<IpAddr>, ResolveError>;
}
