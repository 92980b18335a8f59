//! Host resolution through an async DNS client.

use async_trait::async_trait;
use hickory_resolver::TokioAsyncResolver as DnsResolver;
use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use std::net::IpAddr;
use std::time::Duration;
use tokio::time::timeout;

use crate::domain::host_resolver::{HostResolver, ResolveError};

/// Default budget for a single lookup.
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

/// Resolves hosts against the system's configured nameservers, bounded by a
/// timeout.
///
/// Lookups run on the tokio runtime, so a lookup that exceeds the timeout is
/// dropped along with its future and holds no thread afterwards.
pub struct SystemResolver {
    inner: DnsResolver,
    timeout: Duration,
}

impl SystemResolver {
    /// Builds a resolver from the host's DNS configuration (`/etc/resolv.conf`
    /// on Unix).
    ///
    /// # Errors
    ///
    /// Returns an error if the system configuration cannot be read.
    pub fn from_system_conf(timeout: Duration) -> anyhow::Result<Self> {
        Ok(Self {
            inner: DnsResolver::tokio_from_system_conf()?,
            timeout,
        })
    }

    /// Builds a resolver that queries the nameservers in `config`.
    pub fn with_config(config: ResolverConfig, timeout: Duration) -> Self {
        Self {
            inner: DnsResolver::tokio(config, ResolverOpts::default()),
            timeout,
        }
    }

    async fn lookup(&self, host: &str) -> Result<Vec<IpAddr>, ResolveError> {
        let lookup = timeout(self.timeout, self.inner.lookup_ip(host))
            .await
            .map_err(|_| ResolveError::TimedOut(self.timeout))?
            .map_err(|e| ResolveError::LookupFailed(e.to_string()))?;

        let mut ips: Vec<IpAddr> = Vec::new();
        for ip in lookup.iter() {
            if !ips.contains(&ip) {
                ips.push(ip);
            }
        }

        Ok(ips)
    }
}

#[async_trait]
impl HostResolver for SystemResolver {
    async fn resolve(&self, host: &str) -> Result<Vec<IpAddr>, ResolveError> {
        if host.is_empty() {
            return Err(ResolveError::EmptyHost);
        }

        let ips = match host.parse::<IpAddr>() {
            Ok(ip) => vec![ip],
            Err(_) => self.lookup(host).await?,
        };

        if ips.is_empty() {
            Err(ResolveError::NoAddresses)
        } else {
            Ok(ips)
        }
    }
}
