//! Scan targets and host resolution.
//!
//! A target is an opaque host string (IPv4/IPv6 literal or hostname). It is
//! resolved through a [`HostResolver`], which is injectable so callers and
//! tests can control how (and whether) a name resolves.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;
use std::sync::Arc;
use trust_dns_resolver::TokioAsyncResolver;

/// A non-empty host string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Target(String);

impl Target {
    /// Create a target, trimming surrounding whitespace. Returns None if empty.
    pub fn new(host: impl AsRef<str>) -> Option<Self> {
        let host = host.as_ref().trim();
        if host.is_empty() {
            None
        } else {
            Some(Self(host.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Target {
    type Err = TargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or(TargetError::Empty)
    }
}

impl AsRef<str> for Target {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Error type for target parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TargetError {
    #[error("target cannot be empty")]
    Empty,
}

/// Error type for host resolution.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("failed to resolve hostname '{0}': {1}")]
    LookupFailed(String, String),
    #[error("no IP addresses found for hostname '{0}'")]
    NoAddresses(String),
}

/// Forward name/address resolution.
///
/// Implementations must be side-effect free; the engine may call `resolve`
/// once per probe.
#[async_trait]
pub trait HostResolver: Send + Sync {
    /// Resolve a host to one or more addresses. IP literals resolve to themselves.
    async fn resolve(&self, host: &str) -> Result<Vec<IpAddr>, ResolveError>;
}

/// Resolver backed by the operating system (`getaddrinfo`), hosts file included.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemResolver;

#[async_trait]
impl HostResolver for SystemResolver {
    async fn resolve(&self, host: &str) -> Result<Vec<IpAddr>, ResolveError> {
        if let Ok(ip) = host.parse::<IpAddr>() {
            return Ok(vec![ip]);
        }

        let addrs = tokio::net::lookup_host((host, 0))
            .await
            .map_err(|e| ResolveError::LookupFailed(host.to_string(), e.to_string()))?;

        let ips: Vec<IpAddr> = addrs.map(|addr| addr.ip()).collect();
        if ips.is_empty() {
            return Err(ResolveError::NoAddresses(host.to_string()));
        }
        Ok(ips)
    }
}

/// Resolver that talks DNS directly using the system's resolver configuration.
pub struct DnsResolver {
    inner: TokioAsyncResolver,
}

impl DnsResolver {
    /// Build from `/etc/resolv.conf` (or the platform equivalent).
    pub fn from_system_conf() -> Result<Self, ResolveError> {
        let inner = TokioAsyncResolver::tokio_from_system_conf()
            .map_err(|e| ResolveError::LookupFailed("<system config>".to_string(), e.to_string()))?;
        Ok(Self { inner })
    }
}

impl fmt::Debug for DnsResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DnsResolver").finish_non_exhaustive()
    }
}

#[async_trait]
impl HostResolver for DnsResolver {
    async fn resolve(&self, host: &str) -> Result<Vec<IpAddr>, ResolveError> {
        let response = self
            .inner
            .lookup_ip(host)
            .await
            .map_err(|e| ResolveError::LookupFailed(host.to_string(), e.to_string()))?;

        let ips: Vec<IpAddr> = response.iter().collect();
        if ips.is_empty() {
            return Err(ResolveError::NoAddresses(host.to_string()));
        }
        Ok(ips)
    }
}

/// Which resolver implementation to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ResolverKind {
    /// Operating system resolver (default)
    #[default]
    System,
    /// Direct DNS queries
    Dns,
}

impl ResolverKind {
    /// Construct the selected resolver.
    pub fn build(self) -> Result<Arc<dyn HostResolver>, ResolveError> {
        Ok(match self {
            Self::System => Arc::new(SystemResolver),
            Self::Dns => Arc::new(DnsResolver::from_system_conf()?),
        })
    }
}

/// Returns true iff `target` resolves to at least one address.
///
/// No reachability check is made: a resolvable but dead host is valid here.
pub async fn is_valid_host(resolver: &dyn HostResolver, target: &str) -> bool {
    let target = target.trim();
    !target.is_empty() && resolver.resolve(target).await.is_ok()
}

/// [`is_valid_host`] using the operating system resolver.
pub async fn is_valid_host_system(target: &str) -> bool {
    is_valid_host(&SystemResolver, target).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[test]
    fn test_target_trims_and_rejects_empty() {
        assert_eq!(Target::new("  example.com ").unwrap().as_str(), "example.com");
        assert!(Target::new("   ").is_none());
        assert_eq!("".parse::<Target>(), Err(TargetError::Empty));
    }

    #[tokio::test]
    async fn test_ip_literal_resolves_to_itself() {
        let ips = SystemResolver.resolve("127.0.0.1").await.unwrap();
        assert_eq!(ips, vec![IpAddr::V4(Ipv4Addr::LOCALHOST)]);
    }

    #[tokio::test]
    async fn test_valid_host() {
        assert!(is_valid_host_system("127.0.0.1").await);
        assert!(is_valid_host_system("::1").await);
        assert!(!is_valid_host_system("").await);
        // .invalid is reserved and never resolves
        assert!(!is_valid_host_system("no-such-host.invalid").await);
    }

    #[tokio::test]
    async fn test_validation_is_repeatable() {
        for _ in 0..3 {
            assert!(is_valid_host_system("127.0.0.1").await);
        }
    }
}
