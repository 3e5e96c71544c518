// src/osint/resolver.rs
use std::net::IpAddr;
use std::time::Duration;
use async_trait::async_trait;
use hickory_resolver::TokioAsyncResolver;
use hickory_resolver::config::{LookupIpStrategy, ResolverConfig, ResolverOpts};
#[cfg(test)]
use mockall::automock;
use tracing::debug;

use crate::error::{DossierError, DossierResult};

/// Turns a host name into a network address
#[cfg_attr(test, automock)]
#[async_trait]
pub trait HostResolver: Send + Sync {
    async fn resolve(&self, host: &str) -> DossierResult<IpAddr>;
}

/// Looks up TXT records, used for ASN queries
#[cfg_attr(test, automock)]
#[async_trait]
pub trait TxtLookup: Send + Sync {
    async fn txt(&self, name: &str) -> DossierResult<Vec<String>>;
}

/// System-configured DNS resolver
pub struct DnsResolver {
    resolver: TokioAsyncResolver,
}

impl DnsResolver {
    /// Build from the host's resolv.conf, falling back to public defaults
    pub fn new(timeout: Duration) -> Self {
        let (config, mut opts) = match hickory_resolver::system_conf::read_system_conf() {
            Ok(system) => system,
            Err(e) => {
                debug!("No usable system DNS configuration ({}), using defaults", e);
                (ResolverConfig::default(), ResolverOpts::default())
            }
        };

        // Prefer IPv4 like a classic gethostbyname
        opts.ip_strategy = LookupIpStrategy::Ipv4thenIpv6;
        opts.timeout = timeout;
        opts.attempts = 1;

        Self {
            resolver: TokioAsyncResolver::tokio(config, opts),
        }
    }
}

#[async_trait]
impl HostResolver for DnsResolver {
    async fn resolve(&self, host: &str) -> DossierResult<IpAddr> {
        // Literal addresses need no lookup
        if let Ok(ip) = host.trim_start_matches('[').trim_end_matches(']').parse::<IpAddr>() {
            return Ok(ip);
        }

        let lookup = self.resolver.lookup_ip(host).await.map_err(|e| DossierError::ResolutionError {
            host: host.to_string(),
            message: e.to_string(),
        })?;

        lookup.iter().next().ok_or_else(|| DossierError::ResolutionError {
            host: host.to_string(),
            message: "no addresses returned".to_string(),
        })
    }
}

#[async_trait]
impl TxtLookup for DnsResolver {
    async fn txt(&self, name: &str) -> DossierResult<Vec<String>> {
        let lookup = self.resolver.txt_lookup(name).await.map_err(|e| DossierError::ResolutionError {
            host: name.to_string(),
            message: e.to_string(),
        })?;

        Ok(lookup
            .iter()
            .map(|record| {
                record
                    .txt_data()
                    .iter()
                    .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
                    .collect::<String>()
            })
            .collect())
    }
}
