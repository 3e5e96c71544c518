// src/osint/domain.rs
use std::sync::Arc;
use std::time::Duration;
use indicatif::ProgressBar;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use url::Url;

use crate::core::model::{DomainIntel, UNKNOWN};
use crate::engine::ParallelExecutor;
use crate::error::DossierError;
use crate::osint::registry::RegistryLookup;
use crate::osint::resolver::HostResolver;
use crate::utils::with_timeout;

/// Resolves and attributes every URL found in the profile.
///
/// One record per input URL, in input order. Resolution and registry
/// failures stay local to their URL and show up as sentinel values.
pub struct DomainEnricher {
    resolver: Arc<dyn HostResolver>,
    registry: Arc<dyn RegistryLookup>,
    executor: ParallelExecutor,
    lookup_timeout: Duration,
}

impl DomainEnricher {
    pub fn new(
        resolver: Arc<dyn HostResolver>,
        registry: Arc<dyn RegistryLookup>,
        executor: ParallelExecutor,
        lookup_timeout: Duration,
    ) -> Self {
        Self { resolver, registry, executor, lookup_timeout }
    }

    /// Enrich `urls`; only a cancelled run returns fewer records than inputs
    pub async fn enrich(&self, urls: &[String], progress: &ProgressBar) -> Vec<DomainIntel> {
        if urls.is_empty() {
            return Vec::new();
        }

        info!(
            "Scanning {} linked domains with up to {} concurrent lookups",
            urls.len(),
            self.executor.max_concurrent_tasks()
        );
        progress.set_length(urls.len() as u64);

        let resolver = self.resolver.clone();
        let registry = self.registry.clone();
        let timeout = self.lookup_timeout;
        let cancel = self.executor.cancellation().clone();

        let slots = self
            .executor
            .execute(urls.to_vec(), move |url| {
                let resolver = resolver.clone();
                let registry = registry.clone();
                let cancel = cancel.clone();
                async move { enrich_one(resolver.as_ref(), registry.as_ref(), timeout, &cancel, &url).await }
            }, progress)
            .await;

        let cancelled = self.executor.is_cancelled();

        urls.iter()
            .zip(slots)
            .filter_map(|(url, slot)| match slot {
                Some(intel) => Some(intel),
                // Never started because the run was aborted
                None if cancelled => None,
                // The job panicked; account for the URL anyway
                None => Some(DomainIntel::unresolved(url.clone(), host_of(url))),
            })
            .collect()
    }
}

/// Resolve one URL's host and attribute its address.
///
/// The registry is not consulted once `cancel` has fired.
pub async fn enrich_one(
    resolver: &dyn HostResolver,
    registry: &dyn RegistryLookup,
    timeout: Duration,
    cancel: &CancellationToken,
    url: &str,
) -> DomainIntel {
    let host = host_of(url);

    let address = match with_timeout("resolve", timeout, resolver.resolve(&host)).await {
        Ok(address) => address,
        Err(e @ DossierError::TimeoutError { .. }) => {
            warn!("{} for {}", e, host);
            return DomainIntel::unresolved(url, host);
        }
        Err(e) => {
            debug!("Could not resolve {}: {}", host, e);
            return DomainIntel::unresolved(url, host);
        }
    };

    let mut intel = DomainIntel::resolved(url, host, address.to_string());

    if cancel.is_cancelled() {
        debug!("Skipping registry lookup for {} after cancellation", intel.host);
        return intel;
    }

    let lookup = tokio::select! {
        biased;
        _ = cancel.cancelled() => return intel,
        lookup = with_timeout("registry lookup", timeout, registry.lookup(address)) => lookup,
    };

    match lookup {
        Ok(record) => {
            intel.country = record.country.clone().unwrap_or_else(|| UNKNOWN.to_string());
            intel.organization = record.organization.clone().unwrap_or_else(|| UNKNOWN.to_string());
            intel.asn = record.asn_descriptor();
        }
        Err(DossierError::ReservedAddress(ip)) => {
            debug!("{} resolves to reserved address {}", intel.host, ip);
        }
        Err(e) => {
            warn!("Registry lookup failed for {}: {}", intel.host, e);
        }
    }

    intel
}

/// Host part of a URL, falling back to the raw authority when the URL does not parse
pub fn host_of(url: &str) -> String {
    if let Some(host) = Url::parse(url).ok().and_then(|u| u.host_str().map(str::to_string)) {
        return host;
    }

    let rest = url.split_once("://").map(|(_, rest)| rest).unwrap_or(url);
    let authority = rest.split(['/', '?', '#']).next().unwrap_or(rest);
    let host = authority.rsplit('@').next().unwrap_or(authority);
    host.to_string()
}
