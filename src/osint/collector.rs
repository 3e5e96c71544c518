// src/osint/collector.rs
use std::sync::Arc;
use chrono::{DateTime, Utc};
use indicatif::{ProgressBar, ProgressStyle};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::core::model::{Artifacts, DomainIntel, ExifTags, IntelRecord, PhoneIntel, ProfilePage};
use crate::engine::ParallelExecutor;
use crate::error::{DossierError, DossierResult};
use crate::osint::domain::DomainEnricher;
use crate::osint::dossier::{self, DossierParts};
use crate::osint::extractor::PatternExtractor;
use crate::osint::fingerprint::fingerprint;
use crate::osint::image::{ImageForensics, ImageSource};
use crate::osint::links::LinkBuilder;
use crate::osint::page::{normalize_identifier, PageLoader};
use crate::osint::phone::PhoneEnricher;
use crate::osint::registry::RegistryLookup;
use crate::osint::resolver::HostResolver;

/// External collaborators the collector talks to
pub struct Collaborators {
    pub page_loader: Arc<dyn PageLoader>,
    pub resolver: Arc<dyn HostResolver>,
    pub registry: Arc<dyn RegistryLookup>,
    pub image_source: Arc<dyn ImageSource>,
}

/// Runs the extraction and enrichment stages for one target.
///
/// Stages run in a fixed order: page, patterns, domains, phones, image,
/// fingerprints, links. Only a page failure is fatal. Cancellation is
/// checked between stages and races every network-bound stage.
pub struct IntelCollector {
    page_loader: Arc<dyn PageLoader>,
    extractor: PatternExtractor,
    domains: DomainEnricher,
    phones: PhoneEnricher,
    image: ImageForensics,
    links: LinkBuilder,
    cancel: CancellationToken,
    show_progress: bool,
}

/// Stage outputs gathered so far
#[derive(Default)]
struct Collected {
    domains: Vec<DomainIntel>,
    phones: Vec<PhoneIntel>,
    exif: ExifTags,
}

impl IntelCollector {
    pub fn new(config: &Config, collaborators: Collaborators, cancel: CancellationToken) -> DossierResult<Self> {
        let lookup_timeout = config.global.lookup_timeout();
        let executor = ParallelExecutor::new(config.global.concurrency(), cancel.clone());

        Ok(Self {
            page_loader: collaborators.page_loader,
            extractor: PatternExtractor::new(&config.patterns)?,
            domains: DomainEnricher::new(
                collaborators.resolver,
                collaborators.registry,
                executor,
                lookup_timeout,
            ),
            phones: PhoneEnricher::new(&config.phone),
            image: ImageForensics::new(collaborators.image_source, &config.image, lookup_timeout),
            links: LinkBuilder::new(&config.links, &config.image),
            cancel,
            show_progress: true,
        })
    }

    /// Draw progress bars on stderr (they stay hidden when it is not a terminal)
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub async fn collect(&self, identifier: &str) -> DossierResult<IntelRecord> {
        let identifier = normalize_identifier(identifier);
        if identifier.is_empty() {
            return Err(DossierError::InvalidInput("Identifier must not be empty".to_string()));
        }

        let collected_at = Utc::now();

        let page = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                return Err(DossierError::Aborted { partial: None });
            }
            page = self.page_loader.load(&identifier) => page?,
        };

        let biography = dossier::biography_of(&page);
        let artifacts = self.extractor.extract(&biography);
        if artifacts.is_empty() {
            debug!("No artifacts found in the biography");
        }

        let mut collected = Collected::default();

        let bar = self.progress_bar("Domains");
        collected.domains = self.domains.enrich(&artifacts.urls, &bar).await;
        bar.finish_and_clear();
        if self.cancel.is_cancelled() {
            return Err(self.abort(&identifier, collected_at, &page, &artifacts, collected));
        }

        let bar = self.progress_bar("Phones");
        collected.phones = self.phones.enrich(&artifacts.phone_candidates, &bar);
        bar.finish_and_clear();

        collected.exif = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => ExifTags::new(),
            tags = self.image.analyze(page.photo_url.as_deref()) => tags,
        };
        if self.cancel.is_cancelled() {
            return Err(self.abort(&identifier, collected_at, &page, &artifacts, collected));
        }

        let record = self.finish(&identifier, collected_at, &page, &artifacts, collected);
        info!(
            "Dossier compiled: {} emails, {} domains, {} phones, {} EXIF tags",
            record.emails_found.len(),
            record.linked_domains.len(),
            record.phone_intel.len(),
            record.exif_data.len()
        );

        Ok(record)
    }

    /// Fingerprints and links are offline, so the remaining stages always complete
    fn finish(
        &self,
        identifier: &str,
        collected_at: DateTime<Utc>,
        page: &ProfilePage,
        artifacts: &Artifacts,
        collected: Collected,
    ) -> IntelRecord {
        let fingerprints = fingerprint(&dossier::display_name_of(page), &dossier::biography_of(page));

        let parts = DossierParts {
            emails: artifacts.emails.clone(),
            domains: collected.domains,
            phones: collected.phones,
            exif: collected.exif,
            reverse_image_search_url: self.links.reverse_image_link(page.photo_url.as_deref()),
            cross_platform_links: self.links.build_links(identifier),
            fingerprints,
        };

        dossier::assemble(identifier, collected_at, page, parts)
    }

    fn abort(
        &self,
        identifier: &str,
        collected_at: DateTime<Utc>,
        page: &ProfilePage,
        artifacts: &Artifacts,
        collected: Collected,
    ) -> DossierError {
        warn!("Collection interrupted, returning partial dossier");
        let partial = self.finish(identifier, collected_at, page, artifacts, collected);
        DossierError::Aborted { partial: Some(Box::new(partial)) }
    }

    fn progress_bar(&self, message: &'static str) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let bar = ProgressBar::new(0);
        let style = ProgressStyle::default_bar()
            .template("{msg:>8} [{bar:30.cyan/blue}] {pos}/{len}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        bar.set_style(style);
        bar.set_message(message);
        bar
    }
}
