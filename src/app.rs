// src/app.rs
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::core::model::IntelRecord;
use crate::error::{DossierError, DossierResult};
use crate::osint::{Collaborators, DnsResolver, IntelCollector, RdapRegistry, WebPageLoader};
use crate::reporting::{JsonReportGenerator, TerminalRenderer};
use crate::utils::HttpClient;

/// Per-invocation options coming from the command line
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub output: Option<PathBuf>,
    pub show_banner: bool,
    pub show_progress: bool,
}

/// Outcome of a completed run
#[derive(Debug)]
pub struct RunReport {
    pub record: IntelRecord,
    /// Where the dossier was written, if it was
    pub saved_to: Option<PathBuf>,
}

/// Main application: wires the live collaborators and report sinks
pub struct App {
    collector: IntelCollector,
    renderer: TerminalRenderer,
    json: JsonReportGenerator,
    options: RunOptions,
}

impl App {
    /// Build against the real network
    pub fn new(config: &Config, options: RunOptions, cancel: CancellationToken) -> DossierResult<Self> {
        let http = HttpClient::new(&config.global.user_agents, config.global.request_timeout())?;
        info!("Using user agent: {}", http.user_agent());

        let dns = Arc::new(DnsResolver::new(config.global.lookup_timeout()));
        let registry = RdapRegistry::new(http.clone(), dns.clone(), config.registry.clone())?;
        let page_loader = WebPageLoader::new(http.clone(), config.target.clone())?;

        let collaborators = Collaborators {
            page_loader: Arc::new(page_loader),
            resolver: dns,
            registry: Arc::new(registry),
            image_source: Arc::new(http),
        };

        Self::with_collaborators(config, collaborators, options, cancel)
    }

    /// Build against caller-supplied collaborators
    pub fn with_collaborators(
        config: &Config,
        collaborators: Collaborators,
        options: RunOptions,
        cancel: CancellationToken,
    ) -> DossierResult<Self> {
        let collector = IntelCollector::new(config, collaborators, cancel)?.with_progress(options.show_progress);

        Ok(Self {
            collector,
            renderer: TerminalRenderer::new(options.show_banner),
            json: JsonReportGenerator::new(),
            options,
        })
    }

    pub fn renderer(&self) -> &TerminalRenderer {
        &self.renderer
    }

    /// Collect, render and optionally persist one dossier.
    ///
    /// A failed write is logged and leaves `saved_to` empty.
    pub async fn run(&self, identifier: &str) -> DossierResult<RunReport> {
        let record = self.collector.collect(identifier).await?;

        self.renderer
            .render(&record)
            .map_err(|e| DossierError::UnexpectedError(format!("Failed to render dossier: {}", e)))?;

        let saved_to = match &self.options.output {
            Some(destination) => self.persist(&record, destination).await,
            None => None,
        };

        Ok(RunReport { record, saved_to })
    }

    async fn persist(&self, record: &IntelRecord, destination: &Path) -> Option<PathBuf> {
        match self.json.generate(record, destination).await {
            Ok(path) => Some(path),
            Err(e) => {
                error!("Could not save dossier: {}", e);
                None
            }
        }
    }
}

/// Turns interrupt signals into cancellation.
///
/// The first signal cancels `cancel` so in-flight lookups can finish. A
/// second signal returns `true` and the caller should exit at once.
/// Returns `false` when `next_signal` reports the signal stream has ended.
pub async fn watch_interrupts<F, Fut>(mut next_signal: F, cancel: CancellationToken) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    if !next_signal().await {
        return false;
    }
    warn!("Interrupt received, finishing in-flight lookups (press Ctrl-C again to quit now)");
    cancel.cancel();

    if !next_signal().await {
        return false;
    }
    warn!("Second interrupt received, exiting");
    true
}
