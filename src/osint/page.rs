// src/osint/page.rs
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use scraper::{ElementRef, Html, Node, Selector};
use tracing::{debug, info};
use url::Url;

use crate::config::TargetConfig;
use crate::core::model::ProfilePage;
use crate::error::{DossierError, DossierResult};
use crate::utils::HttpClient;

/// Fetches a profile and pulls out its basic identifiers
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PageLoader: Send + Sync {
    async fn load(&self, identifier: &str) -> DossierResult<ProfilePage>;
}

/// Strip the leading `@` people tend to type
pub fn normalize_identifier(identifier: &str) -> String {
    identifier.trim().trim_start_matches('@').to_string()
}

/// Loads public profile pages over HTTP
pub struct WebPageLoader {
    http: HttpClient,
    config: TargetConfig,
    selectors: PageSelectors,
}

struct PageSelectors {
    title: Selector,
    description: Selector,
    photo: Selector,
}

impl PageSelectors {
    fn new(config: &TargetConfig) -> DossierResult<Self> {
        Ok(Self {
            title: selector(&config.title_selector)?,
            description: selector(&config.description_selector)?,
            photo: selector(&config.photo_selector)?,
        })
    }
}

fn selector(css: &str) -> DossierResult<Selector> {
    Selector::parse(css).map_err(|e| DossierError::ConfigError(format!("Invalid selector {:?}: {}", css, e)))
}

impl WebPageLoader {
    pub fn new(http: HttpClient, config: TargetConfig) -> DossierResult<Self> {
        let selectors = PageSelectors::new(&config)?;
        Ok(Self { http, config, selectors })
    }

    pub fn target_url(&self, identifier: &str) -> DossierResult<Url> {
        let mut url = Url::parse(&self.config.base_url)
            .map_err(|e| DossierError::ConfigError(format!("Invalid target base URL: {}", e)))?;
        // the identifier is always one path segment, never a URL of its own
        url.path_segments_mut()
            .map_err(|_| DossierError::ConfigError(format!("Target base URL cannot carry a path: {}", self.config.base_url)))?
            .pop_if_empty()
            .push(identifier);
        Ok(url)
    }

    fn parse(&self, html: &str, page_url: &Url) -> ProfilePage {
        let document = Html::parse_document(html);

        let text_of = |selector: &Selector| {
            document
                .select(selector)
                .next()
                .map(|el| visible_text(el).trim().to_string())
        };

        let photo_url = document
            .select(&self.selectors.photo)
            .next()
            .and_then(|el| el.value().attr("src"))
            .and_then(|src| page_url.join(src).ok())
            .map(|url| url.to_string());

        ProfilePage {
            display_name: text_of(&self.selectors.title),
            biography: text_of(&self.selectors.description),
            photo_url,
        }
    }
}

/// Text content with `<br>` kept as line breaks
fn visible_text(element: ElementRef<'_>) -> String {
    let mut text = String::new();
    for node in element.descendants() {
        match node.value() {
            Node::Text(t) => text.push_str(t),
            Node::Element(e) if e.name() == "br" => text.push('\n'),
            _ => {}
        }
    }
    text
}

#[async_trait]
impl PageLoader for WebPageLoader {
    async fn load(&self, identifier: &str) -> DossierResult<ProfilePage> {
        let page_error = |message: String| DossierError::PageLoad {
            identifier: identifier.to_string(),
            message,
        };

        let url = self.target_url(identifier).map_err(|e| page_error(e.to_string()))?;
        info!("Initializing reconnaissance on target: @{}", identifier);

        let html = self.http.get_text(url.as_str()).await.map_err(|e| page_error(e.to_string()))?;
        debug!("Fetched {} bytes from {}", html.len(), url);

        let page = self.parse(&html, &url);
        info!("Target profile acquired");
        Ok(page)
    }
}
