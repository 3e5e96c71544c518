// src/osint/links.rs
use url::form_urlencoded;

use crate::config::{ImageConfig, LinksConfig, PlatformTemplate};
use crate::core::model::CrossPlatformLinks;

/// Builds search URLs for the identifier on other platforms.
///
/// Pure string construction; nothing is fetched or checked for liveness.
#[derive(Debug, Clone)]
pub struct LinkBuilder {
    platforms: Vec<PlatformTemplate>,
    reverse_search_template: String,
}

impl LinkBuilder {
    pub fn new(links: &LinksConfig, image: &ImageConfig) -> Self {
        Self {
            platforms: links.platforms.clone(),
            reverse_search_template: image.reverse_search_template.clone(),
        }
    }

    pub fn build_links(&self, identifier: &str) -> CrossPlatformLinks {
        let query = encode(identifier);
        self.platforms
            .iter()
            .map(|p| (p.label.clone(), p.template.replace("{query}", &query)))
            .collect()
    }

    /// Reverse-image lookup for the profile photo, if there is one
    pub fn reverse_image_link(&self, photo_url: Option<&str>) -> Option<String> {
        photo_url.map(|url| self.reverse_search_template.replace("{url}", &encode(url)))
    }
}

/// Form-encode a value (spaces become `+`)
fn encode(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes()).collect()
}
