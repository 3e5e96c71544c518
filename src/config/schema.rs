use serde::{Serialize, Deserialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub global: GlobalConfig,
    pub target: TargetConfig,
    pub patterns: PatternConfig,
    pub registry: RegistryConfig,
    #[serde(default)]
    pub phone: PhoneConfig,
    pub image: ImageConfig,
    pub links: LinksConfig,
}

/// Global configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalConfig {
    pub user_agents: Vec<String>,
    pub request_timeout_secs: u64,
    pub lookup_timeout_secs: u64,
    pub max_concurrent_lookups: usize,
}

impl GlobalConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_secs(self.lookup_timeout_secs)
    }

    /// Worker count for enrichment lookups, never zero
    pub fn concurrency(&self) -> usize {
        match self.max_concurrent_lookups {
            0 => (num_cpus::get() * 2).min(16),
            n => n,
        }
    }
}

/// Where the profile lives and how its page is laid out
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetConfig {
    pub base_url: String,
    pub title_selector: String,
    pub description_selector: String,
    pub photo_selector: String,
}

/// Lexical patterns used by the extractor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternConfig {
    pub email: String,
    pub url: String,
    pub phone: String,
}

/// Registry lookup endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    pub rdap_base_url: String,
    pub asn_origin_zone: String,
    pub asn_origin6_zone: String,
    pub asn_peer_zone: String,
    #[serde(default)]
    pub reserved_networks: Vec<String>,
}

/// Phone enrichment tables
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PhoneConfig {
    /// E.164 prefix (with `+`) -> carrier name
    #[serde(default)]
    pub carriers: BTreeMap<String, String>,
}

/// Image forensics settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageConfig {
    #[serde(default)]
    pub excluded_tags: Vec<String>,
    #[serde(default)]
    pub details: bool,
    pub reverse_search_template: String,
}

/// Cross-platform search templates
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinksConfig {
    #[serde(default)]
    pub platforms: Vec<PlatformTemplate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformTemplate {
    pub label: String,
    /// URL with a `{query}` placeholder
    pub template: String,
}
