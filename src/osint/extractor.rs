// src/osint/extractor.rs
use regex::Regex;
use tracing::debug;

use crate::config::PatternConfig;
use crate::core::model::Artifacts;
use crate::error::{DossierError, DossierResult};

/// Characters that end a sentence rather than a URL
const URL_TRAILING_PUNCTUATION: &[char] = &[',', ';', '.', '!', '?', ')', ']', '}', '\'', '"'];

/// Pulls email, URL and phone-shaped candidates out of free text.
///
/// Patterns are compiled once from configuration. Matches are returned in
/// order of appearance and duplicates are kept.
#[derive(Debug, Clone)]
pub struct PatternExtractor {
    email: Regex,
    url: Regex,
    phone: Regex,
}

impl PatternExtractor {
    pub fn new(patterns: &PatternConfig) -> DossierResult<Self> {
        Ok(Self {
            email: compile("email", &patterns.email)?,
            url: compile("url", &patterns.url)?,
            phone: compile("phone", &patterns.phone)?,
        })
    }

    pub fn extract(&self, text: &str) -> Artifacts {
        let artifacts = Artifacts {
            emails: self.emails(text),
            urls: self.urls(text),
            phone_candidates: self.phone_candidates(text),
        };

        debug!(
            "Extracted {} emails, {} urls, {} phone candidates",
            artifacts.emails.len(),
            artifacts.urls.len(),
            artifacts.phone_candidates.len()
        );

        artifacts
    }

    pub fn emails(&self, text: &str) -> Vec<String> {
        self.email.find_iter(text).map(|m| m.as_str().to_string()).collect()
    }

    pub fn urls(&self, text: &str) -> Vec<String> {
        self.url
            .find_iter(text)
            .map(|m| m.as_str().trim_end_matches(URL_TRAILING_PUNCTUATION).to_string())
            .collect()
    }

    /// Deliberately permissive; the phone enricher decides what is real
    pub fn phone_candidates(&self, text: &str) -> Vec<String> {
        self.phone.find_iter(text).map(|m| m.as_str().to_string()).collect()
    }
}

fn compile(name: &str, pattern: &str) -> DossierResult<Regex> {
    Regex::new(pattern)
        .map_err(|e| DossierError::ConfigError(format!("Invalid {} pattern: {}", name, e)))
}
