// src/utils/http.rs
use std::time::Duration;
use async_trait::async_trait;
use rand::seq::SliceRandom;
use reqwest::{Client, Response};
use tracing::debug;

use crate::error::{DossierError, DossierResult};
use crate::osint::image::ImageSource;

/// HTTP client shared by every stage of a run
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    user_agent: String,
}

impl HttpClient {
    /// Create a client with one user agent picked at random from `user_agents`
    pub fn new(user_agents: &[String], timeout: Duration) -> DossierResult<Self> {
        let user_agent = user_agents
            .choose(&mut rand::thread_rng())
            .cloned()
            .unwrap_or_else(|| format!("dossier/{}", env!("CARGO_PKG_VERSION")));

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(&user_agent)
            .build()
            .map_err(|e| DossierError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, user_agent })
    }

    /// GET a URL, treating non-success statuses as errors
    pub async fn get(&self, url: &str) -> DossierResult<Response> {
        debug!("GET {}", url);

        let response = self.client.get(url).send().await?;
        Ok(response.error_for_status()?)
    }

    /// GET a URL and return the body as text
    pub async fn get_text(&self, url: &str) -> DossierResult<String> {
        Ok(self.get(url).await?.text().await?)
    }

    /// GET a URL and decode a JSON body
    pub async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> DossierResult<T> {
        let response = self.get(url).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| DossierError::SerializationError(format!("Invalid JSON from {}: {}", url, e)))
    }

    /// Download content from a URL
    pub async fn download(&self, url: &str) -> DossierResult<Vec<u8>> {
        debug!("Downloading {}", url);

        let bytes = self.get(url).await?.bytes().await?;
        Ok(bytes.to_vec())
    }

    /// Get the user agent
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}

#[async_trait]
impl ImageSource for HttpClient {
    async fn fetch(&self, url: &str) -> DossierResult<Vec<u8>> {
        self.download(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_agent_comes_from_pool() {
        let pool = vec!["agent-a".to_string(), "agent-b".to_string()];
        let client = HttpClient::new(&pool, Duration::from_secs(5)).unwrap();

        assert!(pool.iter().any(|ua| ua == client.user_agent()));
    }

    #[test]
    fn test_empty_pool_falls_back_to_crate_agent() {
        let client = HttpClient::new(&[], Duration::from_secs(5)).unwrap();
        assert!(client.user_agent().starts_with("dossier/"));
    }
}
