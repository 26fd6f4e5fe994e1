//! Snippet Source
//!
//! Fetches the list of snippets the widget types out. The list is loaded
//! once at startup; [`load_snippets`] never fails, it logs and hands back an
//! empty list instead, and the animator treats an empty list as "nothing to
//! type".

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, error, info};

use crate::config::Config;
use crate::errors::FetchError;
use crate::telemetry::sanitize_for_log;

/// Trait abstraction over where snippets come from, enabling test doubles.
#[async_trait]
pub trait SnippetSource: Send + Sync {
    /// Fetch the full, ordered snippet list.
    async fn fetch(&self) -> Result<Vec<String>, FetchError>;

    /// Human-readable origin, used in log lines.
    fn describe(&self) -> String;
}

/// Snippets served as a JSON array of strings over HTTP GET
pub struct HttpSnippetSource {
    client: Client,
    endpoint: String,
}

impl HttpSnippetSource {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Network(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, FetchError> {
        Self::new(
            config.snippets.endpoint.clone(),
            Duration::from_secs(config.snippets.timeout_secs),
        )
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl SnippetSource for HttpSnippetSource {
    async fn fetch(&self) -> Result<Vec<String>, FetchError> {
        debug!("GET {}", self.endpoint);
        let response = self.client.get(&self.endpoint).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                message,
            });
        }

        // Anything other than an array of strings is a decode error
        let snippets: Vec<String> = response.json().await?;
        Ok(snippets)
    }

    fn describe(&self) -> String {
        self.endpoint.clone()
    }
}

/// A fixed snippet list, used for `--offline` runs
#[derive(Debug, Clone, Default)]
pub struct StaticSnippetSource {
    snippets: Vec<String>,
}

impl StaticSnippetSource {
    pub fn new(snippets: Vec<String>) -> Self {
        Self { snippets }
    }
}

#[async_trait]
impl SnippetSource for StaticSnippetSource {
    async fn fetch(&self) -> Result<Vec<String>, FetchError> {
        Ok(self.snippets.clone())
    }

    fn describe(&self) -> String {
        "built-in snippets".to_string()
    }
}

/// Fetch once, logging the outcome. Errors leave the list empty.
pub async fn load_snippets(source: &dyn SnippetSource) -> Vec<String> {
    match source.fetch().await {
        Ok(snippets) => {
            info!(
                count = snippets.len(),
                "Snippets fetched from {}",
                source.describe()
            );
            for snippet in &snippets {
                debug!("snippet: {}", sanitize_for_log(snippet));
            }
            snippets
        }
        Err(e) => {
            error!("Error fetching snippets from {}: {}", source.describe(), e);
            Vec::new()
        }
    }
}
