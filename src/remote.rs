//! Remote quote source backed by the placeholder posts API

use crate::error::{QuoteError, Result};
use crate::settings::Settings;
use crate::types::{Quote, RemotePost};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, info};

/// Where server quotes come from and where new local quotes are posted
pub trait QuoteSource: Send + Sync + 'static {
    fn fetch_quotes(&self) -> impl Future<Output = Result<Vec<Quote>>> + Send;
    fn publish_quote(&self, quote: &Quote) -> impl Future<Output = Result<()>> + Send;
}

#[derive(Clone)]
pub struct RemoteSource {
    client: reqwest::Client,
    endpoint: String,
    limit: usize,
}

impl RemoteSource {
    pub fn new(endpoint: impl Into<String>, limit: usize, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            limit,
        })
    }

    /// Endpoint, fetch limit and request timeout from the user settings
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(
            settings.remote_endpoint.clone(),
            settings.fetch_limit,
            settings.request_timeout(),
        )
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl QuoteSource for RemoteSource {
    async fn fetch_quotes(&self) -> Result<Vec<Quote>> {
        debug!(url = %self.endpoint, limit = self.limit, "Fetching server quotes");
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("_limit", self.limit)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(QuoteError::Remote(format!("HTTP {}", status)));
        }

        let posts: Vec<RemotePost> = response.json().await?;
        debug!(count = posts.len(), "Server quotes received");
        Ok(posts.into_iter().map(Quote::from).collect())
    }

    async fn publish_quote(&self, quote: &Quote) -> Result<()> {
        let response = self.client.post(&self.endpoint).json(quote).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(QuoteError::Remote(format!("HTTP {}", status)));
        }

        // The mock server echoes the post with an id but does not keep it
        let echoed: serde_json::Value = response.json().await.unwrap_or_default();
        info!(status = %status, id = %echoed["id"], "Quote posted to server");
        Ok(())
    }
}
