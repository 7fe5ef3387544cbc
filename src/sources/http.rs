use crate::models::Listing;
use crate::sources::catalog::listings_from_document;
use crate::sources::traits::ListingSource;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, warn};

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Catalog served by the listing API
pub struct HttpListingSource {
    client: Client,
    url: String,
}

impl HttpListingSource {
    /// Create a source with the default 30 second timeout
    pub fn new(url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("housing-search/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ListingSource for HttpListingSource {
    async fn fetch(&self) -> Result<Vec<Listing>> {
        debug!("Fetching URL: {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .context("Failed to fetch listing catalog")?;

        if !response.status().is_success() {
            warn!("Listing API returned status: {}", response.status());
            anyhow::bail!("Failed to fetch listing catalog: {}", response.status());
        }

        let document: serde_json::Value = response
            .json()
            .await
            .context("Listing catalog response is not valid JSON")?;

        let listings = listings_from_document(&document);
        info!("Fetched {} listings from {}", listings.len(), self.url);
        Ok(listings)
    }

    fn source_name(&self) -> &'static str {
        "http"
    }
}
