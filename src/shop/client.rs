//! HTTP fetcher for the shop, using wreq for TLS fingerprint emulation.

use crate::config::Config;
use anyhow::{Context, Result};
use async_trait::async_trait;
use rand::RngExt;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};
use wreq::Client;
use wreq_util::Emulation;

/// Typed fetch failure. Non-2xx responses and transport trouble both land
/// here; the pipeline converts either into the tolerant-failure result.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(#[from] wreq::Error),

    #[error("unexpected status {status}")]
    Http { status: u16 },
}

/// Trait for shop fetching - enables mocking for tests.
#[async_trait]
pub trait ShopFetch: Send + Sync {
    /// Fetches the search results page for a query term.
    async fn search(&self, term: &str) -> Result<String, FetchError>;

    /// Fetches an arbitrary page on the shop (product detail escalation).
    async fn page(&self, url: &str) -> Result<String, FetchError>;

    /// Origin all relative URLs are resolved against.
    fn origin(&self) -> String;
}

/// Builds the templated search endpoint URL for a query term.
pub fn search_url(origin: &str, term: &str) -> String {
    format!(
        "{}/szukaj?controller=search&s={}",
        origin.trim_end_matches('/'),
        urlencoding::encode(term)
    )
}

/// Shop HTTP client with a desktop-browser header profile.
pub struct ShopClient {
    client: Client,
    base_url: String,
    delay_ms: u64,
    delay_jitter_ms: u64,
}

impl ShopClient {
    /// Creates a client against the configured shop.
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_base_url(config, None)
    }

    /// Creates a client with an overridden base URL (for testing).
    pub fn with_base_url(config: &Config, base_url: Option<String>) -> Result<Self> {
        let mut builder = Client::builder()
            .cookie_store(true)
            .gzip(true)
            .brotli(true)
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10));

        if let Some(proxy_url) = &config.proxy {
            debug!("Configuring proxy: {}", proxy_url);
            let proxy = wreq::Proxy::all(proxy_url).context("Failed to configure proxy")?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build().context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.unwrap_or_else(|| config.base_url.clone()),
            delay_ms: config.delay_ms,
            delay_jitter_ms: config.delay_jitter_ms,
        })
    }

    /// Performs a single GET, no retries. The caller decides whether an
    /// alternate URL is worth trying.
    async fn get(&self, url: &str) -> Result<String, FetchError> {
        self.delay().await;

        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .emulation(Emulation::Chrome131)
            .header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8")
            .header("Accept-Language", "pl-PL,pl;q=0.9,en;q=0.8")
            .header("Accept-Encoding", "gzip, deflate, br")
            .header("Sec-Fetch-Dest", "document")
            .header("Sec-Fetch-Mode", "navigate")
            .header("Sec-Fetch-Site", "none")
            .header("Upgrade-Insecure-Requests", "1")
            .send()
            .await?;

        let status = response.status();
        debug!("Response status: {}", status);

        if !status.is_success() {
            return Err(FetchError::Http { status: status.as_u16() });
        }

        Ok(response.text().await?)
    }

    /// Optional polite delay with jitter before each request.
    async fn delay(&self) {
        if self.delay_ms == 0 {
            return;
        }

        let jitter = if self.delay_jitter_ms > 0 {
            rand::rng().random_range(0..=self.delay_jitter_ms)
        } else {
            0
        };

        tokio::time::sleep(Duration::from_millis(self.delay_ms + jitter)).await;
    }
}

#[async_trait]
impl ShopFetch for ShopClient {
    async fn search(&self, term: &str) -> Result<String, FetchError> {
        let url = search_url(&self.origin(), term);

        info!("Searching shop for: {}", term);
        self.get(&url).await
    }

    async fn page(&self, url: &str) -> Result<String, FetchError> {
        info!("Fetching product page: {}", url);
        self.get(url).await
    }

    fn origin(&self) -> String {
        self.base_url.trim_end_matches('/').to_string()
    }
}
