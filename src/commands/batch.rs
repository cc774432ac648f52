//! Batch lookup command with a shared result cache.

use crate::cache::DetailsCache;
use crate::config::Config;
use crate::format::Formatter;
use crate::pipeline::scrape_with_deadline;
use crate::shop::models::{ProductQuery, ScrapeResult};
use crate::shop::{ShopClient, ShopFetch};
use anyhow::{Context, Result};
use std::time::Duration;
use tracing::info;

/// Executes lookups for a list of symbols, deduplicating repeats through
/// the TTL cache.
pub struct BatchCommand {
    config: Config,
}

impl BatchCommand {
    /// Creates a new batch command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Resolves all symbols and returns formatted output.
    pub async fn execute(&self, symbols: &[String]) -> Result<String> {
        let client = ShopClient::new(&self.config).context("Failed to create HTTP client")?;

        self.execute_with_client(&client, symbols).await
    }

    /// Resolves all symbols with a provided client (for testing).
    pub async fn execute_with_client(
        &self,
        client: &impl ShopFetch,
        symbols: &[String],
    ) -> Result<String> {
        let cache = DetailsCache::new(Duration::from_secs(self.config.cache_ttl_secs));
        let ceiling = Duration::from_millis(self.config.lookup_timeout_ms);

        let mut rows: Vec<(String, ScrapeResult)> = Vec::with_capacity(symbols.len());

        for symbol in symbols {
            let query = ProductQuery { name: None, symbol: Some(symbol.clone()) };
            let key = query.cache_key().unwrap_or_default().to_string();

            info!("Looking up product: {}", key);

            let result = cache
                .get_or_lookup(&key, || async {
                    scrape_with_deadline(client, &query, ceiling).await.result
                })
                .await;

            rows.push((symbol.clone(), result));
        }

        let formatter = Formatter::new(self.config.format);
        Ok(formatter.format_rows(&rows))
    }
}
