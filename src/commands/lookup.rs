//! Single product lookup command implementation.

use crate::config::Config;
use crate::format::Formatter;
use crate::pipeline::scrape_with_deadline;
use crate::shop::models::ProductQuery;
use crate::shop::{ShopClient, ShopFetch};
use anyhow::{Context, Result};
use std::time::Duration;
use tracing::{debug, info};

/// Executes a single availability lookup.
pub struct LookupCommand {
    config: Config,
}

impl LookupCommand {
    /// Creates a new lookup command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Resolves one query and returns formatted output.
    pub async fn execute(&self, query: &ProductQuery) -> Result<String> {
        let client = ShopClient::new(&self.config).context("Failed to create HTTP client")?;

        self.execute_with_client(&client, query).await
    }

    /// Resolves one query with a provided client (for testing).
    pub async fn execute_with_client(
        &self,
        client: &impl ShopFetch,
        query: &ProductQuery,
    ) -> Result<String> {
        let term = query.term().unwrap_or("-").to_string();
        info!("Looking up product: {}", term);

        let ceiling = Duration::from_millis(self.config.lookup_timeout_ms);
        let outcome = scrape_with_deadline(client, query, ceiling).await;

        for event in &outcome.trace.events {
            debug!("Trace event: {:?}", event);
        }

        let formatter = Formatter::new(self.config.format);
        Ok(formatter.format_row(&term, &outcome.result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use crate::shop::FetchError;
    use async_trait::async_trait;

    struct MockShop {
        search_html: String,
    }

    #[async_trait]
    impl ShopFetch for MockShop {
        async fn search(&self, _term: &str) -> Result<String, FetchError> {
            Ok(self.search_html.clone())
        }

        async fn page(&self, _url: &str) -> Result<String, FetchError> {
            Ok("<html></html>".to_string())
        }

        fn origin(&self) -> String {
            "https://sklep.example".to_string()
        }
    }

    fn search_html() -> String {
        r#"<html><head>
            <meta property="og:image" content="https://sklep.example/img/1003.jpg">
        </head><body>
            <article class="product-miniature">
                <a href="/rozaniec-drewniany-1003.html">Różaniec drewniany</a>
                <button class="addtobasket">Do koszyka</button>
            </article>
        </body></html>"#
            .to_string()
    }

    fn query() -> ProductQuery {
        ProductQuery { name: None, symbol: Some("1003".to_string()) }
    }

    #[tokio::test]
    async fn test_lookup_table_output() {
        let client = MockShop { search_html: search_html() };
        let cmd = LookupCommand::new(Config::default());

        let output = cmd.execute_with_client(&client, &query()).await.unwrap();
        assert!(output.contains("Query:   1003"));
        assert!(output.contains("Status:  Dostępny"));
        assert!(output.contains("rozaniec-drewniany-1003.html"));
    }

    #[tokio::test]
    async fn test_lookup_json_output() {
        let client = MockShop { search_html: search_html() };
        let config = Config { format: OutputFormat::Json, ..Config::default() };
        let cmd = LookupCommand::new(config);

        let output = cmd.execute_with_client(&client, &query()).await.unwrap();
        assert!(output.contains("\"query\": \"1003\""));
        assert!(output.contains("\"success\": true"));
    }

    #[tokio::test]
    async fn test_lookup_blank_query_still_formats() {
        let client = MockShop { search_html: search_html() };
        let cmd = LookupCommand::new(Config::default());
        let blank = ProductQuery { name: None, symbol: None };

        let output = cmd.execute_with_client(&client, &blank).await.unwrap();
        assert!(output.contains("Query:   -"));
        assert!(output.contains("empty query"));
    }
}
