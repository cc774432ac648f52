//! shelfcheck - Warehouse inventory lookup with live shop availability
//!
//! Resolves product queries against the shop's search page with TLS
//! fingerprint emulation, layered extraction strategies and a short-lived
//! result cache.

pub mod cache;
pub mod commands;
pub mod config;
pub mod extract;
pub mod format;
pub mod pipeline;
pub mod shop;

pub use cache::DetailsCache;
pub use config::Config;
pub use pipeline::{scrape_product_details, scrape_with_deadline, LookupOutcome};
pub use shop::models::{Availability, ProductQuery, ScrapeResult};
pub use shop::{FetchError, ShopClient, ShopFetch};
