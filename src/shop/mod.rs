//! Shop-facing layer: HTTP client, page selectors and data models.

pub mod client;
pub mod models;
pub mod selectors;

pub use client::{search_url, FetchError, ShopClient, ShopFetch};
pub use models::{Availability, ProductQuery, ScrapeResult, ScrapeTrace};
