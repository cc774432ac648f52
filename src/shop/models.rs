//! Data models for product lookups: queries, availability, results and traces.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies a warehouse product to look up on the shop.
///
/// At least one field should be non-blank for a meaningful result; the
/// symbol is preferred as the search term since it is more specific than
/// the free-text name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductQuery {
    pub name: Option<String>,
    pub symbol: Option<String>,
}

impl ProductQuery {
    /// Returns the search term: symbol when non-blank, otherwise name.
    pub fn term(&self) -> Option<&str> {
        Self::pick(&self.symbol).or_else(|| Self::pick(&self.name))
    }

    /// Cache key for this query, same preference order as the search term.
    pub fn cache_key(&self) -> Option<&str> {
        self.term()
    }

    /// True when both fields are empty or whitespace.
    pub fn is_blank(&self) -> bool {
        self.term().is_none()
    }

    fn pick(value: &Option<String>) -> Option<&str> {
        value.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

/// Canonical availability status distilled from the shop's free-text
/// labels, cart controls and microdata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    Available,
    Unavailable,
    OnOrder,
    CheckOnSite,
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Availability::Available => "Dostępny",
            Availability::Unavailable => "Niedostępny",
            Availability::OnOrder => "Na zamówienie",
            Availability::CheckOnSite => "Sprawdź na stronie",
        };
        write!(f, "{}", label)
    }
}

/// Final lookup result handed back to the caller.
///
/// `success` is computed, never asserted by a strategy: it is true iff at
/// least one of image/availability was determined. Fetch or parse trouble
/// surfaces as the tolerant-failure shape, not as an error value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeResult {
    pub success: bool,
    pub image_url: Option<String>,
    pub availability: Option<Availability>,
    /// Raw site phrase when the stock label carried detail ("duża ilość").
    pub availability_label: Option<String>,
    pub product_url: Option<String>,
    pub error: Option<String>,
}

impl ScrapeResult {
    /// Assembles a result, computing `success` from the extracted fields.
    pub fn assemble(
        image_url: Option<String>,
        availability: Option<Availability>,
        availability_label: Option<String>,
        product_url: Option<String>,
    ) -> Self {
        Self {
            success: image_url.is_some() || availability.is_some(),
            image_url,
            availability,
            availability_label,
            product_url,
            error: None,
        }
    }

    /// The tolerant-failure shape: all fields null, diagnostic message only.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            image_url: None,
            availability: None,
            availability_label: None,
            product_url: None,
            error: Some(message.into()),
        }
    }
}

/// Which page a fetch or strategy ran against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PageKind {
    Search,
    Product,
}

/// Output field a strategy chain resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Image,
    Availability,
    ProductUrl,
}

/// One step of a lookup, recorded in order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TraceEvent {
    Fetched { page: PageKind },
    FetchFailed { page: PageKind, reason: String },
    StrategyHit { page: PageKind, field: Field, strategy: &'static str },
    SearchUrlFallback,
    TimedOut,
}

/// Structured diagnostic trace of a lookup, returned alongside the result
/// instead of scattering log calls through the strategy chain.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScrapeTrace {
    pub events: Vec<TraceEvent>,
}

impl ScrapeTrace {
    pub fn push(&mut self, event: TraceEvent) {
        self.events.push(event);
    }

    /// Name of the strategy that resolved `field`, if any did.
    pub fn winning_strategy(&self, field: Field) -> Option<&'static str> {
        self.events.iter().find_map(|e| match e {
            TraceEvent::StrategyHit { field: f, strategy, .. } if *f == field => Some(*strategy),
            _ => None,
        })
    }

    /// Number of strategy hits recorded for `field`.
    pub fn hits_for(&self, field: Field) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, TraceEvent::StrategyHit { field: f, .. } if *f == field))
            .count()
    }
}
