//! Lookup orchestration: fetch, extract, escalate, normalize.
//!
//! This is the failure-tolerant boundary of the crate. Whatever happens
//! downstream - network trouble, a blocked request, markup that matches
//! nothing - the caller gets a well-formed `ScrapeResult`, never an error.

use crate::extract::availability::AvailabilityHit;
use crate::extract::{absolutize, availability, first_match, image, link, Page};
use crate::shop::client::search_url;
use crate::shop::models::{
    Availability, Field, PageKind, ProductQuery, ScrapeResult, ScrapeTrace, TraceEvent,
};
use crate::shop::ShopFetch;
use std::time::Duration;
use tracing::debug;

/// A finished lookup: the result plus its diagnostic trace.
#[derive(Debug, Clone)]
pub struct LookupOutcome {
    pub result: ScrapeResult,
    pub trace: ScrapeTrace,
}

struct Pass {
    image: Option<String>,
    availability: Option<AvailabilityHit>,
    link: Option<String>,
}

/// Runs the strategy chains against one fetched page. The link chain only
/// makes sense on the search listing.
fn run_pass(kind: PageKind, html: &str, origin: &str, trace: &mut ScrapeTrace) -> Pass {
    let page = Page::parse(kind, origin, html);

    let link = match kind {
        PageKind::Search => first_match(Field::ProductUrl, link::STRATEGIES, &page, trace),
        PageKind::Product => None,
    };

    Pass {
        image: first_match(Field::Image, image::STRATEGIES, &page, trace),
        availability: first_match(Field::Availability, availability::STRATEGIES, &page, trace),
        link,
    }
}

/// Signal strength for the escalation decision: a concrete status beats
/// the check-on-site shrug, which beats nothing.
fn strength(hit: &Option<AvailabilityHit>) -> u8 {
    match hit {
        None => 0,
        Some(h) if h.status == Availability::CheckOnSite => 1,
        Some(_) => 2,
    }
}

/// Resolves a product query to availability, image and product URL.
///
/// Best-effort by contract: returns the tolerant-failure shape on any
/// fetch problem or when nothing matches. At most two outbound requests
/// per call - the search page, plus one detail-page escalation when the
/// search results left a field unresolved.
pub async fn scrape_product_details(
    client: &impl ShopFetch,
    query: &ProductQuery,
) -> LookupOutcome {
    let mut trace = ScrapeTrace::default();

    let Some(term) = query.term() else {
        return LookupOutcome { result: ScrapeResult::failure("empty query"), trace };
    };

    let origin = client.origin();

    let search_html = match client.search(term).await {
        Ok(body) => {
            trace.push(TraceEvent::Fetched { page: PageKind::Search });
            body
        }
        Err(e) => {
            debug!("Search fetch failed: {}", e);
            trace.push(TraceEvent::FetchFailed {
                page: PageKind::Search,
                reason: e.to_string(),
            });
            return LookupOutcome { result: ScrapeResult::failure(e.to_string()), trace };
        }
    };

    let pass = run_pass(PageKind::Search, &search_html, &origin, &mut trace);

    let mut image = pass.image;
    let mut availability = pass.availability;
    let detail_url = pass.link.map(|href| absolutize(&origin, &href));

    // One escalation fetch at most, and only when it can still help
    if let Some(url) = detail_url.as_deref() {
        if image.is_none() || strength(&availability) < 2 {
            match client.page(url).await {
                Ok(body) => {
                    trace.push(TraceEvent::Fetched { page: PageKind::Product });
                    let second = run_pass(PageKind::Product, &body, &origin, &mut trace);
                    if image.is_none() {
                        image = second.image;
                    }
                    if strength(&second.availability) > strength(&availability) {
                        availability = second.availability;
                    }
                }
                Err(e) => {
                    debug!("Product page fetch failed: {}", e);
                    trace.push(TraceEvent::FetchFailed {
                        page: PageKind::Product,
                        reason: e.to_string(),
                    });
                }
            }
        }
    }

    // The UI always gets a clickable link: the detail page when resolved,
    // otherwise a search-on-site URL for the original term
    let product_url = match detail_url {
        Some(url) => Some(url),
        None => {
            trace.push(TraceEvent::SearchUrlFallback);
            Some(search_url(&origin, term))
        }
    };

    let image_url = image.map(|url| absolutize(&origin, &url));
    let (status, label) = match availability {
        Some(hit) => (Some(hit.status), hit.label),
        None => (None, None),
    };

    LookupOutcome {
        result: ScrapeResult::assemble(image_url, status, label, product_url),
        trace,
    }
}

/// Same as [`scrape_product_details`] but bounded in wall-clock time,
/// since the lookup backs a synchronous-feeling UI action. Timeout is
/// treated as a fetch failure.
pub async fn scrape_with_deadline(
    client: &impl ShopFetch,
    query: &ProductQuery,
    ceiling: Duration,
) -> LookupOutcome {
    match tokio::time::timeout(ceiling, scrape_product_details(client, query)).await {
        Ok(outcome) => outcome,
        Err(_) => {
            let mut trace = ScrapeTrace::default();
            trace.push(TraceEvent::TimedOut);
            LookupOutcome { result: ScrapeResult::failure("lookup timed out"), trace }
        }
    }
}
