//! Extraction strategy chains over parsed shop pages.
//!
//! Each output field (image, availability, product URL) has an ordered
//! list of pure strategies `fn(&Page) -> Option<T>`. The `first_match`
//! combinator tries them in priority order and short-circuits on the
//! first hit, recording the winner in the lookup trace.

pub mod availability;
pub mod image;
pub mod link;

use crate::shop::models::{Field, PageKind, ScrapeTrace, TraceEvent};
use scraper::{ElementRef, Html};

/// A fetched page ready for extraction: tolerant DOM plus the raw HTML
/// for the pattern-match tier of last resort.
pub struct Page {
    kind: PageKind,
    origin: String,
    raw: String,
    doc: Html,
}

impl Page {
    /// Parses a page. `Html::parse_document` is tolerant: malformed or
    /// partial markup yields a best-effort tree, never an error.
    pub fn parse(kind: PageKind, origin: &str, html: &str) -> Self {
        Self {
            kind,
            origin: origin.trim_end_matches('/').to_string(),
            raw: html.to_string(),
            doc: Html::parse_document(html),
        }
    }

    pub fn kind(&self) -> PageKind {
        self.kind
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn doc(&self) -> &Html {
        &self.doc
    }
}

/// A named extraction step in a priority chain.
pub struct Strategy<T> {
    pub name: &'static str,
    pub run: fn(&Page) -> Option<T>,
}

/// Tries strategies in order, short-circuiting on the first hit. The
/// winning strategy name lands in the trace; lower-priority strategies
/// are never consulted once one succeeds.
pub fn first_match<T>(
    field: Field,
    strategies: &[Strategy<T>],
    page: &Page,
    trace: &mut ScrapeTrace,
) -> Option<T> {
    for strategy in strategies {
        if let Some(value) = (strategy.run)(page) {
            trace.push(TraceEvent::StrategyHit {
                page: page.kind(),
                field,
                strategy: strategy.name,
            });
            return Some(value);
        }
    }
    None
}

/// Resolves a possibly-relative URL against the shop origin.
pub fn absolutize(origin: &str, href: &str) -> String {
    let href = href.trim();
    let origin = origin.trim_end_matches('/');

    if href.starts_with("http://") || href.starts_with("https://") {
        href.to_string()
    } else if let Some(rest) = href.strip_prefix("//") {
        format!("https://{}", rest)
    } else if href.starts_with('/') {
        format!("{}{}", origin, href)
    } else {
        format!("{}/{}", origin, href)
    }
}

/// Host portion of a URL, if it names one.
pub fn host_of(url: &str) -> Option<&str> {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .or_else(|| url.strip_prefix("//"))?;
    rest.split(['/', '?', '#']).next().filter(|h| !h.is_empty())
}

/// True when the URL lives on the shop host. Relative paths count as
/// on-host; scheme-relative and absolute URLs must match the origin.
pub fn on_host(origin: &str, url: &str) -> bool {
    match host_of(url) {
        Some(host) => host_of(origin) == Some(host),
        None => true,
    }
}

/// True when the element or any ancestor is marked hidden via a class
/// token ("none"/"hide") or an inline display:none.
pub fn is_hidden(element: ElementRef) -> bool {
    std::iter::successors(Some(*element), |node| node.parent())
        .filter_map(ElementRef::wrap)
        .any(|el| {
            let value = el.value();
            let class_hidden = value.attr("class").is_some_and(|c| {
                let c = c.to_lowercase();
                c.contains("none") || c.contains("hide")
            });
            let style_hidden = value
                .attr("style")
                .is_some_and(|s| s.replace(' ', "").to_lowercase().contains("display:none"));
            class_hidden || style_hidden
        })
}
