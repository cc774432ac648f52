//! Product detail URL resolution on the search results page.

use super::{on_host, Page, Strategy};
use crate::shop::selectors::search;

/// Informational pages that share the `.html` suffix with product pages.
const EXCLUDED_PAGES: &[&str] = &["regulamin", "kontakt", "aktualnosci"];

pub static STRATEGIES: &[Strategy<String>] = &[
    Strategy { name: "detail_anchor", run: detail_anchor },
    Strategy { name: "result_card_anchor", run: result_card_anchor },
];

fn is_detail_href(origin: &str, href: &str) -> bool {
    let path = href.split(['?', '#']).next().unwrap_or(href);
    path.ends_with(".html")
        && on_host(origin, href)
        && !EXCLUDED_PAGES.iter().any(|page| href.contains(page))
}

/// First anchor matching the detail-page URL pattern unique to products.
fn detail_anchor(page: &Page) -> Option<String> {
    page.doc()
        .select(&search::ANCHORS)
        .filter_map(|el| el.value().attr("href"))
        .find(|href| is_detail_href(page.origin(), href))
        .map(String::from)
}

/// Fallback: first anchor inside a result card, whatever it points at.
fn result_card_anchor(page: &Page) -> Option<String> {
    page.doc()
        .select(&search::RESULT_LINK)
        .filter_map(|el| el.value().attr("href"))
        .find(|href| on_host(page.origin(), href))
        .map(String::from)
}
