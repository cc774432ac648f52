//! Availability extraction strategies.
//!
//! Trust order: explicit stock labels, then inferred UI state (cart and
//! notifier controls), then microdata, then free-text scanning. All of it
//! is best-effort against markup the shop can change at any time.

use super::{is_hidden, Page, Strategy};
use crate::shop::models::Availability;
use crate::shop::selectors::{meta, product};

/// A resolved availability, optionally carrying the raw site phrase when
/// the label was a graded stock level ("duża ilość").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityHit {
    pub status: Availability,
    pub label: Option<String>,
}

impl AvailabilityHit {
    fn plain(status: Availability) -> Self {
        Self { status, label: None }
    }
}

pub static STRATEGIES: &[Strategy<AvailabilityHit>] = &[
    Strategy { name: "stock_label", run: stock_label },
    Strategy { name: "add_to_cart", run: add_to_cart },
    Strategy { name: "notifier", run: notifier },
    Strategy { name: "microdata", run: microdata },
    Strategy { name: "unavailable_message", run: unavailable_message },
    Strategy { name: "product_mention", run: product_mention },
];

const GRADED_LEVELS: &[&str] = &["duża ilość", "średnia ilość", "mała ilość"];

/// Classifies a free-text stock value into the closed set.
fn classify_stock_text(value: &str) -> Option<AvailabilityHit> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    let lower = value.to_lowercase();

    // "niedostępny" contains "dostępny", so negative rules come first
    if lower.contains("brak")
        || lower.contains("niedostępn")
        || lower == "0"
        || lower.starts_with("0 ")
    {
        return Some(AvailabilityHit::plain(Availability::Unavailable));
    }

    if lower.contains("zamówien") {
        return Some(AvailabilityHit::plain(Availability::OnOrder));
    }

    if GRADED_LEVELS.iter().any(|level| lower.contains(level)) {
        return Some(AvailabilityHit {
            status: Availability::Available,
            label: Some(value.to_string()),
        });
    }

    if lower.contains("dostępn")
        || lower.contains("magazyn")
        || lower.contains("szt")
        || lower.chars().any(|c| c.is_ascii_digit())
    {
        return Some(AvailabilityHit::plain(Availability::Available));
    }

    None
}

/// Drops a leading "Dostępność" field name so the word itself does not
/// classify as available.
fn strip_field_name(text: &str) -> String {
    let text = text.trim();
    if text.to_lowercase().starts_with("dostępność") {
        text.chars()
            .skip("dostępność".chars().count())
            .collect::<String>()
            .trim_start_matches([':', ' ', '\u{a0}'])
            .trim()
            .to_string()
    } else {
        text.to_string()
    }
}

/// 1. Explicit structured stock label near the "Dostępność" field.
fn stock_label(page: &Page) -> Option<AvailabilityHit> {
    for el in page.doc().select(&product::AVAILABILITY) {
        let text = el.text().collect::<String>();
        if let Some(hit) = classify_stock_text(&strip_field_name(&text)) {
            return Some(hit);
        }
    }

    // Inline "Dostępność: ..." label without a known container
    for el in page.doc().select(&product::LABEL_SCAN) {
        let text = el.text().collect::<String>();
        let text = text.trim();
        if text.chars().count() > 120 || !text.to_lowercase().starts_with("dostępność") {
            continue;
        }
        if let Some(hit) = classify_stock_text(&strip_field_name(text)) {
            return Some(hit);
        }
    }

    None
}

/// 2. An active, visible add-to-cart control means the product can be
/// bought right now. Hidden or disabled controls do not count.
fn add_to_cart(page: &Page) -> Option<AvailabilityHit> {
    page.doc()
        .select(&product::ADD_TO_CART)
        .find(|el| el.value().attr("disabled").is_none() && !is_hidden(*el))
        .map(|_| AvailabilityHit::plain(Availability::Available))
}

/// 3. Notifier visibility is inversely correlated with availability: a
/// visible "notify me" control means out of stock, a hidden one means the
/// shop currently sells the product.
fn notifier(page: &Page) -> Option<AvailabilityHit> {
    let controls: Vec<_> = page.doc().select(&product::NOTIFIER).collect();
    if controls.is_empty() {
        return None;
    }

    let any_visible = controls.iter().any(|el| !is_hidden(*el));
    Some(AvailabilityHit::plain(if any_visible {
        Availability::Unavailable
    } else {
        Availability::Available
    }))
}

fn microdata_status(value: &str) -> Option<Availability> {
    let lower = value.to_lowercase();
    if lower.contains("instock") || lower.contains("in stock") {
        Some(Availability::Available)
    } else if lower.contains("outofstock") || lower.contains("out of stock") {
        Some(Availability::Unavailable)
    } else if lower.contains("preorder") || lower.contains("backorder") {
        Some(Availability::OnOrder)
    } else {
        None
    }
}

/// 4. Machine-readable stock microdata.
fn microdata(page: &Page) -> Option<AvailabilityHit> {
    let from_itemprop = page
        .doc()
        .select(&meta::MICRODATA_AVAILABILITY)
        .filter_map(|el| el.value().attr("href").or_else(|| el.value().attr("content")))
        .find_map(microdata_status);

    let status = from_itemprop.or_else(|| {
        page.doc()
            .select(&meta::PRODUCT_AVAILABILITY)
            .filter_map(|el| el.value().attr("content"))
            .find_map(microdata_status)
    })?;

    Some(AvailabilityHit::plain(status))
}

const UNAVAILABLE_MESSAGES: &[&str] = &[
    "produkt niedostępny",
    "nie jest już dostępny",
    "produkt wycofany",
    "obecnie brak w magazynie",
];

/// 5. Explicit unavailability message anywhere in the raw markup.
fn unavailable_message(page: &Page) -> Option<AvailabilityHit> {
    let lower = page.raw().to_lowercase();
    UNAVAILABLE_MESSAGES
        .iter()
        .any(|msg| lower.contains(msg))
        .then(|| AvailabilityHit::plain(Availability::Unavailable))
}

/// 6. The page at least mentions a product; the user has to check the
/// site themselves. Weakest signal, kept last.
fn product_mention(page: &Page) -> Option<AvailabilityHit> {
    page.raw()
        .to_lowercase()
        .contains("produkt")
        .then(|| AvailabilityHit::plain(Availability::CheckOnSite))
}
