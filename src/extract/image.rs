//! Image URL extraction strategies, highest-signal first.

use super::{on_host, Page, Strategy};
use crate::shop::models::PageKind;
use crate::shop::selectors::{meta, product, search, ANY_IMG};
use regex_lite::Regex;
use std::sync::LazyLock;

/// Known non-product assets; any candidate containing one is rejected.
const EXCLUDED: &[&str] = &["logo", "icon", "banner"];

/// Image-cache path PrestaShop serves generated thumbnails from.
const IMAGE_CACHE_PATH: &str = "/environment/cache/images/";

/// `/{image-id}-{size}/` media paths, e.g. `/123-large_default/x.jpg`.
static MEDIA_PATH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/\d+-[a-z0-9_]+/").unwrap());

/// Any image URL in the raw markup, the pattern tier of last resort.
static RAW_IMG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(?:src|data-src|content)="([^"]+\.(?:jpe?g|png|webp))""#).unwrap()
});

const SRC_ATTRS: &[&str] = &["src", "data-src", "data-full-size-image-url"];

pub static STRATEGIES: &[Strategy<String>] = &[
    Strategy { name: "og_image", run: og_image },
    Strategy { name: "structural", run: structural },
    Strategy { name: "cache_path", run: cache_path },
    Strategy { name: "raw_scan", run: raw_scan },
];

fn acceptable(url: &str) -> bool {
    let lower = url.to_lowercase();
    !EXCLUDED.iter().any(|needle| lower.contains(needle))
}

fn og_image(page: &Page) -> Option<String> {
    page.doc()
        .select(&meta::OG_IMAGE)
        .filter_map(|el| el.value().attr("content"))
        .find(|url| acceptable(url))
        .map(String::from)
}

/// Known product-image containers; which ones differ between the search
/// listing and the detail page.
fn structural(page: &Page) -> Option<String> {
    let selector = match page.kind() {
        PageKind::Search => &*search::THUMB,
        PageKind::Product => &*product::COVER,
    };

    page.doc()
        .select(selector)
        .flat_map(|el| SRC_ATTRS.iter().filter_map(move |attr| el.value().attr(attr)))
        .find(|url| acceptable(url))
        .map(String::from)
}

/// Any image pointing into the shop's image cache.
fn cache_path(page: &Page) -> Option<String> {
    page.doc()
        .select(&ANY_IMG)
        .flat_map(|el| SRC_ATTRS.iter().filter_map(move |attr| el.value().attr(attr)))
        .find(|url| {
            (url.contains(IMAGE_CACHE_PATH) || MEDIA_PATH_RE.is_match(url))
                && on_host(page.origin(), url)
                && acceptable(url)
        })
        .map(String::from)
}

/// Regex sweep over the raw HTML for on-host image URLs.
fn raw_scan(page: &Page) -> Option<String> {
    RAW_IMG_RE
        .captures_iter(page.raw())
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .find(|url| on_host(page.origin(), url) && acceptable(url))
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::first_match;
    use crate::shop::models::{Field, ScrapeTrace};

    const ORIGIN: &str = "https://jakobczak.pl";

    fn extract(kind: PageKind, html: &str) -> (Option<String>, ScrapeTrace) {
        let page = Page::parse(kind, ORIGIN, html);
        let mut trace = ScrapeTrace::default();
        let value = first_match(Field::Image, STRATEGIES, &page, &mut trace);
        (value, trace)
    }

    #[test]
    fn test_og_image_wins_and_short_circuits() {
        let html = r#"<html><head>
            <meta property="og:image" content="https://example.com/img/1003.jpg">
        </head><body>
            <div class="thumbnail-container">
                <img src="/environment/cache/images/other.jpg">
            </div>
        </body></html>"#;

        let (value, trace) = extract(PageKind::Search, html);
        assert_eq!(value.as_deref(), Some("https://example.com/img/1003.jpg"));
        assert_eq!(trace.winning_strategy(Field::Image), Some("og_image"));
        assert_eq!(trace.hits_for(Field::Image), 1);
    }

    #[test]
    fn test_excluded_og_falls_through_to_structural() {
        let html = r#"<html><head>
            <meta property="og:image" content="https://jakobczak.pl/img/logo.png">
        </head><body>
            <article class="product-miniature">
                <img src="/environment/cache/images/rozaniec.jpg">
            </article>
        </body></html>"#;

        let (value, trace) = extract(PageKind::Search, html);
        assert_eq!(value.as_deref(), Some("/environment/cache/images/rozaniec.jpg"));
        assert_eq!(trace.winning_strategy(Field::Image), Some("structural"));
    }

    #[test]
    fn test_structural_uses_product_cover_on_detail_page() {
        let html = r#"<html><body>
            <div class="product-cover">
                <img src="https://jakobczak.pl/123-large_default/rozaniec.jpg">
            </div>
        </body></html>"#;

        let (value, trace) = extract(PageKind::Product, html);
        assert_eq!(
            value.as_deref(),
            Some("https://jakobczak.pl/123-large_default/rozaniec.jpg")
        );
        assert_eq!(trace.winning_strategy(Field::Image), Some("structural"));

        // Same markup on a search page is not a known thumbnail container;
        // the cache-path sweep picks it up instead
        let (value, trace) = extract(PageKind::Search, html);
        assert!(value.is_some());
        assert_eq!(trace.winning_strategy(Field::Image), Some("cache_path"));
    }

    #[test]
    fn test_cache_path_sweep() {
        let html = r#"<html><body>
            <img src="/static/icon-cart.png">
            <img data-src="/environment/cache/images/figurka.jpg">
        </body></html>"#;

        let (value, trace) = extract(PageKind::Search, html);
        assert_eq!(value.as_deref(), Some("/environment/cache/images/figurka.jpg"));
        assert_eq!(trace.winning_strategy(Field::Image), Some("cache_path"));
    }

    #[test]
    fn test_cache_path_rejects_foreign_host() {
        let html = r#"<html><body>
            <img src="https://cdn.example.com/environment/cache/images/x.jpg">
        </body></html>"#;

        let (value, _) = extract(PageKind::Search, html);
        assert!(value.is_none());
    }

    #[test]
    fn test_raw_scan_fallback() {
        // Malformed enough that no structural selector matches
        let html = r#"<html><body><div class="broken
            <span data-src="https://jakobczak.pl/upload/rozaniec.jpg" </span>
        </body>"#;

        let (value, trace) = extract(PageKind::Search, html);
        assert_eq!(value.as_deref(), Some("https://jakobczak.pl/upload/rozaniec.jpg"));
        assert_eq!(trace.winning_strategy(Field::Image), Some("raw_scan"));
    }

    #[test]
    fn test_raw_scan_skips_excluded_assets() {
        let html = r#"<html><body>
            <img src="https://jakobczak.pl/themes/logo.png">
            <img src="https://jakobczak.pl/themes/banner-lato.jpg">
        </body></html>"#;

        let (value, _) = extract(PageKind::Search, html);
        assert!(value.is_none());
    }

    #[test]
    fn test_no_image_at_all() {
        let (value, trace) = extract(PageKind::Search, "<html><body><p>nic</p></body></html>");
        assert!(value.is_none());
        assert_eq!(trace.hits_for(Field::Image), 0);
    }
}
