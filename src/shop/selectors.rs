//! CSS selectors for the shop's search and product pages.
//!
//! The storefront is PrestaShop-flavoured but the markup drifts between
//! theme updates. When extraction starts missing, capture an HTML sample,
//! adjust the selectors here and add a fixture.

use scraper::Selector;
use std::sync::LazyLock;

/// Every `<img>` on the page, for the image-cache path sweep.
pub static ANY_IMG: LazyLock<Selector> = LazyLock::new(|| Selector::parse("img").unwrap());

/// Head metadata selectors, shared between page kinds.
pub mod meta {
    use super::*;

    /// Open-graph image, the most reliable single signal.
    pub static OG_IMAGE: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("meta[property='og:image']").unwrap());

    /// Schema.org stock microdata.
    pub static MICRODATA_AVAILABILITY: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse(
            "link[itemprop='availability'], \
             [itemprop='availability']",
        )
        .unwrap()
    });

    /// Open-graph style product availability meta tag.
    pub static PRODUCT_AVAILABILITY: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("meta[property='product:availability']").unwrap());
}

/// Selectors for search results pages.
pub mod search {
    use super::*;

    /// Thumbnails inside result cards.
    pub static THUMB: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse(
            ".product-miniature img, \
             .thumbnail-container img, \
             .product-thumbnail img, \
             .product_img_link img",
        )
        .unwrap()
    });

    /// Anchors inside result cards, the generic product-link fallback.
    pub static RESULT_LINK: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse(
            ".product-miniature a[href], \
             .product_list a[href], \
             article.product a[href], \
             h2.product-title a[href]",
        )
        .unwrap()
    });

    /// All anchors, scanned for detail-page URL patterns.
    pub static ANCHORS: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[href]").unwrap());
}

/// Selectors for product detail pages.
pub mod product {
    use super::*;

    /// Main product image containers.
    pub static COVER: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse(
            ".product-cover img, \
             #bigpic, \
             .js-qv-product-cover img, \
             #image-block img, \
             .images-container img",
        )
        .unwrap()
    });

    /// Structured stock-level field.
    pub static AVAILABILITY: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse(
            "#product-availability, \
             #availability_value, \
             .availability-value, \
             .product-quantities",
        )
        .unwrap()
    });

    /// Small text nodes scanned for an inline "Dostępność: ..." label.
    pub static LABEL_SCAN: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("span, p, li, dd, td").unwrap());

    /// Add-to-cart controls.
    pub static ADD_TO_CART: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse(
            ".addtobasket, \
             button.add-to-cart, \
             [data-button-action='add-to-cart'], \
             .ajax_add_to_cart_button",
        )
        .unwrap()
    });

    /// "Notify me when available" controls.
    pub static NOTIFIER: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse(
            "#notifyWhenAvailable, \
             .js-mailalert, \
             [id*='mailalert'], \
             [class*='mailalert'], \
             .availability-notifier",
        )
        .unwrap()
    });
}
