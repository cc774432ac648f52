//! End-to-end lookup tests against a mock shop server.

use shelfcheck::shop::models::{Availability, ProductQuery};
use shelfcheck::{scrape_product_details, Config, ShopClient};
use wiremock::matchers::{any, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SEARCH_RESULT: &str = include_str!("fixtures/search_result.html");
const SEARCH_LINK_ONLY: &str = include_str!("fixtures/search_link_only.html");
const PRODUCT_PAGE: &str = include_str!("fixtures/product_page.html");

fn make_client(uri: String) -> ShopClient {
    let config = Config::default();
    ShopClient::with_base_url(&config, Some(uri)).unwrap()
}

fn symbol_query(symbol: &str) -> ProductQuery {
    ProductQuery { name: None, symbol: Some(symbol.to_string()) }
}

#[tokio::test]
async fn test_lookup_resolves_from_search_page_alone() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/szukaj"))
        .and(query_param("controller", "search"))
        .and(query_param("s", "1003"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SEARCH_RESULT))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = make_client(mock_server.uri());
    let outcome = scrape_product_details(&client, &symbol_query("1003")).await;
    let result = outcome.result;

    assert!(result.success);
    // The og:image tag is trusted even off-host and kept verbatim
    assert_eq!(result.image_url.as_deref(), Some("https://example.com/img/1003.jpg"));
    assert_eq!(result.availability, Some(Availability::Available));
    assert_eq!(
        result.product_url,
        Some(format!("{}/rozaniec-drewniany-1003.html", mock_server.uri()))
    );
    assert!(result.error.is_none());
}

#[tokio::test]
async fn test_lookup_escalates_to_product_page() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/szukaj"))
        .and(query_param("s", "2001"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SEARCH_LINK_ONLY))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/figurka-aniol-2001.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string(PRODUCT_PAGE))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = make_client(mock_server.uri());
    let outcome = scrape_product_details(&client, &symbol_query("2001")).await;
    let result = outcome.result;

    assert!(result.success);
    assert_eq!(
        result.image_url,
        Some(format!(
            "{}/environment/cache/images/figurka-aniol-2001-large.jpg",
            mock_server.uri()
        ))
    );
    // "na zamówienie" on the detail page beats the search page's weak signal
    assert_eq!(result.availability, Some(Availability::OnOrder));
    assert!(result.availability_label.is_none());
    assert_eq!(
        result.product_url,
        Some(format!("{}/figurka-aniol-2001.html", mock_server.uri()))
    );
}

#[tokio::test]
async fn test_lookup_http_error_yields_tolerant_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/szukaj"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let client = make_client(mock_server.uri());
    let outcome = scrape_product_details(&client, &symbol_query("1003")).await;
    let result = outcome.result;

    assert!(!result.success);
    assert!(result.image_url.is_none());
    assert!(result.availability.is_none());
    assert!(result.product_url.is_none());
    assert!(result.error.as_deref().is_some_and(|e| e.contains("500")));
}

#[tokio::test]
async fn test_lookup_blank_query_makes_no_request() {
    let mock_server = MockServer::start().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = make_client(mock_server.uri());
    let query = ProductQuery { name: Some("   ".to_string()), symbol: None };
    let outcome = scrape_product_details(&client, &query).await;

    assert!(!outcome.result.success);
    assert!(outcome.result.product_url.is_none());
}

#[tokio::test]
async fn test_lookup_falls_back_to_search_url() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/szukaj"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("<html><body><p>0 wyników</p></body></html>"),
        )
        .mount(&mock_server)
        .await;

    let client = make_client(mock_server.uri());
    let outcome = scrape_product_details(&client, &symbol_query("9999")).await;
    let result = outcome.result;

    assert!(!result.success);
    assert_eq!(
        result.product_url,
        Some(format!("{}/szukaj?controller=search&s=9999", mock_server.uri()))
    );
}

#[tokio::test]
async fn test_lookup_is_deterministic() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/szukaj"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SEARCH_RESULT))
        .mount(&mock_server)
        .await;

    let client = make_client(mock_server.uri());
    let query = symbol_query("1003");

    let first = scrape_product_details(&client, &query).await;
    let second = scrape_product_details(&client, &query).await;

    assert_eq!(
        serde_json::to_string(&first.result).unwrap(),
        serde_json::to_string(&second.result).unwrap()
    );
}
