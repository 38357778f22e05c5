//! Catalog client for the product catalog HTTP API.

use std::fmt::Debug;
use std::str::FromStr;
use std::time::Duration;

use enum_dispatch::enum_dispatch;
use reqwest::StatusCode;
use reqwest::header::{self, HeaderMap};
use tracing::{debug, instrument};
use url::Url;

use crate::config::CatalogClientConfig;
use crate::error::{CatalogClientError, ProductError, parse_error_message};
use crate::mock::MockClient;
use crate::types::*;

/// Response header carrying the total number of matching products.
pub const TOTAL_COUNT_HEADER: &str = "x-total-count";

const PRODUCTS_PATH: [&str; 2] = ["api", "products"];
const CRAWL_PATH: [&str; 2] = ["api", "crawl"];

/// Either a client for the actual catalog service,
/// or a mock client for testing.
#[derive(Debug)]
#[enum_dispatch(ClientTrait)]
pub enum Client {
    Catalog(CatalogClient),
    Mock(MockClient),
}

/// The complete catalog API interface.
///
/// This trait enables alternate implementations:
/// - **HTTP**: REST calls to the catalog service via [`CatalogClient`]
/// - **Mock**: canned responses without HTTP via [`MockClient`]
#[enum_dispatch]
#[allow(async_fn_in_trait)]
pub trait ClientTrait {
    /// Fetch one page of products matching `query`.
    async fn search_products(&self, query: &ProductQuery)
    -> Result<ProductsPage, CatalogClientError>;

    /// Fetch all details of a single product.
    async fn product(&self, id: &ProductId) -> Result<ProductDetail, ProductError>;

    /// Ask the catalog to refresh its data.
    async fn crawl(&self) -> Result<CrawlResponse, CatalogClientError>;
}

/// A client for the catalog service.
///
/// This is a thin wrapper around a [reqwest::Client] that handles:
/// - HTTP client configuration with timeouts
/// - extra headers and the user agent
/// - mapping of error responses and undecodable bodies
pub struct CatalogClient {
    client: reqwest::Client,
    config: CatalogClientConfig,
}

impl Debug for CatalogClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogClient")
            .field("catalog_url", &self.config.catalog_url.as_str())
            .finish_non_exhaustive()
    }
}

impl CatalogClient {
    /// Create a new catalog client from configuration.
    pub fn new(config: CatalogClientConfig) -> Result<Self, CatalogClientError> {
        let client = build_http_client(&config)?;
        Ok(Self { client, config })
    }

    /// Append `segments` to the configured base url.
    fn endpoint<'a>(
        &self,
        segments: impl IntoIterator<Item = &'a str>,
    ) -> Result<Url, CatalogClientError> {
        let mut url = self.config.catalog_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                CatalogClientError::Other(format!(
                    "catalog url '{}' cannot be used as a base url",
                    self.config.catalog_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

impl ClientTrait for CatalogClient {
    #[instrument(skip_all, fields(skip = query.skip, limit = query.limit))]
    async fn search_products(
        &self,
        query: &ProductQuery,
    ) -> Result<ProductsPage, CatalogClientError> {
        let url = self.endpoint(PRODUCTS_PATH)?;
        debug!(%url, ?query, "sending product search request");

        let response = self
            .client
            .get(url)
            .query(&query.query_pairs())
            .send()
            .await?;
        let response = error_for_status(response).await?;

        let total_header = response
            .headers()
            .get(TOTAL_COUNT_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(ToOwned::to_owned);
        let body = response.bytes().await?;
        let products = normalize_response(&body)?;

        debug!(
            n_items = products.items.len(),
            body_total = ?products.total,
            ?total_header,
            "received products page"
        );

        Ok(ProductsPage {
            products,
            total_header,
        })
    }

    #[instrument(skip_all, fields(id = %id))]
    async fn product(&self, id: &ProductId) -> Result<ProductDetail, ProductError> {
        let id_segment = id.to_string();
        let url = self.endpoint(PRODUCTS_PATH.into_iter().chain([id_segment.as_str()]))?;
        debug!(%url, "fetching product details");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(CatalogClientError::from)?;
        let response = error_for_status(response).await.map_err(|e| match e {
            CatalogClientError::Server { status, .. } if status == StatusCode::NOT_FOUND => {
                ProductError::NotFound(id_segment.clone())
            },
            other => other.into(),
        })?;

        let body = response.bytes().await.map_err(CatalogClientError::from)?;
        let detail = serde_json::from_slice(&body)
            .map_err(|e| CatalogClientError::Decode(e.to_string()))?;
        Ok(detail)
    }

    #[instrument(skip_all)]
    async fn crawl(&self) -> Result<CrawlResponse, CatalogClientError> {
        let url = self.endpoint(CRAWL_PATH)?;
        debug!(%url, "triggering crawl");

        let response = self.client.post(url).send().await?;
        let response = error_for_status(response).await?;
        let body = response.bytes().await?;
        let crawl_response: CrawlResponse =
            serde_json::from_slice(&body).map_err(|e| CatalogClientError::Decode(e.to_string()))?;

        debug!(server_message = %crawl_response.message, "crawl finished");
        Ok(crawl_response)
    }
}

// ---------------------------------------------------------------------------
// Helper functions
// ---------------------------------------------------------------------------

/// Turn non-success responses into [CatalogClientError::Server],
/// keeping the structured message of the body if there is one.
async fn error_for_status(
    response: reqwest::Response,
) -> Result<reqwest::Response, CatalogClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    // The body is only used for its message, a body that fails to arrive
    // still leaves us with the status.
    let body = response.bytes().await.unwrap_or_default();
    let message = parse_error_message(&body);
    debug!(%status, ?message, "catalog returned an error response");

    Err(CatalogClientError::Server { status, message })
}

/// Build HTTP client for the catalog API.
fn build_http_client(config: &CatalogClientConfig) -> Result<reqwest::Client, CatalogClientError> {
    let mut headers = HeaderMap::new();

    for (key, value) in &config.extra_headers {
        headers.insert(
            header::HeaderName::from_str(key).map_err(
                |e: reqwest::header::InvalidHeaderName| CatalogClientError::Other(e.to_string()),
            )?,
            header::HeaderValue::from_str(value).map_err(
                |e: reqwest::header::InvalidHeaderValue| CatalogClientError::Other(e.to_string()),
            )?,
        );
    }

    debug!(
        catalog_url = %config.catalog_url,
        extra_headers = config.extra_headers.len(),
        "building catalog HTTP client"
    );

    let user_agent = config
        .user_agent
        .clone()
        .unwrap_or_else(|| format!("finder/{}", env!("CARGO_PKG_VERSION")));

    reqwest::Client::builder()
        .default_headers(headers)
        .connect_timeout(Duration::from_secs(15))
        .timeout(Duration::from_secs(60))
        .user_agent(user_agent)
        .build()
        .map_err(|e| CatalogClientError::Other(e.to_string()))
}

#[cfg(test)]
pub mod tests {
    use std::collections::BTreeMap;

    use httpmock::prelude::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn client_config(url: &str) -> CatalogClientConfig {
        CatalogClientConfig::new(Url::parse(url).unwrap())
    }

    fn page_query(skip: u64, limit: u32) -> ProductQuery {
        ProductQuery {
            skip,
            limit,
            ..Default::default()
        }
    }

    fn product_json(id: u64) -> serde_json::Value {
        json!({
            "id": id,
            "name": format!("Product {id}"),
            "price": "19.90",
            "image_url": format!("https://images.example/{id}.png"),
            "availability": "In Stock",
            "category": "Lighting",
        })
    }

    #[tokio::test]
    async fn search_sends_filters_and_paging() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/products")
                .query_param("q", "lamp")
                .query_param("min_price", "10")
                .query_param("category", "Lighting")
                .query_param("skip", "6")
                .query_param("limit", "6");
            then.status(200).json_body(json!([product_json(7)]));
        });

        let client = CatalogClient::new(client_config(&server.base_url())).unwrap();
        let query = ProductQuery {
            q: Some("lamp".to_string()),
            min_price: Some(10.0),
            category: Some("Lighting".to_string()),
            ..page_query(6, 6)
        };
        let page = client.search_products(&query).await.unwrap();

        mock.assert();
        assert_eq!(page.products.items.len(), 1);
        assert_eq!(page.products.items[0].price, 19.9);
        assert_eq!(page.products.total, None);
        assert_eq!(page.total_header, None);
    }

    #[tokio::test]
    async fn search_reads_wrapped_total_and_header() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET).path("/api/products");
            then.status(200)
                .header("x-total-count", "31")
                .json_body(json!({"products": [product_json(1), product_json(2)], "total": 30}));
        });

        let client = CatalogClient::new(client_config(&server.base_url())).unwrap();
        let page = client.search_products(&page_query(0, 6)).await.unwrap();

        mock.assert();
        assert_eq!(page.products.total, Some(30));
        assert_eq!(page.total_header.as_deref(), Some("31"));
    }

    #[tokio::test]
    async fn search_respects_base_path() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET).path("/shop/api/products");
            then.status(200).json_body(json!([]));
        });

        let client =
            CatalogClient::new(client_config(&format!("{}/shop/", server.base_url()))).unwrap();
        client.search_products(&page_query(0, 6)).await.unwrap();
        mock.assert();
    }

    #[tokio::test]
    async fn search_unknown_shape_is_decode_error() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|_, then| {
            then.status(200).json_body(json!({"items": []}));
        });

        let client = CatalogClient::new(client_config(&server.base_url())).unwrap();
        let result = client.search_products(&page_query(0, 6)).await;

        mock.assert();
        assert!(
            matches!(result, Err(CatalogClientError::Decode(_))),
            "expected CatalogClientError::Decode, found: {result:?}"
        );
    }

    #[tokio::test]
    async fn search_error_response_keeps_message() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|_, then| {
            then.status(503)
                .header("content-type", "application/json")
                .json_body(json!({"message": "index is rebuilding"}));
        });

        let client = CatalogClient::new(client_config(&server.base_url())).unwrap();
        let result = client.search_products(&page_query(0, 6)).await;

        mock.assert();
        match result {
            Err(CatalogClientError::Server { status, message }) => {
                assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
                assert_eq!(message.as_deref(), Some("index is rebuilding"));
            },
            other => panic!("expected CatalogClientError::Server, found: {other:?}"),
        }
    }

    #[tokio::test]
    async fn unreachable_catalog_is_network_error() {
        // Nothing listens on port 1.
        let client = CatalogClient::new(client_config("http://127.0.0.1:1")).unwrap();
        let result = client.search_products(&page_query(0, 6)).await;
        assert!(
            matches!(result, Err(CatalogClientError::Network(_))),
            "expected CatalogClientError::Network, found: {result:?}"
        );
    }

    #[tokio::test]
    async fn product_details_are_decoded() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET).path("/api/products/42");
            then.status(200).json_body(json!({
                "id": 42,
                "name": "Desk lamp",
                "price": 35,
                "availability": "in stock",
                "description": "Bright.",
                "specifications": {"Wattage": "40W"},
            }));
        });

        let client = CatalogClient::new(client_config(&server.base_url())).unwrap();
        let detail = client.product(&ProductId::Number(42)).await.unwrap();

        mock.assert();
        assert_eq!(detail.summary.name, "Desk lamp");
        assert!(detail.summary.is_in_stock());
        assert_eq!(detail.description_or_default(), "Bright.");
    }

    /// 404 errors are mapped to [ProductError::NotFound],
    /// so consumers dont need to inspect raw error responses
    #[tokio::test]
    async fn product_not_found() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|_, then| {
            then.status(404)
                .header("content-type", "application/json")
                .json_body(json!({"message": "Product not found"}));
        });

        let client = CatalogClient::new(client_config(&server.base_url())).unwrap();
        let result = client.product(&ProductId::from("missing")).await;

        mock.assert();
        assert!(
            matches!(&result, Err(ProductError::NotFound(id)) if id == "missing"),
            "expected ProductError::NotFound, found: {result:?}"
        );
    }

    #[tokio::test]
    async fn crawl_returns_message() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST).path("/api/crawl");
            then.status(200)
                .json_body(json!({"message": "Crawled 10 products"}));
        });

        let client = CatalogClient::new(client_config(&server.base_url())).unwrap();
        let response = client.crawl().await.unwrap();

        mock.assert();
        assert_eq!(response.message, "Crawled 10 products");
    }

    #[tokio::test]
    async fn crawl_error_without_structured_body() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|_, then| {
            then.status(500).body("<html>Internal Server Error</html>");
        });

        let client = CatalogClient::new(client_config(&server.base_url())).unwrap();
        let err = client.crawl().await.unwrap_err();

        mock.assert();
        assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
        assert_eq!(err.user_message(), "500 Internal Server Error");
    }

    #[tokio::test]
    async fn extra_headers_set_on_all_requests() {
        let mut extra_headers: BTreeMap<String, String> = BTreeMap::new();
        extra_headers.insert("finder-test".to_string(), "test-value".to_string());
        extra_headers.insert("finder-test2".to_string(), "test-value2".to_string());

        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.header("finder-test", "test-value")
                .header("finder-test2", "test-value2");
            then.status(200).json_body(json!([]));
        });

        let config = CatalogClientConfig {
            extra_headers,
            ..client_config(&server.base_url())
        };

        let client = CatalogClient::new(config).unwrap();
        let _ = client.search_products(&page_query(0, 6)).await;
        mock.assert();
    }

    #[tokio::test]
    async fn user_agent_set_on_all_requests() {
        let expected_agent = "my-custom-user-agent";

        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.header("user-agent", expected_agent);
            then.status(200).json_body(json!({"message": "ok"}));
        });

        let config = CatalogClientConfig {
            user_agent: Some(expected_agent.to_owned()),
            ..client_config(&server.base_url())
        };

        let client = CatalogClient::new(config).unwrap();
        let _ = client.crawl().await;
        mock.assert();
    }

    #[test]
    fn invalid_extra_header_is_rejected() {
        let mut config = client_config("http://localhost:5000");
        config
            .extra_headers
            .insert("not a header".to_string(), "value".to_string());
        assert!(matches!(
            CatalogClient::new(config),
            Err(CatalogClientError::Other(_))
        ));
    }
}
