//! A catalog client that answers from a queue of canned responses.
//!
//! Used by tests of the query controller and by the CLI when
//! [FINDER_CATALOG_MOCK_DATA_VAR] points to a file of mock responses.

use std::collections::VecDeque;
use std::path::Path;
use std::sync::{Arc, Mutex};

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::client::ClientTrait;
use crate::error::{CatalogClientError, ProductError};
use crate::types::*;

pub const FINDER_CATALOG_MOCK_DATA_VAR: &str = "FINDER_CATALOG_MOCK";

// Arc allows you to push things into the client from outside the client if necessary
// Mutex allows you to share across threads (necessary because of tokio)
type MockField<T> = Arc<Mutex<T>>;

/// An error response as stored in mock data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenericResponse {
    pub status: u16,
    #[serde(default)]
    pub message: Option<String>,
}

impl TryFrom<GenericResponse> for CatalogClientError {
    type Error = MockDataError;

    fn try_from(value: GenericResponse) -> Result<Self, Self::Error> {
        let status = StatusCode::from_u16(value.status)
            .map_err(|_| MockDataError::InvalidData("invalid status code".into()))?;
        Ok(CatalogClientError::Server {
            status,
            message: value.message,
        })
    }
}

/// A single canned response.
#[derive(Debug, Serialize, Deserialize)]
pub enum Response {
    Products(ProductsPage),
    Product(ProductDetail),
    Crawl(CrawlResponse),
    Error(GenericResponse),
    /// A transport failure with the given message.
    NetworkError(String),
}

/// A request received by a [MockClient].
#[derive(Debug, Clone, PartialEq)]
pub enum MockRequest {
    Search(ProductQuery),
    Product(ProductId),
    Crawl,
}

#[derive(Debug, Error)]
pub enum MockDataError {
    /// Failed to read the JSON file pointed at by the FINDER_CATALOG_MOCK var
    #[error("failed to read mock response file")]
    ReadMockFile(#[source] std::io::Error),
    /// Failed to parse the contents of the mock data file as JSON
    #[error("failed to parse mock data as JSON")]
    ParseJson(#[source] serde_json::Error),
    /// The data was parsed as JSON but it wasn't semantically valid
    #[error("invalid mocked data: {0}")]
    InvalidData(String),
}

/// Reads a list of mock responses from disk.
fn read_mock_responses(path: impl AsRef<Path>) -> Result<VecDeque<Response>, MockDataError> {
    let contents = std::fs::read_to_string(path).map_err(MockDataError::ReadMockFile)?;
    let deserialized: Vec<Response> =
        serde_json::from_str(&contents).map_err(MockDataError::ParseJson)?;
    Ok(deserialized.into())
}

/// A catalog client that can be seeded with mock responses
#[derive(Debug, Default, Clone)]
pub struct MockClient {
    pub mock_responses: MockField<VecDeque<Response>>,
    /// Every request received, in order of arrival.
    pub requests: MockField<Vec<MockRequest>>,
}

impl MockClient {
    /// Create a new mock client, potentially reading mock responses from disk
    pub fn new(mock_data_path: Option<impl AsRef<Path>>) -> Result<Self, MockDataError> {
        let mock_responses = match mock_data_path {
            Some(path) => {
                debug!(path = %path.as_ref().display(), "reading mock responses");
                read_mock_responses(path)?
            },
            None => VecDeque::new(),
        };
        Ok(Self {
            mock_responses: Arc::new(Mutex::new(mock_responses)),
            requests: Default::default(),
        })
    }

    fn push_response(&self, response: Response) {
        self.mock_responses
            .lock()
            .expect("couldn't acquire mock lock")
            .push_back(response);
    }

    /// Push a new response into the list of mock responses
    pub fn push_products_response(&self, page: ProductsPage) {
        self.push_response(Response::Products(page));
    }

    /// Push a page that carries no total count signal.
    pub fn push_products(&self, items: Vec<ProductSummary>) {
        self.push_products_response(ProductsPage {
            products: NormalizedProducts { items, total: None },
            total_header: None,
        });
    }

    pub fn push_product_response(&self, detail: ProductDetail) {
        self.push_response(Response::Product(detail));
    }

    pub fn push_crawl_response(&self, message: impl Into<String>) {
        self.push_response(Response::Crawl(CrawlResponse {
            message: message.into(),
        }));
    }

    /// Push an API error into the list of mock responses
    pub fn push_error_response(&self, status: u16, message: Option<&str>) {
        self.push_response(Response::Error(GenericResponse {
            status,
            message: message.map(ToOwned::to_owned),
        }));
    }

    pub fn push_network_error(&self, message: impl Into<String>) {
        self.push_response(Response::NetworkError(message.into()));
    }

    /// All requests received so far.
    pub fn requests(&self) -> Vec<MockRequest> {
        self.requests
            .lock()
            .expect("couldn't acquire mock lock")
            .clone()
    }

    /// The queries of all search requests received so far.
    pub fn search_queries(&self) -> Vec<ProductQuery> {
        self.requests()
            .into_iter()
            .filter_map(|request| match request {
                MockRequest::Search(query) => Some(query),
                _ => None,
            })
            .collect()
    }

    fn next_response(&self, request: MockRequest) -> Option<Response> {
        self.requests
            .lock()
            .expect("couldn't acquire mock lock")
            .push(request);
        self.mock_responses
            .lock()
            .expect("couldn't acquire mock lock")
            .pop_front()
    }
}

/// Convert the failure variants shared by all operations.
fn failure(response: Response, expected: &str) -> CatalogClientError {
    match response {
        Response::Error(err) => err
            .try_into()
            .unwrap_or_else(|e: MockDataError| CatalogClientError::Other(e.to_string())),
        Response::NetworkError(message) => CatalogClientError::Network(message),
        other => CatalogClientError::Other(format!("expected {expected} response, found {other:?}")),
    }
}

impl ClientTrait for MockClient {
    async fn search_products(
        &self,
        query: &ProductQuery,
    ) -> Result<ProductsPage, CatalogClientError> {
        match self.next_response(MockRequest::Search(query.clone())) {
            Some(Response::Products(page)) => Ok(page),
            Some(other) => Err(failure(other, "products")),
            None => Err(CatalogClientError::Other(
                "expected products response, found none".to_string(),
            )),
        }
    }

    async fn product(&self, id: &ProductId) -> Result<ProductDetail, ProductError> {
        match self.next_response(MockRequest::Product(id.clone())) {
            Some(Response::Product(detail)) => Ok(detail),
            Some(Response::Error(err)) if err.status == StatusCode::NOT_FOUND.as_u16() => {
                Err(ProductError::NotFound(id.to_string()))
            },
            Some(other) => Err(failure(other, "product").into()),
            None => Err(CatalogClientError::Other(
                "expected product response, found none".to_string(),
            )
            .into()),
        }
    }

    async fn crawl(&self) -> Result<CrawlResponse, CatalogClientError> {
        match self.next_response(MockRequest::Crawl) {
            Some(Response::Crawl(response)) => Ok(response),
            Some(other) => Err(failure(other, "crawl")),
            None => Err(CatalogClientError::Other(
                "expected crawl response, found none".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn product(id: u64) -> ProductSummary {
        ProductSummary {
            id: ProductId::Number(id),
            name: format!("Product {id}"),
            price: 1.0,
            image_url: None,
            availability: "In Stock".to_string(),
            category: None,
        }
    }

    #[tokio::test]
    async fn mock_client_uses_seeded_responses() {
        let path: Option<&Path> = None;
        let client = MockClient::new(path).unwrap();
        client.push_products(vec![product(1), product(2)]);

        let page = client
            .search_products(&ProductQuery::default())
            .await
            .unwrap();
        assert_eq!(page.products.items.len(), 2);
        assert_eq!(client.search_queries(), vec![ProductQuery::default()]);
    }

    #[tokio::test]
    async fn can_push_responses_outside_of_client() {
        let path: Option<&Path> = None;
        let client = MockClient::new(path).unwrap();
        {
            // Need to drop the mutex guard otherwise `crawl` will block trying to read
            // the queue of mock responses
            let resp_handle = client.mock_responses.clone();
            let mut responses = resp_handle.lock().unwrap();
            responses.push_back(Response::Crawl(CrawlResponse {
                message: "done".to_string(),
            }));
        }
        let resp = client.crawl().await.unwrap();
        assert_eq!(resp.message, "done");
        assert_eq!(client.requests(), vec![MockRequest::Crawl]);
    }

    #[tokio::test]
    async fn error_responses_become_client_errors() {
        let path: Option<&Path> = None;
        let client = MockClient::new(path).unwrap();
        client.push_error_response(502, Some("upstream down"));
        client.push_network_error("Network Error");
        client.push_error_response(404, None);

        let err = client.crawl().await.unwrap_err();
        assert_eq!(err.user_message(), "upstream down");

        let err = client
            .search_products(&ProductQuery::default())
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogClientError::Network(ref m) if m == "Network Error"));

        let err = client.product(&ProductId::Number(3)).await.unwrap_err();
        assert!(matches!(err, ProductError::NotFound(ref id) if id == "3"));
    }

    #[tokio::test]
    async fn exhausted_queue_is_an_error() {
        let path: Option<&Path> = None;
        let client = MockClient::new(path).unwrap();
        assert!(client.crawl().await.is_err());
    }

    #[test]
    fn error_when_invalid_json() {
        let tmp = NamedTempFile::new().unwrap();
        // There's nothing in the mock data file yet, so it can't be parsed as JSON.
        let res = MockClient::new(Some(&tmp));
        assert!(matches!(res, Err(MockDataError::ParseJson(_))));
    }

    #[tokio::test]
    async fn parses_basic_json() {
        let mut tmp = NamedTempFile::new().unwrap();
        tmp.write_all(br#"[{"Crawl": {"message": "Crawled 3 products"}}]"#)
            .unwrap();
        let client = MockClient::new(Some(&tmp)).unwrap();
        let resp = client.crawl().await.unwrap();
        assert_eq!(resp.message, "Crawled 3 products");
    }
}
