//! HTTP client for the product catalog API.
//!
//! This crate provides:
//! - HTTP client construction with timeouts and extra headers
//! - Decoding and normalization of the catalog's response shapes
//! - Common error handling for catalog API operations
//! - A mock client answering from canned responses
//!
//! ## Usage
//!
//! ```ignore
//! use finder_catalog::{CatalogClient, CatalogClientConfig, ClientTrait, ProductQuery};
//!
//! let client = CatalogClient::new(CatalogClientConfig::default())?;
//! let page = client.search_products(&ProductQuery { limit: 6, ..Default::default() }).await?;
//! ```

mod client;
mod config;
mod error;
mod mock;
pub mod types;

pub use client::{CatalogClient, Client, ClientTrait, TOTAL_COUNT_HEADER};
pub use config::{CatalogClientConfig, DEFAULT_CATALOG_URL};
pub use error::{CatalogClientError, ProductError};
pub use mock::{
    FINDER_CATALOG_MOCK_DATA_VAR,
    GenericResponse,
    MockClient,
    MockDataError,
    MockRequest,
    Response,
};
pub use types::{
    CrawlResponse,
    NormalizedProducts,
    ProductDetail,
    ProductId,
    ProductQuery,
    ProductSummary,
    ProductsPage,
    ProductsResponse,
    normalize_response,
};
