//! Configuration types for catalog client construction.

use std::collections::BTreeMap;

use url::Url;

/// Base URL used when nothing else is configured.
pub const DEFAULT_CATALOG_URL: &str = "http://localhost:5000";

/// Configuration for catalog client construction.
#[derive(Debug, Clone)]
pub struct CatalogClientConfig {
    /// Base URL for the catalog API.
    ///
    /// Endpoint paths such as `api/products` are appended to this URL,
    /// so a catalog mounted below a path prefix works as well.
    pub catalog_url: Url,
    /// Additional headers to include in requests.
    pub extra_headers: BTreeMap<String, String>,
    /// Override for the `user-agent` header.
    pub user_agent: Option<String>,
}

impl CatalogClientConfig {
    pub fn new(catalog_url: Url) -> Self {
        Self {
            catalog_url,
            extra_headers: BTreeMap::new(),
            user_agent: None,
        }
    }
}

impl Default for CatalogClientConfig {
    fn default() -> Self {
        Self::new(Url::parse(DEFAULT_CATALOG_URL).expect("default catalog url is valid"))
    }
}
