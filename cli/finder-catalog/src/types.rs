//! Catalog interaction types.
//!
//! These types represent the wire model of the catalog API
//! and the canonical shapes the rest of the workspace consumes.

use std::collections::BTreeMap;
use std::fmt::Display;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use serde_with::{DisplayFromStr, PickFirst, serde_as};

use crate::error::CatalogClientError;

/// Image shown for products without a (loadable) image.
pub const PLACEHOLDER_IMAGE: &str = "/placeholder.png";
pub const DEFAULT_DESCRIPTION: &str = "No description available";

// ---------------------------------------------------------------------------
// Products
// ---------------------------------------------------------------------------

/// Identifier of a product.
///
/// Catalogs backed by different stores hand out either numeric or textual
/// ids, both are accepted and rendered as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductId {
    Number(u64),
    Text(String),
}

impl Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProductId::Number(id) => Display::fmt(id, f),
            ProductId::Text(id) => Display::fmt(id, f),
        }
    }
}

impl From<&str> for ProductId {
    fn from(value: &str) -> Self {
        ProductId::Text(value.to_owned())
    }
}

impl From<u64> for ProductId {
    fn from(value: u64) -> Self {
        ProductId::Number(value)
    }
}

/// A product as listed in search results.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSummary {
    pub id: ProductId,
    pub name: String,
    /// Sent either as a JSON number or as a numeric string.
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub availability: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl ProductSummary {
    /// Whether the product can currently be bought.
    pub fn is_in_stock(&self) -> bool {
        self.availability.to_lowercase().contains("in stock")
    }

    /// The price as shown to users, e.g. `$12.50`.
    pub fn display_price(&self) -> String {
        format!("${:.2}", self.price)
    }

    pub fn image_url_or_placeholder(&self) -> &str {
        match self.image_url.as_deref() {
            Some(url) if !url.is_empty() => url,
            _ => PLACEHOLDER_IMAGE,
        }
    }
}

/// A product with all details the catalog knows about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDetail {
    #[serde(flatten)]
    pub summary: ProductSummary,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specifications: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviews_count: Option<u64>,
}

impl ProductDetail {
    pub fn description_or_default(&self) -> &str {
        self.description.as_deref().unwrap_or(DEFAULT_DESCRIPTION)
    }
}

// ---------------------------------------------------------------------------
// Search responses
// ---------------------------------------------------------------------------

/// The body of a product search response.
///
/// The catalog returns either a bare list of products,
/// or an object wrapping the list with an optional total count.
/// Consumers should not match on the shape,
/// but use [NormalizedProducts] via [ProductsResponse::normalize].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductsResponse {
    BareList(Vec<ProductSummary>),
    Wrapped {
        products: Vec<ProductSummary>,
        #[serde(
            default,
            deserialize_with = "lenient_total",
            skip_serializing_if = "Option::is_none"
        )]
        total: Option<u64>,
    },
}

/// Accept whole numbers sent as integers, floats or numeric strings.
///
/// Any other value is treated as absent.
fn lenient_total<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(total_from_value))
}

fn total_from_value(value: &Value) -> Option<u64> {
    match value {
        Value::Number(number) => number.as_u64().or_else(|| {
            number
                .as_f64()
                .filter(|total| total.is_finite() && *total >= 0.0 && total.fract() == 0.0)
                .map(|total| total as u64)
        }),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

impl ProductsResponse {
    /// Decode a raw response body.
    ///
    /// Fails with [CatalogClientError::Decode] if the body is not JSON
    /// or matches neither accepted shape.
    pub fn from_slice(body: &[u8]) -> Result<Self, CatalogClientError> {
        serde_json::from_slice(body).map_err(|e| CatalogClientError::Decode(e.to_string()))
    }

    pub fn normalize(self) -> NormalizedProducts {
        match self {
            ProductsResponse::BareList(items) => NormalizedProducts { items, total: None },
            ProductsResponse::Wrapped { products, total } => NormalizedProducts {
                items: products,
                total,
            },
        }
    }
}

/// The canonical form of a search response body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedProducts {
    pub items: Vec<ProductSummary>,
    /// Total number of matching products, if the body reported one.
    pub total: Option<u64>,
}

/// Decode and normalize a search response body in one step.
pub fn normalize_response(body: &[u8]) -> Result<NormalizedProducts, CatalogClientError> {
    ProductsResponse::from_slice(body).map(ProductsResponse::normalize)
}

/// One page of search results as received from the catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductsPage {
    pub products: NormalizedProducts,
    /// Raw value of the total count header, if the catalog sent one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_header: Option<String>,
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Parameters of a product search request.
///
/// `None` fields are left out of the request entirely.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductQuery {
    pub q: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub category: Option<String>,
    pub availability: Option<String>,
    pub skip: u64,
    pub limit: u32,
}

impl ProductQuery {
    /// Render the query as `(name, value)` pairs in a stable order.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(q) = &self.q {
            pairs.push(("q", q.clone()));
        }
        if let Some(min_price) = self.min_price {
            pairs.push(("min_price", min_price.to_string()));
        }
        if let Some(max_price) = self.max_price {
            pairs.push(("max_price", max_price.to_string()));
        }
        if let Some(category) = &self.category {
            pairs.push(("category", category.clone()));
        }
        if let Some(availability) = &self.availability {
            pairs.push(("availability", availability.clone()));
        }
        pairs.push(("skip", self.skip.to_string()));
        pairs.push(("limit", self.limit.to_string()));
        pairs
    }
}

/// Successful response of a crawl request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CrawlResponse {
    #[serde(default)]
    pub message: String,
}
