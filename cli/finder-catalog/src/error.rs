//! Error handling for catalog API operations.

use std::error::Error as _;

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Common error type for catalog API operations.
///
/// Operation specific errors (e.g. [ProductError]) wrap this type.
#[derive(Debug, Error)]
pub enum CatalogClientError {
    /// The catalog could not be reached, the connection broke,
    /// or the request timed out.
    #[error("{0}")]
    Network(String),
    /// The response body matched none of the accepted shapes.
    #[error("could not decode catalog response: {0}")]
    Decode(String),
    /// The catalog answered with a non-success status.
    ///
    /// `message` is the structured error detail of the response body, if any.
    #[error("{}", fmt_server_error(*.status, .message.as_deref()))]
    Server {
        status: StatusCode,
        message: Option<String>,
    },
    #[error("{0}")]
    Other(String),
}

impl CatalogClientError {
    /// The text shown to users for this error.
    ///
    /// Prefers the structured message sent by the server
    /// and falls back to the transport level description.
    pub fn user_message(&self) -> String {
        match self {
            CatalogClientError::Server {
                message: Some(message),
                ..
            } => message.clone(),
            other => other.to_string(),
        }
    }

    /// The status of a server error.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            CatalogClientError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for CatalogClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return CatalogClientError::Decode(fmt_error_chain(&err));
        }
        CatalogClientError::Network(fmt_error_chain(&err))
    }
}

/// Errors returned when looking up a single product.
#[derive(Debug, Error)]
pub enum ProductError {
    #[error("product '{0}' not found")]
    NotFound(String),
    #[error(transparent)]
    CatalogClientError(#[from] CatalogClientError),
}

/// Extract the structured message of an error response body.
///
/// Catalog errors carry a `message` field, some frameworks use `detail`
/// instead. Bodies that are not JSON, or JSON without either field
/// (e.g. an HTML error page), yield `None`.
pub(crate) fn parse_error_message(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    ["message", "detail"]
        .iter()
        .find_map(|key| value.get(key)?.as_str())
        .map(ToOwned::to_owned)
}

fn fmt_server_error(status: StatusCode, message: Option<&str>) -> String {
    match message {
        Some(message) => format!("{status}: {message}"),
        None => format!("{status}"),
    }
}

/// reqwest hides the interesting part (e.g. "connection refused")
/// in the error source, so render the whole chain.
fn fmt_error_chain(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message = format!("{message}: {cause}");
        source = cause.source();
    }
    message
}
