//! Query state and controllers for browsing a product catalog.
//!
//! [models] holds the plain state of a browsing session:
//! filter criteria, pagination and the last applied result.
//! [providers] drives that state against a catalog client.

pub mod models;
pub mod providers;
