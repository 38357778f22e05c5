//! Catalog client types used by the controllers.

pub use finder_catalog::*;
