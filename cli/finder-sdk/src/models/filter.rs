use std::num::NonZeroU32;

use finder_catalog::ProductQuery;
use serde::{Deserialize, Serialize};

/// The user's search filters.
///
/// Every field is optional.
/// Empty strings and non finite prices count as absent
/// and never reach the catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub query: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub category: Option<String>,
    pub availability: Option<String>,
}

impl FilterCriteria {
    /// Whether no filter would be sent to the catalog.
    pub fn is_empty(&self) -> bool {
        let query = self.to_query(0, NonZeroU32::MIN);
        query.q.is_none()
            && query.min_price.is_none()
            && query.max_price.is_none()
            && query.category.is_none()
            && query.availability.is_none()
    }

    /// Build the catalog request for one page of results.
    pub fn to_query(&self, skip: u64, limit: NonZeroU32) -> ProductQuery {
        ProductQuery {
            q: non_empty(&self.query),
            min_price: self.min_price.filter(|price| price.is_finite()),
            max_price: self.max_price.filter(|price| price.is_finite()),
            category: non_empty(&self.category),
            availability: non_empty(&self.availability),
            skip,
            limit: limit.get(),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .filter(|value| !value.is_empty())
        .map(ToOwned::to_owned)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn empty_strings_are_omitted() {
        let criteria = FilterCriteria {
            query: Some(String::new()),
            category: Some(String::new()),
            availability: Some("In Stock".to_string()),
            ..Default::default()
        };
        let query = criteria.to_query(12, NonZeroU32::new(6).unwrap());

        assert_eq!(query, ProductQuery {
            availability: Some("In Stock".to_string()),
            skip: 12,
            limit: 6,
            ..Default::default()
        });
    }

    #[test]
    fn prices_are_passed_through() {
        let criteria = FilterCriteria {
            min_price: Some(10.0),
            max_price: Some(f64::NAN),
            ..Default::default()
        };
        let query = criteria.to_query(0, NonZeroU32::new(6).unwrap());
        assert_eq!(query.min_price, Some(10.0));
        assert_eq!(query.max_price, None);
    }

    #[test]
    fn is_empty_ignores_blank_fields() {
        assert!(FilterCriteria::default().is_empty());
        assert!(
            FilterCriteria {
                query: Some(String::new()),
                ..Default::default()
            }
            .is_empty()
        );
        assert!(
            !FilterCriteria {
                query: Some("phone".to_string()),
                ..Default::default()
            }
            .is_empty()
        );
    }
}
