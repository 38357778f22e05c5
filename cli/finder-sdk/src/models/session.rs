//! State of one browsing session.
//!
//! A [QuerySession] is owned by its caller and passed explicitly into the
//! controllers in [crate::providers].
//! Queries run in two phases: [QuerySession::begin_query] captures the request
//! for the current state, and [QuerySession::apply] folds the catalog's answer
//! back in. Every query carries a sequence number, answers older than the last
//! applied one are discarded.

use std::num::NonZeroU32;

use finder_catalog::{CatalogClientError, ProductQuery, ProductSummary, ProductsPage};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use super::estimate::total_for_page;
use super::filter::FilterCriteria;
use super::pagination::{PageControls, PaginationState};

/// The products shown for the most recent query.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QueryResult {
    pub items: Vec<ProductSummary>,
    pub total_count: u64,
}

#[derive(Debug, Error)]
pub enum QueryError {
    #[error(transparent)]
    CatalogClientError(#[from] CatalogClientError),
    /// A newer query was applied before this one completed.
    #[error("query {seq} was superseded by query {applied}")]
    Superseded { seq: u64, applied: u64 },
}

/// A query issued by a session, awaiting its answer.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryTicket {
    seq: u64,
    page: NonZeroU32,
    query: ProductQuery,
}

impl QueryTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// The page the query was issued for.
    pub fn page(&self) -> NonZeroU32 {
        self.page
    }

    pub fn query(&self) -> &ProductQuery {
        &self.query
    }
}

#[derive(Debug, Clone, Default)]
pub struct QuerySession {
    filter: FilterCriteria,
    pagination: PaginationState,
    result: QueryResult,
    last_page_len: usize,
    issued_seq: u64,
    applied_seq: u64,
    last_error: Option<String>,
}

impl QuerySession {
    pub fn new(page_size: NonZeroU32) -> Self {
        Self {
            pagination: PaginationState::new(page_size),
            ..Default::default()
        }
    }

    pub fn filter(&self) -> &FilterCriteria {
        &self.filter
    }

    /// Replace the filter criteria. Does not query.
    pub fn set_filter(&mut self, criteria: FilterCriteria) {
        self.filter = criteria;
    }

    pub fn pagination(&self) -> &PaginationState {
        &self.pagination
    }

    pub fn current_page(&self) -> NonZeroU32 {
        self.pagination.current_page()
    }

    pub fn page_size(&self) -> NonZeroU32 {
        self.pagination.page_size()
    }

    /// Set the current page. Does not query.
    pub fn set_page(&mut self, page: NonZeroU32) {
        self.pagination.set_current_page(page);
    }

    /// Clear all filters and return to the first page. Does not query.
    pub fn clear_filters(&mut self) {
        self.filter = FilterCriteria::default();
        self.pagination.set_current_page(NonZeroU32::MIN);
    }

    /// Move to `target` if it is within the known pages.
    pub fn navigate(&mut self, target: u32) -> Option<NonZeroU32> {
        let moved = self.pagination.navigate(target);
        if moved.is_none() {
            debug!(
                requested = target,
                total_pages = self.pagination.total_pages(),
                "rejected navigation"
            );
        }
        moved
    }

    pub fn controls(&self) -> PageControls {
        self.pagination.controls(self.last_page_len)
    }

    pub fn result(&self) -> &QueryResult {
        &self.result
    }

    /// Number of items returned by the last applied query.
    pub fn last_page_len(&self) -> usize {
        self.last_page_len
    }

    /// Message of the last failed query, cleared by the next success.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Whether the latest issued query has not been answered yet.
    pub fn is_loading(&self) -> bool {
        self.issued_seq > self.applied_seq
    }

    /// Capture the request for the current filters and page.
    pub fn begin_query(&mut self) -> QueryTicket {
        self.issued_seq += 1;
        let page = self.pagination.current_page();
        QueryTicket {
            seq: self.issued_seq,
            page,
            query: self
                .filter
                .to_query(self.pagination.skip(), self.pagination.page_size()),
        }
    }

    /// Fold the answer to `ticket` into the session.
    ///
    /// Failures clear the shown result and are returned to the caller.
    /// Answers older than the last applied one leave the session untouched.
    pub fn apply(
        &mut self,
        ticket: QueryTicket,
        outcome: Result<ProductsPage, CatalogClientError>,
    ) -> Result<QueryResult, QueryError> {
        if ticket.seq <= self.applied_seq {
            debug!(
                seq = ticket.seq,
                applied = self.applied_seq,
                "discarding stale query response"
            );
            return Err(QueryError::Superseded {
                seq: ticket.seq,
                applied: self.applied_seq,
            });
        }
        self.applied_seq = ticket.seq;

        match outcome {
            Ok(page) => {
                let total = total_for_page(ticket.page, self.page_size(), &page);
                debug!(
                    seq = ticket.seq,
                    items = page.products.items.len(),
                    total = total.value,
                    source = ?total.source,
                    "applied query response"
                );
                self.pagination.total_count = total.value;
                self.pagination.is_authoritative = total.is_authoritative();
                self.last_page_len = page.products.items.len();
                self.last_error = None;
                self.result = QueryResult {
                    items: page.products.items,
                    total_count: total.value,
                };
                Ok(self.result.clone())
            },
            Err(e) => {
                debug!(seq = ticket.seq, error = %e, "query failed");
                self.pagination.total_count = 0;
                self.pagination.is_authoritative = true;
                self.last_page_len = 0;
                self.last_error = Some(e.user_message());
                self.result = QueryResult::default();
                Err(QueryError::CatalogClientError(e))
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use finder_test_utils::fixtures;
    use pretty_assertions::assert_eq;

    use super::*;

    fn n(n: u32) -> NonZeroU32 {
        NonZeroU32::new(n).unwrap()
    }

    #[test]
    fn begin_query_captures_filters_and_paging() {
        let mut session = QuerySession::default();
        session.set_filter(FilterCriteria {
            query: Some("lamp".to_string()),
            ..Default::default()
        });
        session.set_page(n(3));

        let ticket = session.begin_query();
        assert_eq!(ticket.page(), n(3));
        assert_eq!(ticket.query(), &ProductQuery {
            q: Some("lamp".to_string()),
            skip: 12,
            limit: 6,
            ..Default::default()
        });
        assert!(session.is_loading());
    }

    #[test]
    fn applying_a_full_page_estimates_the_total() {
        let mut session = QuerySession::default();
        let ticket = session.begin_query();
        let result = session.apply(ticket, Ok(fixtures::page(1, 6))).unwrap();

        assert_eq!(result.total_count, 12);
        assert_eq!(result.items.len(), 6);
        assert!(!session.pagination().is_authoritative);
        assert!(!session.is_loading());
        assert_eq!(session.last_page_len(), 6);
    }

    #[test]
    fn zero_body_total_keeps_the_page_navigable() {
        let mut session = QuerySession::default();
        let ticket = session.begin_query();
        let result = session
            .apply(ticket, Ok(fixtures::page_with_total(1, 6, 0)))
            .unwrap();

        assert_eq!(result.total_count, 12);
        let controls = session.controls();
        assert_eq!(controls.total_pages, 2);
        assert!(controls.has_next);
    }

    #[test]
    fn failure_clears_the_result() {
        let mut session = QuerySession::default();
        let ticket = session.begin_query();
        session.apply(ticket, Ok(fixtures::page(1, 6))).unwrap();

        let ticket = session.begin_query();
        let err = session
            .apply(
                ticket,
                Err(CatalogClientError::Network("Network Error".to_string())),
            )
            .unwrap_err();

        assert!(matches!(err, QueryError::CatalogClientError(_)));
        assert_eq!(session.result(), &QueryResult::default());
        assert_eq!(session.pagination().total_count, 0);
        assert_eq!(session.last_error(), Some("Network Error"));
    }

    #[test]
    fn success_clears_the_last_error() {
        let mut session = QuerySession::default();
        let ticket = session.begin_query();
        let _ = session.apply(ticket, Err(CatalogClientError::Other("boom".to_string())));
        assert!(session.last_error().is_some());

        let ticket = session.begin_query();
        session.apply(ticket, Ok(fixtures::page(1, 2))).unwrap();
        assert_eq!(session.last_error(), None);
    }

    #[test]
    fn stale_responses_are_discarded() {
        let mut session = QuerySession::default();
        let first = session.begin_query();
        session.set_page(n(2));
        let second = session.begin_query();

        session
            .apply(second, Ok(fixtures::page_with_total(7, 3, 9)))
            .unwrap();
        let before = session.clone();

        let err = session
            .apply(first, Ok(fixtures::page(1, 6)))
            .unwrap_err();
        assert!(matches!(err, QueryError::Superseded { seq: 1, applied: 2 }));
        assert_eq!(session.result(), before.result());
        assert_eq!(session.pagination(), before.pagination());
        assert_eq!(session.last_page_len(), 3);
    }

    #[test]
    fn totals_use_the_page_the_query_was_issued_for() {
        let mut session = QuerySession::default();
        session.set_page(n(2));
        let ticket = session.begin_query();
        // The user moves on before the answer arrives.
        session.set_page(n(1));

        let result = session.apply(ticket, Ok(fixtures::page(7, 3))).unwrap();
        assert_eq!(result.total_count, 9);
    }

    #[test]
    fn clear_filters_returns_to_the_first_page() {
        let mut session = QuerySession::new(n(10));
        session.set_filter(FilterCriteria {
            category: Some("Audio".to_string()),
            ..Default::default()
        });
        session.set_page(n(4));

        session.clear_filters();
        assert_eq!(session.filter(), &FilterCriteria::default());
        assert_eq!(session.current_page(), n(1));
        assert_eq!(session.page_size(), n(10));
    }
}
