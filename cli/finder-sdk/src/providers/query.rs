use std::num::NonZeroU32;

use tracing::{debug, instrument};

use super::catalog::ClientTrait;
use crate::models::session::{QueryError, QueryResult, QuerySession};

/// Runs the queries of a [QuerySession] against a catalog.
#[derive(Debug, Clone)]
pub struct QueryController<C> {
    client: C,
}

impl<C: ClientTrait> QueryController<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Query the catalog for the session's current filters and page.
    ///
    /// The result replaces the session's previous result.
    /// On failure the session shows an empty result with a total of 0
    /// and the error is returned.
    #[instrument(skip_all, fields(page = session.current_page().get()))]
    pub async fn execute_query(
        &self,
        session: &mut QuerySession,
    ) -> Result<QueryResult, QueryError> {
        let ticket = session.begin_query();
        debug!(
            seq = ticket.seq(),
            skip = ticket.query().skip,
            limit = ticket.query().limit,
            "querying catalog"
        );
        let outcome = self.client.search_products(ticket.query()).await;
        session.apply(ticket, outcome)
    }

    /// Start a new search: go back to the first page and query.
    pub async fn search(&self, session: &mut QuerySession) -> Result<QueryResult, QueryError> {
        session.set_page(NonZeroU32::MIN);
        self.execute_query(session).await
    }

    /// Clear all filters, go back to the first page and query.
    pub async fn reset_filters(
        &self,
        session: &mut QuerySession,
    ) -> Result<QueryResult, QueryError> {
        session.clear_filters();
        self.execute_query(session).await
    }

    /// Go to `target` and query.
    ///
    /// Returns `Ok(None)` without querying if `target` is not a valid page.
    pub async fn navigate(
        &self,
        session: &mut QuerySession,
        target: u32,
    ) -> Result<Option<QueryResult>, QueryError> {
        if session.navigate(target).is_none() {
            return Ok(None);
        }
        self.execute_query(session).await.map(Some)
    }

    /// Go to the next page if the controls allow it.
    pub async fn next_page(
        &self,
        session: &mut QuerySession,
    ) -> Result<Option<QueryResult>, QueryError> {
        if !session.controls().has_next {
            debug!("no next page");
            return Ok(None);
        }
        let target = session.current_page().saturating_add(1).get();
        self.navigate(session, target).await
    }

    pub async fn previous_page(
        &self,
        session: &mut QuerySession,
    ) -> Result<Option<QueryResult>, QueryError> {
        if !session.controls().has_previous {
            debug!("no previous page");
            return Ok(None);
        }
        let target = session.current_page().get() - 1;
        self.navigate(session, target).await
    }
}
