//! Asking the catalog to refresh its product data.

use std::fmt::Display;

use tracing::{debug, instrument};

use super::catalog::{CatalogClientError, ClientTrait, CrawlResponse};
use super::query::QueryController;
use crate::models::session::{QueryError, QueryResult, QuerySession};

pub const CRAWL_IN_PROGRESS: &str = "Crawling...";
pub const CRAWL_ERROR_PREFIX: &str = "Error during crawl: ";

/// Status line of the crawl action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CrawlStatus {
    #[default]
    Idle,
    InProgress,
    /// The catalog's message for a completed crawl.
    Succeeded(String),
    Failed(String),
}

impl Display for CrawlStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CrawlStatus::Idle => Ok(()),
            CrawlStatus::InProgress => write!(f, "{CRAWL_IN_PROGRESS}"),
            CrawlStatus::Succeeded(message) => write!(f, "{message}"),
            CrawlStatus::Failed(message) => write!(f, "{CRAWL_ERROR_PREFIX}{message}"),
        }
    }
}

/// Proof that a crawl was started and has to be finished.
#[derive(Debug)]
#[must_use = "a started crawl must be passed to CrawlTrigger::finish"]
pub struct CrawlTicket(());

/// Result of [CrawlTrigger::trigger_crawl].
#[derive(Debug)]
pub enum CrawlOutcome {
    /// The crawl succeeded and the current query was run again.
    Refreshed(Result<QueryResult, QueryError>),
    /// The crawl failed, the status holds the error.
    Failed(CatalogClientError),
    /// Another crawl was already running.
    Coalesced,
}

/// Tracks the crawl action of a session.
///
/// At most one crawl is in flight at a time,
/// triggers arriving meanwhile are coalesced into the running one.
#[derive(Debug, Default)]
pub struct CrawlTrigger {
    status: CrawlStatus,
    in_flight: bool,
}

impl CrawlTrigger {
    pub fn status(&self) -> &CrawlStatus {
        &self.status
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Mark a crawl as started.
    ///
    /// Returns `None` if one is already in flight.
    pub fn begin(&mut self) -> Option<CrawlTicket> {
        if self.in_flight {
            debug!("crawl already in flight");
            return None;
        }
        self.in_flight = true;
        self.status = CrawlStatus::InProgress;
        Some(CrawlTicket(()))
    }

    /// Record the answer to a started crawl.
    pub fn finish(
        &mut self,
        _ticket: CrawlTicket,
        outcome: Result<CrawlResponse, CatalogClientError>,
    ) -> Result<(), CatalogClientError> {
        self.in_flight = false;
        match outcome {
            Ok(response) => {
                debug!(server_message = %response.message, "crawl finished");
                self.status = CrawlStatus::Succeeded(response.message);
                Ok(())
            },
            Err(e) => {
                debug!(error = %e, "crawl failed");
                self.status = CrawlStatus::Failed(e.user_message());
                Err(e)
            },
        }
    }

    /// Crawl, then run the session's query again.
    ///
    /// Crawl failures are reported through the status and never retried.
    #[instrument(skip_all)]
    pub async fn trigger_crawl<C: ClientTrait>(
        &mut self,
        controller: &QueryController<C>,
        session: &mut QuerySession,
    ) -> CrawlOutcome {
        let Some(ticket) = self.begin() else {
            return CrawlOutcome::Coalesced;
        };
        let outcome = controller.client().crawl().await;
        match self.finish(ticket, outcome) {
            Ok(()) => CrawlOutcome::Refreshed(controller.execute_query(session).await),
            Err(e) => CrawlOutcome::Failed(e),
        }
    }
}
