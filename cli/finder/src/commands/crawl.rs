use anyhow::{Context, Result, bail};
use bpaf::Bpaf;
use finder_catalog::Client;
use finder_sdk::models::session::QuerySession;
use finder_sdk::providers::crawl::{CrawlOutcome, CrawlStatus, CrawlTrigger};
use finder_sdk::providers::query::QueryController;
use tracing::instrument;

use super::search::print_page;
use crate::config::Config;
use crate::utils::message;

// Ask the catalog to refresh its product data
#[derive(Debug, Bpaf, Clone)]
pub struct Crawl {}

impl Crawl {
    #[instrument(name = "crawl", skip_all)]
    pub async fn handle(self, config: Config, client: Client) -> Result<()> {
        let controller = QueryController::new(client);
        let mut session = QuerySession::new(config.page_size);
        let mut trigger = CrawlTrigger::default();

        message::plain(CrawlStatus::InProgress);
        run_crawl(&mut trigger, &controller, &mut session).await?;
        print_page(&session);
        Ok(())
    }
}

/// Trigger a crawl and report its status.
///
/// A failed crawl is an error, a failed refresh afterwards is an error with context.
pub(crate) async fn run_crawl(
    trigger: &mut CrawlTrigger,
    controller: &QueryController<Client>,
    session: &mut QuerySession,
) -> Result<()> {
    match trigger.trigger_crawl(controller, session).await {
        CrawlOutcome::Refreshed(refreshed) => {
            message::updated(trigger.status());
            refreshed.context("Could not refresh products after crawl")?;
        },
        CrawlOutcome::Failed(_) => bail!("{}", trigger.status()),
        CrawlOutcome::Coalesced => message::warning("A crawl is already running"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroU32;
    use std::path::Path;

    use finder_catalog::MockClient;
    use finder_test_utils::fixtures;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::utils::message::history::History;

    fn config() -> Config {
        Config {
            catalog_url: "http://catalog.invalid".parse().unwrap(),
            page_size: NonZeroU32::new(6).unwrap(),
            extra_headers: Default::default(),
        }
    }

    fn mock() -> MockClient {
        let path: Option<&Path> = None;
        MockClient::new(path).unwrap()
    }

    #[tokio::test]
    async fn crawl_reports_the_server_message() {
        let client = mock();
        client.push_crawl_response("Crawled 10 products");
        client.push_products(fixtures::products(1, 3));

        Crawl {}.handle(config(), client.into()).await.unwrap();

        assert_eq!(&History::global().messages(), &[
            "Crawling...",
            "✅ Crawled 10 products"
        ]);
    }

    #[tokio::test]
    async fn crawl_failure_is_an_error() {
        let client = mock();
        client.push_network_error("Network Error");

        let err = Crawl {}.handle(config(), client.into()).await.unwrap_err();
        assert_eq!(err.to_string(), "Error during crawl: Network Error");
    }
}
