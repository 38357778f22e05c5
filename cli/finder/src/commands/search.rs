use std::num::NonZeroU32;

use anyhow::{Context, Result};
use bpaf::Bpaf;
use crossterm::tty::IsTty;
use finder_catalog::{Client, ProductSummary};
use finder_sdk::models::session::QuerySession;
use finder_sdk::providers::query::QueryController;
use serde::Serialize;
use tracing::{debug, instrument};

use super::{FilterArgs, filter_args};
use crate::config::Config;
use crate::utils::display::{DisplayPageSummary, DisplayProducts};
use crate::utils::message;

// Search the catalog for products
#[derive(Debug, Bpaf, Clone)]
pub struct Search {
    /// Display the page of results as JSON
    #[bpaf(long)]
    pub json: bool,

    /// The page of results to show
    #[bpaf(long, argument("PAGE"), fallback(NonZeroU32::MIN))]
    pub page: NonZeroU32,

    #[bpaf(external(filter_args))]
    pub filter: FilterArgs,
}

impl Search {
    #[instrument(name = "search", fields(json = self.json, page = self.page.get()), skip_all)]
    pub async fn handle(self, config: Config, client: Client) -> Result<()> {
        let controller = QueryController::new(client);
        let mut session = QuerySession::new(config.page_size);
        session.set_filter(self.filter.into());
        session.set_page(self.page);

        debug!(filter = ?session.filter(), "performing search");
        controller
            .execute_query(&mut session)
            .await
            .context("Could not search the catalog")?;

        if self.json {
            debug!("printing search results as JSON");
            println!("{}", serde_json::to_string_pretty(&JsonPage::from(&session))?);
            return Ok(());
        }

        print_page(&session);
        if session.controls().has_next {
            message::plain(format!(
                "Use '--page {}' to see the next page",
                session.current_page().saturating_add(1)
            ));
        }
        Ok(())
    }
}

/// Print the session's current result to stdout, followed by the page summary.
pub(crate) fn print_page(session: &QuerySession) {
    let result = session.result();
    if result.items.is_empty() {
        message::plain("No products found.");
        return;
    }

    println!("{}", DisplayProducts {
        products: &result.items,
        styled: std::io::stdout().is_tty(),
    });

    let controls = session.controls();
    if controls.visible {
        message::plain(DisplayPageSummary {
            controls,
            total_count: result.total_count,
            is_authoritative: session.pagination().is_authoritative,
        });
    }
}

/// One page of results as printed by `search --json`
#[derive(Debug, Serialize)]
struct JsonPage<'a> {
    items: &'a [ProductSummary],
    total_count: u64,
    is_authoritative: bool,
    current_page: u32,
    total_pages: u64,
    page_size: u32,
}

impl<'a> From<&'a QuerySession> for JsonPage<'a> {
    fn from(session: &'a QuerySession) -> Self {
        let controls = session.controls();
        JsonPage {
            items: &session.result().items,
            total_count: session.result().total_count,
            is_authoritative: session.pagination().is_authoritative,
            current_page: controls.current_page.get(),
            total_pages: controls.total_pages,
            page_size: session.page_size().get(),
        }
    }
}
