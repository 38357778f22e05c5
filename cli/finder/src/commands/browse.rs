use std::fmt::Display;

use anyhow::{Result, bail};
use bpaf::Bpaf;
use finder_catalog::Client;
use finder_sdk::models::filter::FilterCriteria;
use finder_sdk::models::pagination::PageControls;
use finder_sdk::models::session::{QueryError, QuerySession};
use finder_sdk::providers::crawl::{CrawlStatus, CrawlTrigger};
use finder_sdk::providers::query::QueryController;
use inquire::InquireError;
use inquire::error::InquireResult;
use tracing::{debug, instrument};

use super::crawl::run_crawl;
use super::search::print_page;
use super::{FilterArgs, filter_args};
use crate::config::Config;
use crate::utils::dialog::{Dialog, PageNumber, Select, Text};
use crate::utils::message;

// Page through search results interactively
#[derive(Debug, Bpaf, Clone)]
pub struct Browse {
    #[bpaf(external(filter_args))]
    pub filter: FilterArgs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BrowseAction {
    NextPage,
    PreviousPage,
    GoToPage,
    ChangeFilters,
    ResetFilters,
    Crawl,
    Quit,
}

impl Display for BrowseAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            BrowseAction::NextPage => "Next page",
            BrowseAction::PreviousPage => "Previous page",
            BrowseAction::GoToPage => "Go to page...",
            BrowseAction::ChangeFilters => "Change filters...",
            BrowseAction::ResetFilters => "Reset filters",
            BrowseAction::Crawl => "Refresh catalog (crawl)",
            BrowseAction::Quit => "Quit",
        };
        write!(f, "{label}")
    }
}

/// The actions offered for the current page.
fn available_actions(controls: &PageControls) -> Vec<BrowseAction> {
    let mut actions = Vec::new();
    if controls.has_next {
        actions.push(BrowseAction::NextPage);
    }
    if controls.has_previous {
        actions.push(BrowseAction::PreviousPage);
    }
    if controls.visible {
        actions.push(BrowseAction::GoToPage);
    }
    actions.extend([
        BrowseAction::ChangeFilters,
        BrowseAction::ResetFilters,
        BrowseAction::Crawl,
        BrowseAction::Quit,
    ]);
    actions
}

/// Parse a price typed by the user, warning about and dropping invalid input.
fn parse_price(input: Option<String>) -> Option<f64> {
    let input = input?;
    match input.parse::<f64>() {
        Ok(price) if price.is_finite() && price >= 0.0 => Some(price),
        _ => {
            message::warning(format!("Ignoring invalid price '{input}'"));
            None
        },
    }
}

/// Treat a cancelled or interrupted prompt as no answer.
fn unless_cancelled<T>(result: InquireResult<T>) -> InquireResult<Option<T>> {
    match result {
        Ok(answer) => Ok(Some(answer)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Report a failed query, the session already shows an empty result.
fn report<T>(result: Result<T, QueryError>) {
    if let Err(e) = result {
        message::error(format!("Could not load products: {e}"));
    }
}

impl Browse {
    #[instrument(name = "browse", skip_all)]
    pub async fn handle(self, config: Config, client: Client) -> Result<()> {
        if !Dialog::can_prompt() {
            bail!("'finder browse' needs an interactive terminal, use 'finder search' instead");
        }

        let controller = QueryController::new(client);
        let mut session = QuerySession::new(config.page_size);
        let mut trigger = CrawlTrigger::default();
        session.set_filter(self.filter.into());

        report(controller.execute_query(&mut session).await);

        loop {
            print_page(&session);

            let controls = session.controls();
            let action = Dialog {
                message: "What next?",
                help_message: None,
                typed: Select {
                    options: available_actions(&controls),
                },
            }
            .prompt()
            .await;

            let Some(action) = unless_cancelled(action)? else {
                break;
            };
            debug!(%action, "browse action");

            match action {
                BrowseAction::NextPage => report(controller.next_page(&mut session).await),
                BrowseAction::PreviousPage => {
                    report(controller.previous_page(&mut session).await)
                },
                BrowseAction::GoToPage => {
                    let max = u32::try_from(controls.total_pages).unwrap_or(u32::MAX);
                    let page = Dialog {
                        message: "Go to page:",
                        help_message: Some(&format!("1 - {max}")),
                        typed: PageNumber { max },
                    }
                    .prompt()
                    .await;
                    let Some(page) = unless_cancelled(page)? else {
                        continue;
                    };
                    report(controller.navigate(&mut session, page).await);
                },
                BrowseAction::ChangeFilters => {
                    let Some(filter) = prompt_filters(session.filter()).await? else {
                        continue;
                    };
                    session.set_filter(filter);
                    report(controller.search(&mut session).await);
                },
                BrowseAction::ResetFilters => {
                    report(controller.reset_filters(&mut session).await)
                },
                BrowseAction::Crawl => {
                    message::plain(CrawlStatus::InProgress);
                    if let Err(e) = run_crawl(&mut trigger, &controller, &mut session).await {
                        message::error(format!("{e:#}"));
                    }
                },
                BrowseAction::Quit => break,
            }
        }

        Ok(())
    }
}

/// Ask for new filter criteria, `None` if the user cancelled.
async fn prompt_filters(current: &FilterCriteria) -> Result<Option<FilterCriteria>> {
    let text = |default: &Option<String>| Text {
        default: default.clone(),
    };
    let price = |default: Option<f64>| Text {
        default: default.map(|p| p.to_string()),
    };

    let Some(query) = unless_cancelled(
        Dialog {
            message: "Search for:",
            help_message: Some("Leave empty to match all products"),
            typed: text(&current.query),
        }
        .prompt()
        .await,
    )?
    else {
        return Ok(None);
    };
    let Some(category) = unless_cancelled(
        Dialog {
            message: "Category:",
            help_message: None,
            typed: text(&current.category),
        }
        .prompt()
        .await,
    )?
    else {
        return Ok(None);
    };
    let Some(availability) = unless_cancelled(
        Dialog {
            message: "Availability:",
            help_message: Some("e.g. In Stock"),
            typed: text(&current.availability),
        }
        .prompt()
        .await,
    )?
    else {
        return Ok(None);
    };
    let Some(min_price) = unless_cancelled(
        Dialog {
            message: "Minimum price:",
            help_message: None,
            typed: price(current.min_price),
        }
        .prompt()
        .await,
    )?
    else {
        return Ok(None);
    };
    let Some(max_price) = unless_cancelled(
        Dialog {
            message: "Maximum price:",
            help_message: None,
            typed: price(current.max_price),
        }
        .prompt()
        .await,
    )?
    else {
        return Ok(None);
    };

    Ok(Some(FilterCriteria {
        query,
        min_price: parse_price(min_price),
        max_price: parse_price(max_price),
        category,
        availability,
    }))
}
