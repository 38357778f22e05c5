mod browse;
mod crawl;
mod search;
mod show;

use std::fmt;

use anyhow::Result;
use bpaf::Bpaf;
use finder_sdk::models::filter::FilterCriteria;
use indoc::indoc;

use crate::config::Config;
use crate::utils::init::init_catalog_client;

static FINDER_DESCRIPTION: &'_ str = indoc! {"
    Search and browse a product catalog from the command line."
};

fn vec_len<T>(x: Vec<T>) -> usize {
    Vec::len(&x)
}

#[derive(Bpaf, Clone, Copy, Debug)]
pub enum Verbosity {
    Verbose(
        /// Increase logging verbosity
        ///
        /// Invoke multiple times for increasing detail.
        #[bpaf(short('v'), long("verbose"), req_flag(()), many, map(vec_len))]
        usize,
    ),

    /// Silence logs except for errors
    #[bpaf(short, long)]
    Quiet,
}

impl Default for Verbosity {
    fn default() -> Self {
        Verbosity::Verbose(0)
    }
}

#[derive(Bpaf)]
#[bpaf(options, version, descr(FINDER_DESCRIPTION))]
pub struct FinderCli(#[bpaf(external(finder_args))] pub FinderArgs);

/// Main finder args parser
///
/// To parse the finder CLI, use [`FinderCli`] instead using [`finder_cli()`].
#[derive(Debug, Bpaf)]
#[bpaf(ignore_rustdoc)] // we don't want this struct to be interpreted as a group
pub struct FinderArgs {
    /// Verbose mode
    ///
    /// Invoke multiple times for increasing detail.
    #[bpaf(external, fallback(Default::default()))]
    pub verbosity: Verbosity,

    #[bpaf(external(commands))]
    command: Commands,
}

impl FinderArgs {
    pub async fn handle(self, config: Config) -> Result<()> {
        let client = init_catalog_client(&config)?;

        match self.command {
            Commands::Search(args) => args.handle(config, client).await,
            Commands::Show(args) => args.handle(client).await,
            Commands::Crawl(args) => args.handle(config, client).await,
            Commands::Browse(args) => args.handle(config, client).await,
        }
    }
}

#[derive(Bpaf, Clone)]
enum Commands {
    /// Search the catalog for products
    #[bpaf(command)]
    Search(#[bpaf(external(search::search))] search::Search),

    /// Show all details of a product
    #[bpaf(command)]
    Show(#[bpaf(external(show::show))] show::Show),

    /// Ask the catalog to refresh its product data
    #[bpaf(command)]
    Crawl(#[bpaf(external(crawl::crawl))] crawl::Crawl),

    /// Page through search results interactively
    #[bpaf(command)]
    Browse(#[bpaf(external(browse::browse))] browse::Browse),
}

impl fmt::Debug for Commands {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Command")
    }
}

/// Filters shared by all commands listing products
#[derive(Debug, Bpaf, Clone, Default)]
pub struct FilterArgs {
    /// Only show products costing at least this much
    #[bpaf(long, argument("PRICE"))]
    pub min_price: Option<f64>,

    /// Only show products costing at most this much
    #[bpaf(long, argument("PRICE"))]
    pub max_price: Option<f64>,

    /// Only show products of this category
    #[bpaf(long, argument("CATEGORY"))]
    pub category: Option<String>,

    /// Only show products with this availability, e.g. 'In Stock'
    #[bpaf(long, argument("AVAILABILITY"))]
    pub availability: Option<String>,

    /// Text to search for
    #[bpaf(positional("TERM"))]
    pub query: Option<String>,
}

impl From<FilterArgs> for FilterCriteria {
    fn from(args: FilterArgs) -> Self {
        FilterCriteria {
            query: args.query,
            min_price: args.min_price,
            max_price: args.max_price,
            category: args.category,
            availability: args.availability,
        }
    }
}
