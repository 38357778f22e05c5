use anyhow::{Context, Result, bail};
use bpaf::Bpaf;
use crossterm::tty::IsTty;
use finder_catalog::{Client, ClientTrait, ProductError, ProductId};
use tracing::instrument;

use crate::utils::display::DisplayProductDetail;

// Show all details of a product
#[derive(Debug, Bpaf, Clone)]
pub struct Show {
    /// Display the product as JSON
    #[bpaf(long)]
    pub json: bool,

    /// The id of the product, as listed by 'finder search'
    #[bpaf(positional("ID"))]
    pub id: String,
}

impl Show {
    #[instrument(name = "show", fields(id = self.id), skip_all)]
    pub async fn handle(self, client: Client) -> Result<()> {
        let id = ProductId::from(self.id.as_str());

        let product = match client.product(&id).await {
            Ok(product) => product,
            Err(ProductError::NotFound(id)) => bail!("no product with id '{id}'"),
            Err(e) => Err(e).context("Could not fetch product")?,
        };

        if self.json {
            println!("{}", serde_json::to_string_pretty(&product)?);
        } else {
            println!("{}", DisplayProductDetail {
                product: &product,
                styled: std::io::stdout().is_tty(),
            });
        }
        Ok(())
    }
}
