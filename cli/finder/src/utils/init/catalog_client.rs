use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use finder_catalog::{
    CatalogClient,
    CatalogClientConfig,
    Client,
    FINDER_CATALOG_MOCK_DATA_VAR,
    MockClient,
};
use tracing::debug;

use crate::config::Config;

/// Initialize the catalog client
///
/// - Initialize a mock client if `$FINDER_CATALOG_MOCK` points to a file of mock responses
/// - Initialize a real client otherwise
pub fn init_catalog_client(config: &Config) -> Result<Client> {
    if let Ok(path_str) = std::env::var(FINDER_CATALOG_MOCK_DATA_VAR) {
        let path = PathBuf::from(path_str);
        if !path.exists() {
            bail!("path to mock data file doesn't exist: {}", path.display());
        }

        debug!(mock_data_path = %path.display(), "using mock catalog client");
        return Ok(MockClient::new(Some(path))?.into());
    }

    debug!(catalog_url = %config.catalog_url, "using catalog client");
    let client = CatalogClient::new(CatalogClientConfig {
        catalog_url: config.catalog_url.clone(),
        extra_headers: config.extra_headers.clone(),
        user_agent: None,
    })
    .context("Could not create catalog client")?;
    Ok(client.into())
}
