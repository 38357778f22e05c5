use std::collections::{BTreeMap, HashMap};
use std::env;
use std::num::NonZeroU32;
use std::path::PathBuf;

use anyhow::{Context, Result};
use config::{Config as HierarchicalConfig, Environment};
use finder_catalog::DEFAULT_CATALOG_URL;
use finder_sdk::models::pagination::DEFAULT_PAGE_SIZE;
use log::debug;
use serde::Deserialize;
use url::Url;
use xdg::BaseDirectories;

/// Name of finder managed directories
const FINDER_DIR_NAME: &str = "finder";
/// Directory of an additional config file, read after all others
const FINDER_CONFIG_DIR_VAR: &str = "FINDER_CONFIG_DIR";
pub const FINDER_CONFIG_FILE: &str = "finder.toml";

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    /// Base URL of the catalog API
    pub catalog_url: Url,

    /// Number of products per page, fixed for a session
    pub page_size: NonZeroU32,

    /// Headers sent with every catalog request
    #[serde(default)]
    pub extra_headers: BTreeMap<String, String>,
}

impl Config {
    /// Creates a [Config] from the environment and config files
    ///
    /// Sources are applied in order, later ones override earlier ones:
    ///
    /// 1. built in defaults
    /// 2. `/etc/finder.toml`
    /// 3. `finder.toml` in the XDG config directories
    /// 4. `$FINDER_CONFIG_DIR/finder.toml`
    /// 5. `FINDER_*` environment variables
    pub fn parse() -> Result<Config> {
        let finder_dirs = BaseDirectories::with_prefix(FINDER_DIR_NAME);

        let mut builder = HierarchicalConfig::builder()
            .set_default("catalog_url", DEFAULT_CATALOG_URL)?
            .set_default("page_size", i64::from(DEFAULT_PAGE_SIZE.get()))?;

        // read from /etc
        builder = builder.add_source(
            config::File::from(PathBuf::from("/etc").join(FINDER_CONFIG_FILE))
                .format(config::FileFormat::Toml)
                .required(false),
        );

        // look for files in XDG_CONFIG_DIRS locations
        for file in finder_dirs.find_config_files(FINDER_CONFIG_FILE) {
            debug!("reading config file {file:?}");
            builder = builder.add_source(config::File::from(file).format(config::FileFormat::Toml));
        }

        if let Ok(config_dir) = env::var(FINDER_CONFIG_DIR_VAR) {
            debug!("`${FINDER_CONFIG_DIR_VAR}` set: {config_dir}");
            builder = builder.add_source(
                config::File::from(PathBuf::from(config_dir).join(FINDER_CONFIG_FILE))
                    .format(config::FileFormat::Toml)
                    .required(false),
            );
        }

        // override via env variables
        let finder_envs = env::vars()
            .filter_map(|(k, v)| k.strip_prefix("FINDER_").map(|k| (k.to_owned(), v)))
            .collect::<HashMap<_, _>>();
        builder = builder.add_source(
            Environment::default()
                .source(Some(finder_envs))
                .try_parsing(true),
        );

        builder
            .build()?
            .try_deserialize()
            .context("Could not parse config")
    }
}
