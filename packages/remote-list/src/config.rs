use anyhow::{ensure, Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::fetcher::BatchPolicy;
use crate::pipeline::OverlapPolicy;
use crate::transport::{Endpoint, DEFAULT_REQUEST_TIMEOUT};

pub const DEFAULT_POKEAPI_BASE_URL: &str = "https://pokeapi.co/api/v2";
pub const DEFAULT_CHARACTERS_BASE_URL: &str = "https://rickandmortyapi.com/api";
pub const DEFAULT_CATALOG_SIZE: u32 = 151;
pub const ENV_PREFIX: &str = "REMOTE_LIST";

/// Runtime settings shared by every pipeline preset.
#[derive(Debug, Clone, Deserialize)]
pub struct BrowserConfig {
    pub pokeapi_base_url: String,
    pub characters_base_url: String,
    pub catalog_size: u32,
    pub request_timeout_secs: u64,
    pub batch_policy: BatchPolicy,
    pub overlap_policy: OverlapPolicy,
    pub user_agent: String,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            pokeapi_base_url: DEFAULT_POKEAPI_BASE_URL.to_string(),
            characters_base_url: DEFAULT_CHARACTERS_BASE_URL.to_string(),
            catalog_size: DEFAULT_CATALOG_SIZE,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT.as_secs(),
            batch_policy: BatchPolicy::FailFast,
            overlap_policy: OverlapPolicy::LatestWins,
            user_agent: default_user_agent(),
        }
    }
}

fn default_user_agent() -> String {
    format!("remote-list/{}", env!("CARGO_PKG_VERSION"))
}

impl BrowserConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn pokemon_endpoint(&self) -> Result<Endpoint> {
        Endpoint::new(&self.pokeapi_base_url, "pokemon")
    }

    pub fn character_endpoint(&self) -> Result<Endpoint> {
        Endpoint::new(&self.characters_base_url, "character")
    }

    fn validate(&self) -> Result<()> {
        ensure!(self.catalog_size > 0, "catalog_size must be at least 1");
        ensure!(
            self.request_timeout_secs > 0,
            "request_timeout_secs must be at least 1"
        );
        self.pokemon_endpoint()
            .context("Invalid pokeapi_base_url")?;
        self.character_endpoint()
            .context("Invalid characters_base_url")?;
        Ok(())
    }
}

/// Load settings: built-in defaults, then the config file (`path`, or an
/// optional `remote-list.{yml,toml,json}` in the working directory), then
/// `REMOTE_LIST_*` environment variables.
pub fn load_config(path: Option<&Path>) -> Result<BrowserConfig> {
    let defaults = BrowserConfig::default();

    let mut builder = Config::builder()
        .set_default("pokeapi_base_url", defaults.pokeapi_base_url)?
        .set_default("characters_base_url", defaults.characters_base_url)?
        .set_default("catalog_size", i64::from(defaults.catalog_size))?
        .set_default("request_timeout_secs", defaults.request_timeout_secs as i64)?
        .set_default("batch_policy", "fail_fast")?
        .set_default("overlap_policy", "latest_wins")?
        .set_default("user_agent", defaults.user_agent)?;

    builder = match path {
        Some(path) => builder.add_source(File::from(path).required(true)),
        None => builder.add_source(File::with_name("remote-list").required(false)),
    };

    let config: BrowserConfig = builder
        .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
        .build()
        .context(format!("Failed to read config (file: {:?})", path))?
        .try_deserialize()
        .context("Failed to parse config")?;

    config.validate()?;

    tracing::debug!(?config, "Configuration loaded");
    Ok(config)
}
