//! The three observed pipelines, wired from a [`BrowserConfig`].

use anyhow::Result;
use std::sync::Arc;

use crate::config::BrowserConfig;
use crate::fetcher::{BatchFetcher, PageFetcher};
use crate::pipeline::{CatalogPipeline, PagedPipeline, PipelineOptions};
use crate::renderer::Renderer;
use crate::transport::{HttpTransport, Transport};
use crate::types::{summary_detail, Character, Pokemon};

pub const SAMPLER_SIZE: u32 = 10;

pub const POKEDEX_FAILURE: &str = "Error loading Pokémon";
pub const SAMPLER_FAILURE: &str = "Error loading data";
pub const CHARACTERS_NOT_FOUND: &str = "No characters found";

/// reqwest transport honouring the configured timeout and user agent.
pub fn http_transport(config: &BrowserConfig) -> Result<Arc<dyn Transport>> {
    Ok(Arc::new(HttpTransport::new(
        config.request_timeout(),
        &config.user_agent,
    )?))
}

/// `catalog_size` Pokémon (151 by default) with the full detail panel.
pub fn pokedex<R: Renderer>(
    config: &BrowserConfig,
    transport: Arc<dyn Transport>,
    renderer: R,
) -> Result<CatalogPipeline<Pokemon, R>> {
    let fetcher = BatchFetcher::new(
        config.pokemon_endpoint()?,
        config.catalog_size,
        config.batch_policy,
    )?;

    let options = PipelineOptions::default()
        .with_overlap(config.overlap_policy)
        .with_failure_message(POKEDEX_FAILURE);

    Ok(CatalogPipeline::new(fetcher, transport, renderer, options))
}

/// The first ten Pokémon with a name/image/id detail panel.
pub fn sampler<R: Renderer>(
    config: &BrowserConfig,
    transport: Arc<dyn Transport>,
    renderer: R,
) -> Result<CatalogPipeline<Pokemon, R>> {
    let fetcher = BatchFetcher::new(config.pokemon_endpoint()?, SAMPLER_SIZE, config.batch_policy)?;

    let options = PipelineOptions::default()
        .with_overlap(config.overlap_policy)
        .with_failure_message(SAMPLER_FAILURE);

    Ok(CatalogPipeline::new(fetcher, transport, renderer, options).with_detail(summary_detail))
}

/// Paginated, filterable character listing.
pub fn characters<R: Renderer>(
    config: &BrowserConfig,
    transport: Arc<dyn Transport>,
    renderer: R,
) -> Result<PagedPipeline<Character, R>> {
    let fetcher = PageFetcher::new(config.character_endpoint()?);

    let options = PipelineOptions::default()
        .with_overlap(config.overlap_policy)
        .with_failure_message(CHARACTERS_NOT_FOUND);

    Ok(PagedPipeline::new(fetcher, transport, renderer, options))
}
