mod logging;
mod render;
mod repl;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use remote_list::{
    load_config, presets, BatchPolicy, BrowserConfig, CatalogPipeline, CharacterStatus,
    CycleOutcome, FilterCriteria, Pokemon, RecordId,
};
use render::TerminalRenderer;
use std::io::Stdout;
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(name = "rlist")]
#[command(about = "Browse remote JSON listings from the terminal", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,

    /// Config file (yaml, toml or json). Defaults to ./remote-list.* if present
    #[arg(short, long, global = true, env = "REMOTE_LIST_CONFIG")]
    config: Option<PathBuf>,

    /// Disable coloured output
    #[arg(long = "no-color", global = true, default_value_t = false)]
    no_color: bool,

    /// Debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Preset {
    /// The configured Pokédex range with full details
    Pokedex,
    /// The first ten Pokémon
    Sampler,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch a fixed range of Pokémon and filter it locally
    Catalog {
        #[arg(value_enum, default_value_t = Preset::Pokedex)]
        preset: Preset,

        /// Override catalog_size (pokedex only)
        #[arg(short = 'n', long)]
        count: Option<u32>,

        /// Live filter applied to the loaded list
        #[arg(short, long)]
        query: Option<String>,

        /// Show the detail view for this id after loading
        #[arg(short, long)]
        select: Option<String>,

        /// Keep the records that arrived even if some requests failed
        #[arg(long, default_value_t = false)]
        best_effort: bool,

        /// Keep reading filter input from stdin
        #[arg(short, long, default_value_t = false)]
        interactive: bool,
    },

    /// Page through characters with server-side filters
    Characters {
        #[arg(short, long, default_value_t = 1)]
        page: u32,

        #[arg(long)]
        name: Option<String>,

        /// alive, dead or unknown
        #[arg(long)]
        status: Option<CharacterStatus>,

        #[arg(long)]
        species: Option<String>,

        /// Show the detail view for this id after loading
        #[arg(short, long)]
        select: Option<String>,

        /// Keep reading commands from stdin
        #[arg(short, long, default_value_t = false)]
        interactive: bool,
    },
}

type Terminal = TerminalRenderer<Stdout>;

fn check(outcome: CycleOutcome) -> Result<()> {
    match outcome {
        CycleOutcome::Failed(e) => Err(e).context("Failed to load listing"),
        other => {
            debug!(?other, "Cycle finished");
            Ok(())
        }
    }
}

async fn run_catalog(
    pipeline: CatalogPipeline<Pokemon, Terminal>,
    query: Option<String>,
    select: Option<String>,
    interactive: bool,
) -> Result<()> {
    if let Some(query) = &query {
        pipeline.set_query(query);
    }

    let outcome = pipeline.load().await;
    if !interactive {
        check(outcome)?;
    }

    if let Some(id) = select {
        let id = RecordId::from(id.as_str());
        if !pipeline.select(&id) {
            bail!("No visible record with id {}", id);
        }
    }

    if interactive {
        repl::run_catalog(&pipeline).await?;
    }
    Ok(())
}

async fn run(args: Args, mut config: BrowserConfig) -> Result<()> {
    let renderer = TerminalRenderer::stdout(!args.no_color);
    let transport = presets::http_transport(&config)?;

    match args.command {
        Commands::Catalog {
            preset,
            count,
            query,
            select,
            best_effort,
            interactive,
        } => {
            if let Some(count) = count {
                config.catalog_size = count;
            }
            if best_effort {
                config.batch_policy = BatchPolicy::BestEffort;
            }

            let pipeline = match preset {
                Preset::Pokedex => presets::pokedex(&config, transport, renderer)?,
                Preset::Sampler => presets::sampler(&config, transport, renderer)?,
            };
            info!(
                preset = ?preset,
                count = pipeline.fetcher().count(),
                policy = ?pipeline.fetcher().policy(),
                "Loading catalog"
            );
            run_catalog(pipeline, query, select, interactive).await
        }
        Commands::Characters {
            page,
            name,
            status,
            species,
            select,
            interactive,
        } => {
            let pipeline = presets::characters(&config, transport, renderer)?;

            let mut criteria = FilterCriteria::new();
            if let Some(name) = name {
                criteria = criteria.with_name(name);
            }
            if let Some(status) = status {
                criteria = criteria.with_status(status);
            }
            if let Some(species) = species {
                criteria = criteria.with_species(species);
            }
            pipeline.set_criteria(criteria);

            let outcome = pipeline.fetch_page(page.max(1)).await;
            if !interactive {
                check(outcome)?;
            }

            if let Some(id) = select {
                let id = RecordId::from(id.as_str());
                if !pipeline.select(&id) {
                    bail!("No character with id {} on page {}", id, pipeline.page_state().current());
                }
            }

            if interactive {
                repl::run_paged(&pipeline).await?;
            }
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();
    logging::init_tracing(args.verbose)?;

    let config = load_config(args.config.as_deref()).context("Failed to load configuration")?;

    run(args, config).await
}
