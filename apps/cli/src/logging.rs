use anyhow::{anyhow, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// stderr logging so stdout only carries rendered output. `RUST_LOG` wins
/// over the defaults.
pub fn init_tracing(verbose: bool) -> Result<()> {
    let default_filter = if verbose {
        "remote_list=debug,rlist=debug"
    } else {
        "remote_list=warn,rlist=info"
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init()
        .map_err(|e| anyhow!("Failed to initialize logging: {}", e))
}
