use std::path::PathBuf;

use clap::Parser;
use groupify_core::{Config, Groupify};
use tracing_subscriber::{
    EnvFilter, layer::SubscriberExt as _, reload, util::SubscriberInitExt as _,
};

/// Pools the music taste of a group into one shared playlist.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Path to the configuration file. Created with defaults if missing.
    #[arg(short, long, default_value = Config::FILENAME)]
    config: PathBuf,

    /// Log per-member and per-selector details, regardless of the config.
    #[arg(short, long)]
    verbose: bool,
}

fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "groupify=debug"
    } else {
        "groupify=info"
    }
}

/// `RUST_LOG` wins over the verbosity flags.
fn env_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Installed before the config is read so its logs are kept; `verbose`
    // from the file is applied once it is known.
    let (filter, filter_handle) = reload::Layer::new(env_filter(args.verbose));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load(&args.config)?;
    if config.verbose && !args.verbose {
        filter_handle.reload(env_filter(true))?;
    }

    if !args.config.exists() {
        config.save(&args.config)?;
        tracing::info!(
            "Wrote a default config to {}; fill in the host and guest credentials",
            args.config.display()
        );
    }
    config.validate()?;

    let groupify = Groupify::new(config);
    let reaper = groupify.spawn_reaper();
    tracing::info!(
        "Groupify ready; redirect URI is {}",
        groupify.config().host.redirect_uri
    );

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down with {} active parties", groupify.manager().len());
    reaper.abort();
    Ok(())
}
