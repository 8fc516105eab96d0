//! Station dispatch daemon
//!
//! Serves the alert, incident and referral workflows over HTTP and streams
//! live events over WebSocket.

use anyhow::{Context, Result};
use clap::Parser;
use dispatch_shared::VersionInfo;
use dispatchd::config::{Config, StoreBackend};
use dispatchd::server::{self, AppState};
use dispatchd::{Dispatcher, MemoryStore, Notifier, SharedStore, SqliteStore};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Debug, Parser)]
#[command(name = "dispatchd", version, about = "Station dispatch daemon")]
struct Args {
    /// Config file (default: /etc/dispatch/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the listen address
    #[arg(long)]
    bind: Option<String>,

    /// Keep everything in memory; nothing survives a restart
    #[arg(long)]
    ephemeral: bool,

    /// Print the default configuration and exit
    #[arg(long)]
    print_default_config: bool,
}

fn init_logging(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    fmt().with_env_filter(filter).with_target(true).init();
}

fn open_store(config: &Config, ephemeral: bool) -> Result<SharedStore> {
    if ephemeral || config.store.backend == StoreBackend::Memory {
        warn!("Using in-memory store; data will not persist");
        return Ok(Arc::new(MemoryStore::new()));
    }
    let store = SqliteStore::open(&config.store.sqlite_path)
        .with_context(|| format!("Failed to open {}", config.store.sqlite_path.display()))?;
    Ok(Arc::new(store))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if args.print_default_config {
        print!("{}", Config::default_toml()?);
        return Ok(());
    }

    let mut config = match &args.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load(),
    };
    if let Some(bind) = args.bind {
        config.server.bind_addr = bind;
    }

    init_logging(&config.log.level);
    info!("dispatchd {} starting", VersionInfo::current());

    let store = open_store(&config, args.ephemeral)?;
    let dispatcher = Dispatcher::new(store, Notifier::new(config.notify.channel_capacity));

    // Flags are derived data; repair anything left stale by a crash
    let corrected = dispatcher.recompute_all_flags()?;
    if corrected > 0 {
        warn!("Corrected flags on {} station(s) at startup", corrected);
    }

    server::run(AppState::new(dispatcher), &config.server).await?;
    info!("dispatchd stopped");
    Ok(())
}
