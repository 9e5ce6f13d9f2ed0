pub mod client;
mod config;
mod controller;
pub mod dom;
pub mod error;
mod notify;
mod terminal;
pub mod types;

#[cfg(test)]
mod tests;

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::config::preferences::{FileStore, KeyValueStore};
use crate::controller::CortexApp;
use crate::dom::Document;
use crate::error::startup::StartupError;

#[derive(Parser, Debug)]
#[command(name = "cortex-client")]
#[command(about = "Terminal client for the Cortex chat server", long_about = None)]
struct Args {
    /// Server base url, e.g. http://127.0.0.1:5000
    #[arg(short, long)]
    base_url: Option<String>,

    /// Config file to use instead of the platform default
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the rendered page to this HTML file after every update
    #[arg(short, long)]
    snapshot: Option<PathBuf>,

    /// Model used when no preference has been saved
    #[arg(short, long)]
    model: Option<String>,

    /// Preference storage file
    #[arg(long)]
    storage: Option<PathBuf>,

    /// Do not open the push channel
    #[arg(long)]
    no_push: bool,
}

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = AppConfig::load(args.config.as_deref());
    if let Some(url) = args.base_url {
        config.server.base_url = url;
    }
    if let Some(model) = args.model {
        config.ui.default_model = model;
    }
    if args.no_push {
        config.server.push_enabled = false;
    }

    let store: Box<dyn KeyValueStore> = match args.storage {
        Some(path) => Box::new(FileStore::new(path)),
        None => Box::new(FileStore::in_data_dir()?),
    };

    let snapshot = args
        .snapshot
        .or_else(|| config.ui.snapshot_path.as_ref().map(PathBuf::from));

    tracing::info!(base_url = %config.server.base_url, "starting cortex client");
    let app = CortexApp::new(&config, Document::full_page(), store)?;
    terminal::run(app, snapshot).await;
    Ok(())
}
