use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{
    load_settings, CharacterListController, CharacterStore, HttpCharacterApi, TextListView,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod cli;

use cli::{execute, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut settings = load_settings(&cli.config)?;
    if let Some(base_url) = cli.base_url {
        settings.base_url = base_url;
    }

    let filter =
        EnvFilter::try_new(&settings.log_filter).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let api = HttpCharacterApi::new(&settings.base_url)
        .with_context(|| format!("invalid base url '{}'", settings.base_url))?;
    let store = Arc::new(CharacterStore::new());
    let controller = CharacterListController::new(Arc::new(api), store);

    let outcome = execute(&controller, cli.command).await;

    controller.render(&TextListView);
    let aborted = controller.teardown();
    debug!(aborted, "shutdown complete");
    outcome
}
