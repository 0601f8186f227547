//! Binary entry point: load configuration, start file logging, mount the
//! artworks view on page 1, and drive the Ratatui event loop until exit.
use std::sync::Arc;

use anyhow::Context;
use artworks_table::cli::Cli;
use artworks_table::{logging, run_app, App, Config, Fetcher, HttpCatalog};
use clap::Parser;
use tracing::info;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.apply(Config::load(cli.config.as_deref()).context("failed to load config")?);
    config.validate().context("invalid configuration")?;

    let _log_guard = logging::init(&cli.log_level)?;
    info!(
        api = %config.api_base_url,
        rows_per_page = config.rows_per_page,
        "starting artworks table"
    );

    let catalog = HttpCatalog::new(&config.api_base_url, config.request_timeout())?;
    let mut app = App::new(Fetcher::new(Arc::new(catalog)), &config);
    let result = run_app(&mut app);

    info!("artworks table exited");
    result
}
