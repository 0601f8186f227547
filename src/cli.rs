use std::path::PathBuf;

use clap::Parser;

use crate::config::Config;

/// Browse the Art Institute of Chicago artworks catalog in the terminal.
#[derive(Debug, Parser)]
#[command(name = "artworks-table", version, about)]
pub struct Cli {
    /// Read settings from this TOML file instead of the default location.
    #[arg(short, long, env = "ARTWORKS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the catalog API root (for example a local mirror).
    #[arg(long, value_name = "URL")]
    pub api_base: Option<String>,

    /// Log filter used when ARTWORKS_LOG is not set.
    #[arg(long, default_value = "info", value_name = "FILTER")]
    pub log_level: String,
}

impl Cli {
    /// Apply command-line overrides on top of the loaded config.
    pub fn apply(&self, mut config: Config) -> Config {
        if let Some(base) = &self.api_base {
            config.api_base_url = base.clone();
        }
        config
    }
}
