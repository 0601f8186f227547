//! User configuration. Everything has a sensible default so the app runs
//! without a config file; the file and command-line flags only override.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_API_BASE_URL: &str = "https://api.artic.edu/api/v1";
pub const DEFAULT_IIIF_BASE_URL: &str = "https://www.artic.edu/iiif/2";
/// Row counts the in-memory paginator offers.
pub const ROWS_PER_PAGE_OPTIONS: [usize; 3] = [5, 10, 20];
pub const DEFAULT_ROWS_PER_PAGE: usize = 20;
const DEFAULT_TIMEOUT_SECS: u64 = 15;

const APP_NAME: &str = "artworks-table";
const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("rows_per_page must be one of 5, 10 or 20 (got {0})")]
    InvalidRowsPerPage(usize),

    #[error("request_timeout_secs must be greater than zero")]
    ZeroTimeout,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Root of the catalog API; `/artworks` is appended.
    pub api_base_url: String,
    /// Root of the IIIF image service used for the image column.
    pub iiif_base_url: String,
    pub request_timeout_secs: u64,
    /// Initial size of the in-memory paginator.
    pub rows_per_page: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            iiif_base_url: DEFAULT_IIIF_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            rows_per_page: DEFAULT_ROWS_PER_PAGE,
        }
    }
}

impl Config {
    /// Platform config location, e.g. `~/.config/artworks-table/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Load from an explicit path (which must exist) or from the default
    /// location (which may be absent).
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !ROWS_PER_PAGE_OPTIONS.contains(&self.rows_per_page) {
            return Err(ConfigError::InvalidRowsPerPage(self.rows_per_page));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
