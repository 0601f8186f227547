//! Terminal browser for the Art Institute of Chicago artworks catalog.
//!
//! The crate splits into a page counter (`pager`), a latest-wins remote
//! fetcher (`catalog`), and the Ratatui table that presents each batch
//! (`ui`). `main.rs` only wires configuration, logging and these pieces.
pub mod catalog;
pub mod cli;
pub mod config;
pub mod logging;
pub mod models;
pub mod pager;
pub mod ui;

pub use catalog::{CatalogSource, FetchError, FetchEvent, Fetcher, HttpCatalog};
pub use config::Config;
pub use models::{Record, RecordBatch};
pub use pager::PageController;

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
