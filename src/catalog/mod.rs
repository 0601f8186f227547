//! Remote catalog access: the HTTP client, its error type, and the
//! latest-wins fetcher that feeds the table.

mod client;
mod error;
mod fetcher;

pub use client::{page_url, parse_page, CatalogSource, HttpCatalog};
pub use error::FetchError;
pub use fetcher::{FetchEvent, Fetcher};
