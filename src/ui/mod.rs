//! Ratatui front-end: the artworks table, its paginators, and the terminal
//! loop that drives it.

mod app;
mod columns;
mod forms;
mod grid;
mod helpers;
mod terminal;

pub use app::{App, LinkOpener};
pub use columns::{headers, image_url, row_contents, CellContent, ColumnKind, ColumnSpec, COLUMNS};
pub use grid::GridState;
pub use terminal::run_app;
