//! Domain models for the artwork catalog. A record is kept as the raw JSON
//! object the API hands back: the table only reads a handful of fields and
//! every one of them may be missing, so there is no point forcing the payload
//! through a rigid struct.

use std::fmt;

use serde::Deserialize;
use serde_json::{Map, Value};

/// Field names consumed by the table.
pub mod fields {
    pub const ID: &str = "id";
    pub const API_MODEL: &str = "api_model";
    pub const API_LINK: &str = "api_link";
    pub const TITLE: &str = "title";
    pub const IMAGE_ID: &str = "image_id";
    pub const ARTIST_DISPLAY: &str = "artist_display";
    pub const DATE_DISPLAY: &str = "date_display";
    pub const PLACE_OF_ORIGIN: &str = "place_of_origin";
    pub const ARTWORK_TYPE_TITLE: &str = "artwork_type_title";
    pub const MEDIUM_DISPLAY: &str = "medium_display";
    pub const CATEGORY_TITLES: &str = "category_titles";
}

/// One artwork entry exactly as the remote catalog returned it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    /// Raw access to a field. `null` is reported as absent.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.0.get(name).filter(|value| !value.is_null())
    }

    /// Render a field as cell text. Missing fields become an empty string and
    /// arrays are joined with `", "`.
    pub fn text(&self, name: &str) -> String {
        self.field(name).map(coerce_value).unwrap_or_default()
    }

    pub fn title(&self) -> String {
        self.text(fields::TITLE)
    }

    pub fn image_id(&self) -> String {
        self.text(fields::IMAGE_ID)
    }

    /// Link target for the title column, `None` when the record has none.
    pub fn api_link(&self) -> Option<String> {
        let link = self.text(fields::API_LINK);
        let trimmed = link.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}

impl fmt::Display for Record {
    /// Show the `id` and title, enough to identify a row in status messages.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let title = self.title();
        if title.is_empty() {
            write!(f, "#{}", self.text(fields::ID))
        } else {
            write!(f, "#{} {}", self.text(fields::ID), title)
        }
    }
}

/// Convert a JSON value into display text.
fn coerce_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number.to_string(),
        Value::Array(items) => items
            .iter()
            .filter(|item| !item.is_null())
            .map(coerce_value)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(_) => value.to_string(),
    }
}

/// Pagination block the catalog attaches to every listing response. Only used
/// for informational display; it never caps the page controller.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CatalogPagination {
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub limit: Option<u64>,
    #[serde(default)]
    pub total_pages: Option<u64>,
    #[serde(default)]
    pub current_page: Option<u64>,
}

/// Envelope of `GET /artworks`. `data` is mandatory; everything else is
/// optional context.
#[derive(Debug, Clone, Deserialize)]
pub struct ArtworksResponse {
    pub data: Vec<Record>,
    #[serde(default)]
    pub pagination: Option<CatalogPagination>,
}

/// A successfully fetched remote page.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordBatch {
    pub page: u32,
    pub records: Vec<Record>,
    pub pagination: Option<CatalogPagination>,
}
