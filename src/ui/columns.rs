//! Fixed column set of the artworks table and the per-cell templates.

use ratatui::layout::Constraint;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::Cell;

use crate::models::{fields, Record};

use super::helpers::wrap_text;

/// Upper bound on lines a wrapped cell may take, so one long artist credit
/// cannot push the rest of the page off screen.
pub(crate) const MAX_ROW_LINES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Multi-select checkbox.
    Selection,
    /// Field value shown as-is.
    Raw(&'static str),
    /// IIIF image URL built from `image_id`, alt text from `title`.
    Image,
    /// `title` linking to `api_link`.
    TitleLink,
    /// `artist_display` as a wrapped paragraph.
    Artist,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    pub header: &'static str,
    pub kind: ColumnKind,
    pub width: Constraint,
}

/// Table columns, in display order.
pub const COLUMNS: [ColumnSpec; 11] = [
    ColumnSpec {
        header: "",
        kind: ColumnKind::Selection,
        width: Constraint::Length(3),
    },
    ColumnSpec {
        header: "Id",
        kind: ColumnKind::Raw(fields::ID),
        width: Constraint::Length(7),
    },
    ColumnSpec {
        header: "Model",
        kind: ColumnKind::Raw(fields::API_MODEL),
        width: Constraint::Length(9),
    },
    ColumnSpec {
        header: "Image",
        kind: ColumnKind::Image,
        width: Constraint::Fill(2),
    },
    ColumnSpec {
        header: "Title",
        kind: ColumnKind::TitleLink,
        width: Constraint::Fill(3),
    },
    ColumnSpec {
        header: "Artist",
        kind: ColumnKind::Artist,
        width: Constraint::Fill(3),
    },
    ColumnSpec {
        header: "Year",
        kind: ColumnKind::Raw(fields::DATE_DISPLAY),
        width: Constraint::Fill(1),
    },
    ColumnSpec {
        header: "Origin",
        kind: ColumnKind::Raw(fields::PLACE_OF_ORIGIN),
        width: Constraint::Fill(1),
    },
    ColumnSpec {
        header: "Type",
        kind: ColumnKind::Raw(fields::ARTWORK_TYPE_TITLE),
        width: Constraint::Fill(1),
    },
    ColumnSpec {
        header: "Medium",
        kind: ColumnKind::Raw(fields::MEDIUM_DISPLAY),
        width: Constraint::Fill(2),
    },
    ColumnSpec {
        header: "Categories",
        kind: ColumnKind::Raw(fields::CATEGORY_TITLES),
        width: Constraint::Fill(2),
    },
];

/// Full-size rendition of an artwork from the IIIF image service.
pub fn image_url(iiif_base_url: &str, image_id: &str) -> String {
    format!(
        "{}/{image_id}/full/843,/0/default.jpg",
        iiif_base_url.trim_end_matches('/')
    )
}

/// Renderer-independent content of one cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellContent {
    Checkbox(bool),
    Text(String),
    Image { url: String, alt: String },
    Link { text: String, target: Option<String> },
    Paragraph(String),
}

impl CellContent {
    pub fn build(kind: ColumnKind, record: &Record, selected: bool, iiif_base_url: &str) -> Self {
        match kind {
            ColumnKind::Selection => CellContent::Checkbox(selected),
            ColumnKind::Raw(field) => CellContent::Text(record.text(field)),
            ColumnKind::Image => CellContent::Image {
                url: image_url(iiif_base_url, &record.image_id()),
                alt: record.title(),
            },
            ColumnKind::TitleLink => CellContent::Link {
                text: record.title(),
                target: record.api_link(),
            },
            ColumnKind::Artist => CellContent::Paragraph(record.text(fields::ARTIST_DISPLAY)),
        }
    }

    /// Plain text shown in the terminal.
    pub fn display_text(&self) -> String {
        match self {
            CellContent::Checkbox(true) => "[x]".to_string(),
            CellContent::Checkbox(false) => "[ ]".to_string(),
            CellContent::Text(text) | CellContent::Paragraph(text) => text.clone(),
            CellContent::Image { url, .. } => url.clone(),
            CellContent::Link { text, .. } => text.clone(),
        }
    }

    /// Lines the cell occupies at `width`. Paragraphs wrap and images show
    /// their alt text under the URL.
    pub(crate) fn lines(&self, width: u16) -> Vec<String> {
        match self {
            CellContent::Paragraph(text) => {
                let mut lines = wrap_text(text, width as usize);
                lines.truncate(MAX_ROW_LINES);
                lines
            }
            CellContent::Image { url, alt } if !alt.trim().is_empty() => {
                vec![url.clone(), alt.replace('\n', " ")]
            }
            other => vec![other.display_text().replace('\n', " ")],
        }
    }

    pub(crate) fn to_cell(&self, width: u16) -> Cell<'static> {
        let style = match self {
            CellContent::Checkbox(true) => Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            CellContent::Image { .. } => Style::default().fg(Color::DarkGray),
            CellContent::Link { target: Some(_), .. } => Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::UNDERLINED),
            _ => Style::default(),
        };
        let lines: Vec<Line<'static>> = self
            .lines(width)
            .into_iter()
            .map(|line| Line::from(Span::styled(line, style)))
            .collect();
        Cell::from(Text::from(lines))
    }
}

/// Every cell of one record, in column order.
pub fn row_contents(record: &Record, selected: bool, iiif_base_url: &str) -> Vec<CellContent> {
    COLUMNS
        .iter()
        .map(|column| CellContent::build(column.kind, record, selected, iiif_base_url))
        .collect()
}

pub fn headers() -> impl Iterator<Item = &'static str> {
    COLUMNS.iter().map(|column| column.header)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const IIIF: &str = "https://www.artic.edu/iiif/2";

    fn sample() -> Record {
        serde_json::from_value(json!({
            "id": 27992,
            "api_model": "artworks",
            "api_link": "https://api.artic.edu/api/v1/artworks/27992",
            "title": "A Sunday on La Grande Jatte",
            "image_id": "2d484387-2509-5e8e-2c43-22f9981972eb",
            "artist_display": "Georges Seurat\nFrench, 1859-1891",
            "date_display": "1884-86",
            "place_of_origin": "France",
            "artwork_type_title": "Painting",
            "medium_display": "Oil on canvas",
            "category_titles": ["Essentials", "Painting and Sculpture of Europe"]
        }))
        .unwrap()
    }

    #[test]
    fn column_order_matches_layout() {
        let headers: Vec<_> = headers().collect();
        assert_eq!(
            headers,
            vec![
                "", "Id", "Model", "Image", "Title", "Artist", "Year", "Origin", "Type", "Medium",
                "Categories"
            ]
        );
        assert_eq!(COLUMNS[0].kind, ColumnKind::Selection);
        assert_eq!(COLUMNS[0].width, Constraint::Length(3));
        assert_eq!(COLUMNS[10].kind, ColumnKind::Raw(fields::CATEGORY_TITLES));
    }

    #[test]
    fn image_url_uses_iiif_layout() {
        assert_eq!(
            image_url(IIIF, "abc-123"),
            "https://www.artic.edu/iiif/2/abc-123/full/843,/0/default.jpg"
        );
        assert_eq!(
            image_url("https://www.artic.edu/iiif/2/", "X"),
            "https://www.artic.edu/iiif/2/X/full/843,/0/default.jpg"
        );
    }

    #[test]
    fn row_renders_every_template() {
        let cells = row_contents(&sample(), true, IIIF);
        assert_eq!(cells.len(), COLUMNS.len());
        assert_eq!(cells[0], CellContent::Checkbox(true));
        assert_eq!(cells[1], CellContent::Text("27992".into()));
        assert_eq!(cells[2], CellContent::Text("artworks".into()));
        assert_eq!(
            cells[3],
            CellContent::Image {
                url: "https://www.artic.edu/iiif/2/2d484387-2509-5e8e-2c43-22f9981972eb/full/843,/0/default.jpg"
                    .into(),
                alt: "A Sunday on La Grande Jatte".into(),
            }
        );
        assert_eq!(
            cells[4],
            CellContent::Link {
                text: "A Sunday on La Grande Jatte".into(),
                target: Some("https://api.artic.edu/api/v1/artworks/27992".into()),
            }
        );
        assert_eq!(
            cells[5],
            CellContent::Paragraph("Georges Seurat\nFrench, 1859-1891".into())
        );
        assert_eq!(
            cells[10].display_text(),
            "Essentials, Painting and Sculpture of Europe"
        );
    }

    #[test]
    fn missing_fields_render_empty_cells() {
        let record: Record = serde_json::from_value(json!({ "id": 1 })).unwrap();
        let cells = row_contents(&record, false, IIIF);
        assert_eq!(cells[0].display_text(), "[ ]");
        for index in [2, 6, 7, 8, 9, 10] {
            assert_eq!(cells[index].display_text(), "", "column {index}");
        }
        // No image id still yields a URL, which the image service answers with
        // a broken image.
        assert_eq!(
            cells[3].display_text(),
            "https://www.artic.edu/iiif/2//full/843,/0/default.jpg"
        );
        assert_eq!(
            cells[4],
            CellContent::Link {
                text: String::new(),
                target: None
            }
        );
    }

    #[test]
    fn artist_paragraph_wraps_and_caps_lines() {
        let cell = CellContent::Paragraph("one two three four five six seven".into());
        let lines = cell.lines(5);
        assert_eq!(lines.len(), MAX_ROW_LINES);
        assert_eq!(lines[0], "one");

        let raw = CellContent::Text("multi\nline".into());
        assert_eq!(raw.lines(3), vec!["multi line"]);
    }

    #[test]
    fn image_cell_shows_alt_text_below_url() {
        let cells = row_contents(&sample(), false, IIIF);
        let lines = cells[3].lines(40);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("/full/843,/0/default.jpg"));
        assert_eq!(lines[1], "A Sunday on La Grande Jatte");

        let untitled = CellContent::Image {
            url: "u".into(),
            alt: String::new(),
        };
        assert_eq!(untitled.lines(40), vec!["u"]);
    }
}
