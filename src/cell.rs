use serde::{Deserialize, Serialize};

/// Background color as the spreadsheet API reports it: float channels in `0.0..=1.0`.
/// Channels that are zero are omitted by the API, so every field defaults to 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    #[serde(default)]
    pub red: f32,
    #[serde(default)]
    pub green: f32,
    #[serde(default)]
    pub blue: f32,
}

impl Rgb {
    pub const fn new(red: f32, green: f32, blue: f32) -> Self {
        Rgb { red, green, blue }
    }

    /// Build from a `#rrggbb` hex string.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .ok()
                .map(|v| v as f32 / 255.0)
        };
        Some(Rgb::new(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Largest per-channel difference.
    pub fn distance(&self, other: &Rgb) -> f32 {
        (self.red - other.red)
            .abs()
            .max((self.green - other.green).abs())
            .max((self.blue - other.blue).abs())
    }

    pub fn approx_eq(&self, other: &Rgb, tolerance: f32) -> bool {
        self.distance(other) <= tolerance
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

impl Align {
    /// Parse the API's `horizontalAlignment` value. Unknown values map to `None`.
    pub fn from_api(value: &str) -> Option<Self> {
        match value {
            "LEFT" => Some(Align::Left),
            "CENTER" => Some(Align::Center),
            "RIGHT" => Some(Align::Right),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CellStyle {
    pub bg_color: Option<Rgb>,
    pub bold: bool,
    pub font_size: f32,
    pub font_family: Option<String>,
    pub align: Align,
}

impl CellStyle {
    pub const PLAIN: CellStyle = CellStyle {
        bg_color: None,
        bold: false,
        font_size: 10.0,
        font_family: None,
        align: Align::Left,
    };
}

impl Default for CellStyle {
    fn default() -> Self {
        CellStyle::PLAIN
    }
}

/// One spreadsheet cell, reduced to the signals that carry structure.
///
/// `hyperlink` is the cell-level link field (serialized as `link`), `rich_link`
/// the first link found inside the cell's rich-text runs. Both are kept so the
/// resource extractor can apply its resolution order and report which source
/// was malformed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Cell {
    pub text: Option<String>,
    #[serde(rename = "link")]
    pub hyperlink: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rich_link: Option<String>,
    pub style: CellStyle,
}

static BLANK_CELL: Cell = Cell::BLANK;

impl Cell {
    pub const BLANK: Cell = Cell {
        text: None,
        hyperlink: None,
        rich_link: None,
        style: CellStyle::PLAIN,
    };

    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    /// True when the cell carries visible text (whitespace does not count).
    pub fn has_text(&self) -> bool {
        !self.text().trim().is_empty()
    }

    /// Canonical link target: the cell-level hyperlink wins over a run link.
    /// A blank link field counts as absent.
    pub fn link(&self) -> Option<&str> {
        non_blank(&self.hyperlink).or_else(|| non_blank(&self.rich_link))
    }

    pub fn bg_color(&self) -> Option<&Rgb> {
        self.style.bg_color.as_ref()
    }
}

fn non_blank(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|v| !v.trim().is_empty())
}

/// An ordered row of cells. Reads past the end yield a blank cell, so a short
/// row behaves as if padded to any width.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    cells: Vec<Cell>,
}

impl Row {
    pub fn new(cells: Vec<Cell>) -> Self {
        Row { cells }
    }

    pub fn cell(&self, col: usize) -> &Cell {
        self.cells.get(col).unwrap_or(&BLANK_CELL)
    }

    /// Cells actually present in the source row (no padding).
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn width(&self) -> usize {
        self.cells.len()
    }

    /// A row with no text anywhere exists only as visual spacing.
    pub fn is_blank(&self) -> bool {
        !self.cells.iter().any(Cell::has_text)
    }
}

impl FromIterator<Cell> for Row {
    fn from_iter<I: IntoIterator<Item = Cell>>(iter: I) -> Self {
        Row::new(iter.into_iter().collect())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetProperties {
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sheet {
    pub properties: SheetProperties,
    pub rows: Vec<Row>,
}

impl Sheet {
    pub fn new(title: Option<&str>, rows: Vec<Row>) -> Self {
        Sheet {
            properties: SheetProperties {
                title: title.map(str::to_string),
            },
            rows,
        }
    }

    /// Declared title, if it has any visible text.
    pub fn title(&self) -> Option<&str> {
        self.properties
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_rows_pad_with_blank_cells() {
        let row = Row::new(vec![Cell {
            text: Some("21/1/2025".into()),
            ..Cell::default()
        }]);
        assert_eq!(row.width(), 1);
        assert!(!row.cell(5).has_text());
        assert!(row.cell(5).link().is_none());
    }

    #[test]
    fn whitespace_only_row_is_blank() {
        let row: Row = ["", "  ", "\r\n"]
            .iter()
            .map(|t| Cell {
                text: Some(t.to_string()),
                ..Cell::default()
            })
            .collect();
        assert!(row.is_blank());
    }

    #[test]
    fn hyperlink_wins_over_run_link() {
        let cell = Cell {
            text: Some("Bài giảng".into()),
            hyperlink: Some("https://youtu.be/a".into()),
            rich_link: Some("https://youtu.be/b".into()),
            ..Cell::default()
        };
        assert_eq!(cell.link(), Some("https://youtu.be/a"));

        let run_only = Cell {
            hyperlink: None,
            ..cell
        };
        assert_eq!(run_only.link(), Some("https://youtu.be/b"));
    }

    #[test]
    fn blank_hyperlink_defers_to_run_link() {
        let json = r#"{"text":"Bài giảng","link":"","richLink":"https://youtu.be/a"}"#;
        let cell: Cell = serde_json::from_str(json).unwrap();
        assert_eq!(cell.link(), Some("https://youtu.be/a"));

        let blank = Cell {
            hyperlink: Some("  ".into()),
            rich_link: None,
            ..cell
        };
        assert_eq!(blank.link(), None);
    }

    #[test]
    fn hex_colors() {
        let c = Rgb::from_hex("#ead1dc").unwrap();
        assert!(c.approx_eq(&Rgb::new(0.918, 0.820, 0.863), 0.01));
        assert!(Rgb::from_hex("#xyz").is_none());
    }

    #[test]
    fn flat_cell_shape_deserializes() {
        let json = r#"{"text":"Tài liệu","link":"https://a.b/c","style":{"bgColor":{"red":1,"green":1,"blue":1},"bold":true,"align":"CENTER"}}"#;
        let cell: Cell = serde_json::from_str(json).unwrap();
        assert_eq!(cell.hyperlink.as_deref(), Some("https://a.b/c"));
        assert!(cell.style.bold);
        assert_eq!(cell.style.align, Align::Center);
        assert_eq!(cell.style.font_size, 10.0);
    }

    #[test]
    fn sheet_title_falls_back_when_blank() {
        assert_eq!(Sheet::new(Some("  "), vec![]).title(), None);
        assert_eq!(Sheet::new(Some("Giải tích"), vec![]).title(), Some("Giải tích"));
    }
}
