//! Document loader: turns a spreadsheet-API grid dump into a [`Workbook`].
//!
//! Two input shapes are accepted per sheet:
//! - the API's own `data[].rowData[].values[]` with `formattedValue`,
//!   `hyperlink`, `textFormatRuns` and `effectiveFormat`;
//! - the flattened `rows: [[Cell]]` form of [`crate::cell::Sheet`].

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use tracing::debug;

use crate::cell::{Align, Cell, CellStyle, Rgb, Row, Sheet, SheetProperties, Workbook};
use crate::error::LoadError;

static HYPERLINK_FORMULA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)^\s*=\s*HYPERLINK\(\s*"([^"]+)""#).unwrap());

pub fn load_workbook(path: impl AsRef<Path>) -> Result<Workbook, LoadError> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_workbook(&raw)
}

pub fn parse_workbook(raw: &str) -> Result<Workbook, LoadError> {
    let doc: GridDocument = serde_json::from_str(raw)?;
    let sheets: Vec<Sheet> = doc.sheets.into_iter().map(GridSheet::into_sheet).collect();
    debug!(sheets = sheets.len(), "parsed workbook");
    Ok(Workbook { sheets })
}

// ── API shape ──

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GridDocument {
    sheets: Vec<GridSheet>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GridSheet {
    properties: SheetProperties,
    data: Vec<GridData>,
    rows: Vec<Row>,
}

impl GridSheet {
    fn into_sheet(self) -> Sheet {
        let mut rows = self.rows;
        rows.extend(
            self.data
                .into_iter()
                .flat_map(|d| d.row_data)
                .map(|r| r.values.into_iter().map(CellData::into_cell).collect::<Row>()),
        );
        Sheet {
            properties: self.properties,
            rows,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct GridData {
    row_data: Vec<RowData>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RowData {
    values: Vec<CellData>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct CellData {
    formatted_value: Option<String>,
    user_entered_value: Option<ExtendedValue>,
    hyperlink: Option<String>,
    text_format_runs: Vec<TextFormatRun>,
    effective_format: Option<CellFormat>,
    user_entered_format: Option<CellFormat>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ExtendedValue {
    string_value: Option<String>,
    formula_value: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TextFormatRun {
    format: TextFormat,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct CellFormat {
    background_color: Option<Rgb>,
    background_color_style: Option<ColorStyle>,
    text_format: Option<TextFormat>,
    horizontal_alignment: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ColorStyle {
    rgb_color: Option<Rgb>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct TextFormat {
    bold: Option<bool>,
    font_size: Option<f32>,
    font_family: Option<String>,
    link: Option<Link>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Link {
    uri: Option<String>,
}

impl CellData {
    fn into_cell(self) -> Cell {
        let rich_link = self.rich_link();
        let style = self.style();
        let text = self
            .formatted_value
            .or_else(|| self.user_entered_value.and_then(|v| v.string_value));
        Cell {
            text,
            hyperlink: self.hyperlink.filter(|h| !h.trim().is_empty()),
            rich_link,
            style,
        }
    }

    /// First run link, then a cell-wide text link, then a `HYPERLINK` formula.
    fn rich_link(&self) -> Option<String> {
        let run_link = self
            .text_format_runs
            .iter()
            .find_map(|run| run.format.link.as_ref().and_then(|l| l.uri.clone()));
        let cell_link = || {
            self.format()
                .and_then(|f| f.text_format.as_ref())
                .and_then(|t| t.link.as_ref())
                .and_then(|l| l.uri.clone())
        };
        let formula_link = || {
            let formula = self.user_entered_value.as_ref()?.formula_value.as_deref()?;
            HYPERLINK_FORMULA_RE
                .captures(formula)
                .map(|caps| caps[1].to_string())
        };
        run_link.or_else(cell_link).or_else(formula_link)
    }

    fn format(&self) -> Option<&CellFormat> {
        self.effective_format
            .as_ref()
            .or(self.user_entered_format.as_ref())
    }

    fn style(&self) -> CellStyle {
        let Some(format) = self.format() else {
            return CellStyle::default();
        };
        let text = format.text_format.as_ref();
        CellStyle {
            bg_color: format
                .background_color_style
                .as_ref()
                .and_then(|s| s.rgb_color)
                .or(format.background_color),
            bold: text.and_then(|t| t.bold).unwrap_or(false),
            font_size: text
                .and_then(|t| t.font_size)
                .unwrap_or(CellStyle::PLAIN.font_size),
            font_family: text.and_then(|t| t.font_family.clone()),
            align: format
                .horizontal_alignment
                .as_deref()
                .and_then(Align::from_api)
                .unwrap_or_default(),
        }
    }
}
