use serde::Serialize;

use crate::cell::{Cell, Row};

pub const TIME_COL: usize = 0;
pub const SESSION_INDEX_COL: usize = 1;
pub const TOPIC_TITLE_COL: usize = 2;
pub const FIRST_RESOURCE_COL: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ColumnRole {
    Time,
    SessionIndex,
    TopicTitle,
    /// 1-based resource slot.
    Resource(usize),
}

/// Column roles of one sheet. Roles are positional; header labels vary
/// between sheets ("Bài giảng" vs "Bài giảng 01") and are kept for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnLayout {
    labels: Vec<String>,
}

/// Returned when the header is too narrow to hold the fixed columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShortHeader {
    pub width: usize,
}

impl ColumnLayout {
    /// The header ends at its last labelled cell; trailing cells that only
    /// carry formatting do not widen it.
    pub fn resolve(header: &Row) -> Result<Self, ShortHeader> {
        let width = header
            .cells()
            .iter()
            .rposition(Cell::has_text)
            .map_or(0, |last| last + 1);
        if width < FIRST_RESOURCE_COL {
            return Err(ShortHeader { width });
        }
        let labels = header.cells()[..width]
            .iter()
            .map(|c| c.text().trim().to_string())
            .collect();
        Ok(ColumnLayout { labels })
    }

    pub fn width(&self) -> usize {
        self.labels.len()
    }

    /// Any column past the fixed three is a resource slot, including columns a
    /// data row has beyond the header's width.
    pub fn role(&self, col: usize) -> ColumnRole {
        match col {
            TIME_COL => ColumnRole::Time,
            SESSION_INDEX_COL => ColumnRole::SessionIndex,
            TOPIC_TITLE_COL => ColumnRole::TopicTitle,
            n => ColumnRole::Resource(n - FIRST_RESOURCE_COL + 1),
        }
    }

    pub fn label(&self, col: usize) -> Option<&str> {
        self.labels.get(col).map(String::as_str)
    }

    /// Columns to read from `row`: up to the header width, or further when
    /// the row is wider.
    pub fn columns(&self, row: &Row) -> std::ops::Range<usize> {
        0..self.width().max(row.width())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::{CellStyle, Rgb};

    fn roles(layout: &ColumnLayout) -> Vec<ColumnRole> {
        (0..layout.width()).map(|c| layout.role(c)).collect()
    }

    fn header(labels: &[&str]) -> Row {
        labels
            .iter()
            .map(|l| Cell {
                text: Some(l.to_string()),
                ..Cell::default()
            })
            .collect()
    }

    #[test]
    fn positional_roles() {
        let h = header(&[
            "Thời gian",
            "Buổi",
            "TOPIC",
            "Tài liệu",
            "Bài giảng 01",
            "Bài giảng 02",
            "Đáp án viết tay",
        ]);
        let layout = ColumnLayout::resolve(&h).unwrap();
        assert_eq!(
            roles(&layout),
            vec![
                ColumnRole::Time,
                ColumnRole::SessionIndex,
                ColumnRole::TopicTitle,
                ColumnRole::Resource(1),
                ColumnRole::Resource(2),
                ColumnRole::Resource(3),
                ColumnRole::Resource(4),
            ]
        );
        assert_eq!(layout.label(4), Some("Bài giảng 01"));
    }

    #[test]
    fn labels_do_not_drive_roles() {
        let a = ColumnLayout::resolve(&header(&["Ngày", "STT", "Nội dung", "Bài giảng"])).unwrap();
        let b = ColumnLayout::resolve(&header(&["Thời gian", "Buổi", "TOPIC", "Video"])).unwrap();
        assert_eq!(roles(&a), roles(&b));
    }

    #[test]
    fn two_columns_is_short() {
        let err = ColumnLayout::resolve(&header(&["Thời gian", "Buổi"])).unwrap_err();
        assert_eq!(err.width, 2);
    }

    #[test]
    fn styled_blank_cells_do_not_widen_header() {
        let mut h = header(&["Thời gian", "Buổi"]);
        h = Row::new(
            h.cells()
                .iter()
                .cloned()
                .chain([Cell {
                    style: CellStyle {
                        bg_color: Some(Rgb::new(0.788, 0.855, 0.973)),
                        bold: true,
                        ..CellStyle::default()
                    },
                    ..Cell::default()
                }])
                .collect(),
        );
        assert_eq!(h.width(), 3);
        assert_eq!(ColumnLayout::resolve(&h).unwrap_err().width, 2);

        let trailing = header(&["a", "b", "c", "d", "", " "]);
        assert_eq!(ColumnLayout::resolve(&trailing).unwrap().width(), 4);
    }

    #[test]
    fn wide_rows_extend_resource_columns() {
        let layout = ColumnLayout::resolve(&header(&["a", "b", "c", "d"])).unwrap();
        let wide = header(&["", "", "", "", "", ""]);
        assert_eq!(layout.columns(&wide), 0..6);
        assert_eq!(layout.role(5), ColumnRole::Resource(3));
        assert_eq!(layout.columns(&Row::default()), 0..4);
    }
}
