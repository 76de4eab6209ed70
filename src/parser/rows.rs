use serde::{Deserialize, Serialize};

use super::columns::{SESSION_INDEX_COL, TOPIC_TITLE_COL};
use crate::cell::Row;
use crate::palette::Palette;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RowKind {
    Header,
    SectionDivider,
    SessionStart,
    SessionContinuation,
}

/// Decide what a non-blank row means. `previous` is the kind given to the row
/// before it; `None` means this is the first row of the sheet.
pub fn classify_row(
    row: &Row,
    previous: Option<RowKind>,
    palette: &Palette,
    continuation_marker: &str,
) -> RowKind {
    if previous.is_none() {
        return RowKind::Header;
    }
    if is_divider(row, palette) {
        return RowKind::SectionDivider;
    }
    let index = row.cell(SESSION_INDEX_COL).text().trim();
    if !index.is_empty() && index != continuation_marker {
        RowKind::SessionStart
    } else {
        RowKind::SessionContinuation
    }
}

/// Index and title cells share a fill from outside the ordinary palette, and
/// no present cell of the row is left unfilled.
fn is_divider(row: &Row, palette: &Palette) -> bool {
    let (Some(index_bg), Some(title_bg)) = (
        row.cell(SESSION_INDEX_COL).bg_color(),
        row.cell(TOPIC_TITLE_COL).bg_color(),
    ) else {
        return false;
    };
    palette.same_color(index_bg, title_bg)
        && palette.is_structural(index_bg)
        && row.cells().iter().all(|c| c.bg_color().is_some())
}
