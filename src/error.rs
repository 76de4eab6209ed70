use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structural anomalies recovered while building one sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    #[error("header row has fewer than 3 columns")]
    ShortHeader,
    #[error("continuation row before any session was opened")]
    ContinuationWithoutSession,
    #[error("resource link is not a valid URL")]
    MalformedLink,
}

impl ErrorKind {
    pub fn severity(self) -> Severity {
        match self {
            ErrorKind::ShortHeader => Severity::Error,
            ErrorKind::ContinuationWithoutSession | ErrorKind::MalformedLink => Severity::Warning,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::ShortHeader => "SHORT_HEADER",
            ErrorKind::ContinuationWithoutSession => "CONTINUATION_WITHOUT_SESSION",
            ErrorKind::MalformedLink => "MALFORMED_LINK",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Error => "ERROR",
            Severity::Warning => "WARNING",
        }
    }
}

/// One recorded anomaly. `row` and `column` are 0-based positions in the
/// source sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetError {
    pub sheet: String,
    pub kind: ErrorKind,
    pub severity: Severity,
    pub row: Option<usize>,
    pub column: Option<usize>,
    pub detail: String,
}

impl SheetError {
    pub fn new(sheet: &str, kind: ErrorKind, detail: impl Into<String>) -> Self {
        SheetError {
            sheet: sheet.to_string(),
            kind,
            severity: kind.severity(),
            row: None,
            column: None,
            detail: detail.into(),
        }
    }

    pub fn at(mut self, row: usize, column: Option<usize>) -> Self {
        self.row = Some(row);
        self.column = column;
        self
    }
}

impl std::fmt::Display for SheetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.sheet, self.kind)?;
        match (self.row, self.column) {
            (Some(r), Some(c)) => write!(f, " at row {}, column {}", r + 1, c + 1)?,
            (Some(r), None) => write!(f, " at row {}", r + 1)?,
            _ => {}
        }
        if !self.detail.is_empty() {
            write!(f, ": {}", self.detail)?;
        }
        Ok(())
    }
}

/// Failures of the document loader, before any sheet is interpreted.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid workbook JSON")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_serialize_in_screaming_case() {
        let json = serde_json::to_string(&ErrorKind::ContinuationWithoutSession).unwrap();
        assert_eq!(json, "\"CONTINUATION_WITHOUT_SESSION\"");
        assert_eq!(ErrorKind::MalformedLink.as_str(), "MALFORMED_LINK");
    }

    #[test]
    fn display_uses_one_based_positions() {
        let e = SheetError::new("Giải tích", ErrorKind::MalformedLink, "drive/abc").at(4, Some(3));
        assert_eq!(e.severity, Severity::Warning);
        assert_eq!(
            e.to_string(),
            "[Giải tích] resource link is not a valid URL at row 5, column 4: drive/abc"
        );
    }
}
