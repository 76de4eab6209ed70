use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::SheetError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResourceKind {
    Document,
    Lecture,
    HandwrittenSolution,
    Unknown,
}

impl ResourceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::Document => "DOCUMENT",
            ResourceKind::Lecture => "LECTURE",
            ResourceKind::HandwrittenSolution => "HANDWRITTEN_SOLUTION",
            ResourceKind::Unknown => "UNKNOWN",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub kind: ResourceKind,
    pub label: String,
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    pub title: String,
    pub resources: Vec<Resource>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub date: Option<String>,
    pub index: String,
    pub topics: Vec<Topic>,
}

impl Session {
    /// Interpret `date` as `d/m/yyyy`, the convention of the source sheets.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        let raw = self.date.as_deref()?.trim();
        NaiveDate::parse_from_str(raw, "%d/%m/%Y").ok()
    }

    pub fn resource_count(&self) -> usize {
        self.topics.iter().map(|t| t.resources.len()).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub title: String,
    pub sessions: Vec<Session>,
}

/// Everything one run produces: the courses that could be built and the
/// anomalies recorded along the way.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub courses: Vec<Course>,
    pub errors: Vec<SheetError>,
}

impl Schedule {
    pub fn course(&self, title: &str) -> Option<&Course> {
        self.courses.iter().find(|c| c.title == title)
    }
}
