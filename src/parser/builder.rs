use tracing::{debug, info, warn};

use super::columns::{ColumnLayout, ColumnRole, SESSION_INDEX_COL, TIME_COL, TOPIC_TITLE_COL};
use super::resources;
use super::rows::{classify_row, RowKind};
use crate::cell::{Row, Sheet};
use crate::config::Settings;
use crate::error::{ErrorKind, SheetError};
use crate::model::{Course, Session, Topic};

/// Result of one sheet: the course (absent when the sheet was skipped) and
/// every anomaly recorded while building it.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetOutcome {
    pub course: Option<Course>,
    pub errors: Vec<SheetError>,
}

/// Fold the rows of one sheet into a course.
pub fn build_course(sheet: &Sheet, settings: &Settings) -> SheetOutcome {
    let title = match sheet.title() {
        Some(t) => t.to_string(),
        None => {
            info!(fallback = %settings.untitled, "sheet has no title");
            settings.untitled.clone()
        }
    };
    let palette = settings.palette();
    let mut builder = CourseBuilder::new(title, settings);
    let mut previous: Option<RowKind> = None;

    for (row_no, row) in sheet.rows.iter().enumerate() {
        if row.is_blank() {
            continue;
        }
        let kind = classify_row(row, previous, &palette, &settings.continuation_marker);
        debug!(sheet = %builder.course.title, row = row_no, ?kind, "classified row");
        if let Err(err) = builder.apply(row_no, row, kind) {
            warn!(sheet = %err.sheet, "{}", err);
            return SheetOutcome {
                course: None,
                errors: vec![err],
            };
        }
        previous = Some(kind);
    }

    builder.finish()
}

struct CourseBuilder<'a> {
    settings: &'a Settings,
    course: Course,
    layout: Option<ColumnLayout>,
    section: Option<String>,
    session: Option<Session>,
    errors: Vec<SheetError>,
}

impl<'a> CourseBuilder<'a> {
    fn new(title: String, settings: &'a Settings) -> Self {
        CourseBuilder {
            settings,
            course: Course {
                title,
                sessions: Vec::new(),
            },
            layout: None,
            section: None,
            session: None,
            errors: Vec::new(),
        }
    }

    /// Only a short header aborts the sheet; everything else is recorded and
    /// the fold goes on.
    fn apply(&mut self, row_no: usize, row: &Row, kind: RowKind) -> Result<(), SheetError> {
        match kind {
            RowKind::Header => {
                let layout = ColumnLayout::resolve(row).map_err(|short| {
                    SheetError::new(
                        &self.course.title,
                        ErrorKind::ShortHeader,
                        format!("header has {} column(s)", short.width),
                    )
                    .at(row_no, None)
                })?;
                self.layout = Some(layout);
            }
            RowKind::SectionDivider => {
                self.close_session();
                let title = normalize_title(row.cell(TOPIC_TITLE_COL).text());
                self.section = (!title.is_empty()).then_some(title);
            }
            RowKind::SessionStart => {
                self.close_session();
                let date = normalize_title(row.cell(TIME_COL).text());
                let topic = self.topic(row_no, row);
                self.session = Some(Session {
                    date: (!date.is_empty()).then_some(date),
                    index: row.cell(SESSION_INDEX_COL).text().trim().to_string(),
                    topics: vec![topic],
                });
            }
            RowKind::SessionContinuation => {
                if self.session.is_none() {
                    self.record(
                        SheetError::new(
                            &self.course.title,
                            ErrorKind::ContinuationWithoutSession,
                            normalize_title(row.cell(TOPIC_TITLE_COL).text()),
                        )
                        .at(row_no, None),
                    );
                    return Ok(());
                }
                let topic = self.topic(row_no, row);
                if let Some(session) = self.session.as_mut() {
                    session.topics.push(topic);
                }
            }
        }
        Ok(())
    }

    fn topic(&mut self, row_no: usize, row: &Row) -> Topic {
        let raw = normalize_title(row.cell(TOPIC_TITLE_COL).text());
        let title = match &self.section {
            Some(section) if raw.is_empty() => section.clone(),
            Some(section) => format!("{}{}{}", section, self.settings.separator, raw),
            None => raw,
        };

        let mut found = Vec::new();
        let mut rejected = Vec::new();
        if let Some(layout) = &self.layout {
            for col in layout.columns(row) {
                let ColumnRole::Resource(slot) = layout.role(col) else {
                    continue;
                };
                let Some(extraction) = resources::extract(row.cell(col)) else {
                    continue;
                };
                if let Some(link) = extraction.rejected_link {
                    let column = match layout.label(col).filter(|l| !l.is_empty()) {
                        Some(label) => format!("\"{}\"", label),
                        None => format!("resource slot {}", slot),
                    };
                    rejected.push(
                        SheetError::new(
                            &self.course.title,
                            ErrorKind::MalformedLink,
                            format!("{} in {}", link, column),
                        )
                        .at(row_no, Some(col)),
                    );
                }
                found.push(extraction.resource);
            }
        }
        for err in rejected {
            self.record(err);
        }

        Topic {
            title,
            resources: found,
        }
    }

    fn close_session(&mut self) {
        if let Some(session) = self.session.take() {
            self.course.sessions.push(session);
        }
    }

    fn record(&mut self, err: SheetError) {
        warn!(sheet = %err.sheet, "{}", err);
        self.errors.push(err);
    }

    fn finish(mut self) -> SheetOutcome {
        self.close_session();
        info!(
            sheet = %self.course.title,
            sessions = self.course.sessions.len(),
            errors = self.errors.len(),
            "built course"
        );
        SheetOutcome {
            course: Some(self.course),
            errors: self.errors,
        }
    }
}

/// Source titles often trail stray line breaks.
pub fn normalize_title(raw: &str) -> String {
    raw.trim_end_matches(['\r', '\n']).trim().to_string()
}
