pub mod builder;
pub mod columns;
pub mod resources;
pub mod rows;

use crate::cell::{Sheet, Workbook};
use crate::config::Settings;
use crate::model::Schedule;
use builder::SheetOutcome;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Two-pass pipeline per sheet: rows → classified rows → course.
pub fn build_schedule(workbook: &Workbook) -> Schedule {
    build_schedule_with(workbook, &Settings::default())
}

pub fn build_schedule_with(workbook: &Workbook, settings: &Settings) -> Schedule {
    let mut schedule = Schedule::default();
    for outcome in build_sheets(&workbook.sheets, settings) {
        schedule.courses.extend(outcome.course);
        schedule.errors.extend(outcome.errors);
    }
    schedule
}

#[cfg(feature = "rayon")]
fn build_sheets(sheets: &[Sheet], settings: &Settings) -> Vec<SheetOutcome> {
    if settings.parallel {
        sheets
            .par_iter()
            .map(|s| builder::build_course(s, settings))
            .collect()
    } else {
        sheets
            .iter()
            .map(|s| builder::build_course(s, settings))
            .collect()
    }
}

#[cfg(not(feature = "rayon"))]
fn build_sheets(sheets: &[Sheet], settings: &Settings) -> Vec<SheetOutcome> {
    sheets
        .iter()
        .map(|s| builder::build_course(s, settings))
        .collect()
}
