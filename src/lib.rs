//! Rebuilds a course schedule from a styled spreadsheet export.
//!
//! The sheet carries no explicit tree: sessions, topics and chapter groupings
//! are implied by cell position, background fill and links. [`build_schedule`]
//! reads every sheet of a [`Workbook`] and returns one [`Course`] per sheet
//! together with the anomalies it recovered from.

pub mod cell;
pub mod config;
pub mod db;
pub mod error;
pub mod grid;
pub mod model;
pub mod palette;
pub mod parser;

pub use cell::{Cell, Row, Sheet, Workbook};
pub use config::Settings;
pub use error::{ErrorKind, LoadError, SheetError, Severity};
pub use model::{Course, Resource, ResourceKind, Schedule, Session, Topic};
pub use parser::{build_schedule, build_schedule_with};
