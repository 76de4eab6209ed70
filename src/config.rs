use std::path::Path;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use tracing::warn;

use crate::cell::Rgb;
use crate::palette::{Palette, DEFAULT_TOLERANCE};

const DEFAULT_FILE: &str = "syllabus";
const ENV_PREFIX: &str = "SYLLABUS";

/// Tunables of the interpreter. Every field has a default, so an empty
/// environment yields a working configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Placed between a section title and a topic title.
    pub separator: String,
    /// Index-column text that marks a continuation row.
    pub continuation_marker: String,
    /// Course title for sheets that declare none.
    pub untitled: String,
    pub palette_tolerance: f32,
    /// Extra `#rrggbb` fills treated as ordinary row colors, for sheets whose
    /// theme adds accents the built-in palette lacks.
    pub extra_ordinary: Vec<String>,
    /// Build sheets on the rayon pool when the feature is enabled.
    pub parallel: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            separator: " — ".to_string(),
            continuation_marker: "-".to_string(),
            untitled: "Untitled".to_string(),
            palette_tolerance: DEFAULT_TOLERANCE,
            extra_ordinary: Vec::new(),
            parallel: true,
        }
    }
}

impl Settings {
    /// Layer `syllabus.toml` (or `file`, when given) and `SYLLABUS_*`
    /// environment variables over the defaults.
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        let source = match file {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_FILE).required(false),
        };
        Config::builder()
            .add_source(source)
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()
    }

    pub fn palette(&self) -> Palette {
        self.extra_ordinary
            .iter()
            .fold(Palette::with_tolerance(self.palette_tolerance), |palette, hex| {
                match Rgb::from_hex(hex) {
                    Some(color) => palette.with_ordinary(color),
                    None => {
                        warn!(color = %hex, "ignoring extra_ordinary entry that is not #rrggbb");
                        palette
                    }
                }
            })
    }
}
