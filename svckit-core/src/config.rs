use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::SvcError;

/// Logger destination settings.
///
/// Wire names are camelCase so the same YAML/JSON options file can be
/// shared across services regardless of implementation language. The
/// lowercase aliases exist for env overrides, whose keys figment
/// lowercases.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// When true, both streams write to stdout and no files are touched.
    #[serde(default = "default_true")]
    pub stdout: bool,
    /// Path prefix for the rotating main log.
    #[serde(rename = "fileLocation", alias = "filelocation", default = "default_file_location")]
    pub file_location: String,
    /// Path prefix for the rotating TDR log.
    #[serde(rename = "fileTdrLocation", alias = "filetdrlocation", default = "default_tdr_location")]
    pub file_tdr_location: String,
    /// Retention for rotated files, in days.
    #[serde(rename = "maxAgeDays", alias = "maxagedays", default = "default_max_age_days")]
    pub max_age_days: u64,
}

// ── Defaults ──────────────────────────────────────────────────

fn default_true() -> bool { true }
fn default_file_location() -> String { "log/app.log".into() }
fn default_tdr_location() -> String { "log/app_tdr.log".into() }
fn default_max_age_days() -> u64 { 7 }

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            stdout: true,
            file_location: default_file_location(),
            file_tdr_location: default_tdr_location(),
            max_age_days: default_max_age_days(),
        }
    }
}

impl LogConfig {
    /// Load configuration from a YAML file + `SVCKIT_`-prefixed env overrides.
    pub fn load(path: &Path) -> Result<Self, SvcError> {
        let config: LogConfig = Figment::new()
            .merge(Yaml::file(path))
            .merge(Env::prefixed("SVCKIT_"))
            .extract()
            .map_err(|e| SvcError::Config(e.to_string()))?;
        Ok(config)
    }
}
