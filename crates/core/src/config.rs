//! Core runtime configuration.
//!
//! Configuration is resolved once per records file at startup and then passed to the code that
//! needs it, so environment variables are never consulted in the middle of an operation.

use crate::{PatientError, PatientResult};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// On-disk format of a patient records file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum RecordFormat {
    /// Structured JSON document.
    #[default]
    Json,
    /// One CSV row per patient.
    Csv,
}

impl RecordFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            RecordFormat::Json => "json",
            RecordFormat::Csv => "csv",
        }
    }

    /// Guesses the format from a file extension, case-insensitively.
    pub fn from_extension(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        ext.parse().ok()
    }
}

impl FromStr for RecordFormat {
    type Err = PatientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(RecordFormat::Json),
            "csv" => Ok(RecordFormat::Csv),
            other => Err(PatientError::InvalidInput(format!(
                "unknown record format '{other}' (expected 'json' or 'csv')"
            ))),
        }
    }
}

impl fmt::Display for RecordFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Core configuration for one records file.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    records_path: PathBuf,
    format: RecordFormat,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns `PatientError::InvalidInput` if the path is empty or names an existing directory.
    pub fn new(records_path: PathBuf, format: RecordFormat) -> PatientResult<Self> {
        if records_path.as_os_str().is_empty() {
            return Err(PatientError::InvalidInput(
                "records path cannot be empty".into(),
            ));
        }

        if records_path.is_dir() {
            return Err(PatientError::InvalidInput(format!(
                "records path {} is a directory",
                records_path.display()
            )));
        }

        Ok(Self {
            records_path,
            format,
        })
    }

    pub fn records_path(&self) -> &Path {
        &self.records_path
    }

    pub fn format(&self) -> RecordFormat {
        self.format
    }
}

/// Resolve the record format for `path`.
///
/// An explicit `value` (from a flag or environment variable) wins when it is non-empty;
/// otherwise the file extension decides, falling back to JSON.
pub fn resolve_record_format(value: Option<String>, path: &Path) -> PatientResult<RecordFormat> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    match value {
        Some(v) => v.parse(),
        None => Ok(RecordFormat::from_extension(path).unwrap_or_default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn parses_formats_case_insensitively() {
        assert_eq!("JSON".parse::<RecordFormat>().unwrap(), RecordFormat::Json);
        assert_eq!(" csv ".parse::<RecordFormat>().unwrap(), RecordFormat::Csv);
        assert!(matches!(
            "yaml".parse::<RecordFormat>(),
            Err(PatientError::InvalidInput(_))
        ));
    }

    #[test]
    fn explicit_value_wins_over_extension() {
        let format =
            resolve_record_format(Some("csv".into()), Path::new("patients.json")).unwrap();
        assert_eq!(format, RecordFormat::Csv);
    }

    #[test]
    fn blank_value_falls_back_to_extension() {
        let format = resolve_record_format(Some("  ".into()), Path::new("patients.CSV")).unwrap();
        assert_eq!(format, RecordFormat::Csv);
    }

    #[test]
    fn unknown_extension_defaults_to_json() {
        let format = resolve_record_format(None, Path::new("patients.dat")).unwrap();
        assert_eq!(format, RecordFormat::Json);

        let format = resolve_record_format(None, Path::new("patients")).unwrap();
        assert_eq!(format, RecordFormat::Json);
    }

    #[test]
    fn config_rejects_empty_path() {
        let result = CoreConfig::new(PathBuf::new(), RecordFormat::Json);
        assert!(matches!(result, Err(PatientError::InvalidInput(_))));
    }

    #[test]
    fn config_rejects_directory() {
        let temp = TempDir::new().unwrap();
        let result = CoreConfig::new(temp.path().to_path_buf(), RecordFormat::Csv);
        assert!(matches!(result, Err(PatientError::InvalidInput(_))));
    }

    #[test]
    fn config_keeps_path_and_format() {
        let cfg = CoreConfig::new(PathBuf::from("records.csv"), RecordFormat::Csv).unwrap();
        assert_eq!(cfg.records_path(), Path::new("records.csv"));
        assert_eq!(cfg.format(), RecordFormat::Csv);
        assert_eq!(cfg.format().to_string(), "csv");
    }
}
