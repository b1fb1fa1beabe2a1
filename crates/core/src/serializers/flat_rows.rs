//! Flat-row patient codec.
//!
//! One row per patient. A patient without observations is a single field holding the name;
//! otherwise the name is followed by alternating day/value fields:
//!
//! ```text
//! Alice,0,3,1,4,2,5
//! Bob
//! ```
//!
//! Days and values are truncated to integers when written. Fractional inflammation values do
//! not survive this format.

use super::{PatientSerializer, PlainRecord, Serializer};
use crate::constants::{DAY_FIELD, NAME_FIELD, OBSERVATIONS_FIELD, VALUE_FIELD};
use crate::models::Patient;
use crate::{storage, FormatError, PatientError, PatientResult};
use serde_json::Value;
use std::path::Path;

pub struct PatientCsvSerializer;

impl Serializer for PatientCsvSerializer {
    type Instance = Patient;
    type Record = PlainRecord;

    fn serialize(instances: &[Patient]) -> Vec<PlainRecord> {
        PatientSerializer::serialize(instances)
    }

    fn deserialize(records: Vec<PlainRecord>) -> PatientResult<Vec<Patient>> {
        PatientSerializer::deserialize(records)
    }

    fn save(instances: &[Patient], path: &Path) -> PatientResult<()> {
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(Vec::new());

        for record in Self::serialize(instances) {
            writer.write_record(record_to_row(&record))?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| {
                PatientError::FileWrite(std::io::Error::new(
                    e.error().kind(),
                    format!("Failed to flush rows for {}: {}", path.display(), e.error()),
                ))
            })?;
        storage::write_atomic(path, &bytes)?;
        tracing::debug!("saved {} patients to {}", instances.len(), path.display());
        Ok(())
    }

    fn load(path: &Path) -> PatientResult<Vec<Patient>> {
        let bytes = storage::read_bytes(path)?;
        if let Some(line) = first_blank_line(&bytes) {
            return Err(FormatError::EmptyRow { line }.into());
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(bytes.as_slice());

        let mut records = Vec::new();
        for row in reader.records() {
            records.push(row_to_record(&row?)?);
        }

        let patients = Self::deserialize(records)?;
        tracing::debug!("loaded {} patients from {}", patients.len(), path.display());
        Ok(patients)
    }
}

/// Flattens a patient record into `name[,day,value...]`.
///
/// Records come from [`PatientSerializer::serialize`], so the fields are always present.
fn record_to_row(record: &PlainRecord) -> Vec<String> {
    let name = record
        .get(NAME_FIELD)
        .and_then(Value::as_str)
        .unwrap_or_default();

    let mut row = vec![name.to_string()];
    let observations = record
        .get(OBSERVATIONS_FIELD)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    for observation in observations {
        row.push(truncated_field(observation.get(DAY_FIELD)));
        row.push(truncated_field(observation.get(VALUE_FIELD)));
    }

    row
}

fn truncated_field(value: Option<&Value>) -> String {
    match value {
        Some(v) if v.is_i64() || v.is_u64() => v.to_string(),
        Some(v) => {
            let truncated = v.as_f64().map_or(0.0, f64::trunc);
            // `as` saturates and maps NaN to 0.
            (truncated as i64).to_string()
        }
        None => "0".to_string(),
    }
}

/// Rebuilds a patient record from one row.
///
/// Pairs start at field 1 and step by 2 up to the second-to-last field, so every complete
/// day/value pair is recovered whatever the row's width. A lone trailing day is dropped.
fn row_to_record(row: &csv::StringRecord) -> PatientResult<PlainRecord> {
    let line = row.position().map_or(0, |p| p.line());

    let name = row.get(0).ok_or(FormatError::EmptyRow { line })?;

    let mut observations = Vec::with_capacity(row.len() / 2);
    for i in (1..row.len().saturating_sub(1)).step_by(2) {
        let mut observation = PlainRecord::new();
        observation.insert(
            DAY_FIELD.to_string(),
            Value::from(integer_field(row, i, DAY_FIELD)?),
        );
        observation.insert(
            VALUE_FIELD.to_string(),
            Value::from(integer_field(row, i + 1, VALUE_FIELD)?),
        );
        observations.push(Value::Object(observation));
    }

    if row.len() > 1 && row.len() % 2 == 0 {
        tracing::warn!(
            "row {} for {} has an unpaired trailing day; ignoring it",
            line,
            name
        );
    }

    let mut record = PlainRecord::new();
    record.insert(NAME_FIELD.to_string(), Value::from(name));
    record.insert(OBSERVATIONS_FIELD.to_string(), Value::Array(observations));
    Ok(record)
}

/// Line number of the first line that holds no fields at all.
///
/// The CSV reader skips such lines silently, so they are found before parsing. Line breaks
/// inside quoted fields belong to the field and never count as blank lines.
fn first_blank_line(bytes: &[u8]) -> Option<u64> {
    let mut line = 1;
    let mut in_quotes = false;
    let mut empty = true;

    for &byte in bytes {
        match byte {
            b'"' => {
                in_quotes = !in_quotes;
                empty = false;
            }
            b'\n' if in_quotes => line += 1,
            b'\n' => {
                if empty {
                    return Some(line);
                }
                line += 1;
                empty = true;
            }
            b'\r' if !in_quotes => {}
            _ => empty = false,
        }
    }

    None
}

fn integer_field(row: &csv::StringRecord, index: usize, field: &'static str) -> PatientResult<i64> {
    let raw = row.get(index).unwrap_or_default().trim();
    raw.parse::<i64>().map_err(|e| {
        FormatError::InvalidField {
            field,
            reason: format!("expected an integer, got {raw:?}: {e}"),
        }
        .into()
    })
}
