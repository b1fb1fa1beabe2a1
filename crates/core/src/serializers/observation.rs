use super::{parse_record_document, render_record_document, PlainRecord, Serializer};
use crate::constants::{DAY_FIELD, VALUE_FIELD};
use crate::models::Observation;
use crate::{storage, FormatError, PatientResult};
use serde::{de, Deserialize, Deserializer};
use serde_json::Value;
use std::path::Path;

/// Maps observations to and from `{day, value}` records.
///
/// Values are carried through as-is; no rounding happens here.
pub struct ObservationSerializer;

impl Serializer for ObservationSerializer {
    type Instance = Observation;
    type Record = PlainRecord;

    fn serialize(instances: &[Observation]) -> Vec<PlainRecord> {
        instances
            .iter()
            .map(|obs| {
                let mut record = PlainRecord::new();
                record.insert(DAY_FIELD.to_string(), Value::from(obs.day));
                record.insert(VALUE_FIELD.to_string(), Value::from(obs.value));
                record
            })
            .collect()
    }

    fn deserialize(records: Vec<PlainRecord>) -> PatientResult<Vec<Observation>> {
        records.into_iter().map(observation_from_record).collect()
    }

    fn save(instances: &[Observation], path: &Path) -> PatientResult<()> {
        let document = render_record_document(&Self::serialize(instances))?;
        storage::write_atomic(path, document.as_bytes())
    }

    fn load(path: &Path) -> PatientResult<Vec<Observation>> {
        let text = storage::read_text(path)?;
        Self::deserialize(parse_record_document(&text)?)
    }
}

/// Wire shape of one observation record. Unknown fields are ignored.
#[derive(Debug, Deserialize)]
struct ObservationWire {
    #[serde(deserialize_with = "whole_day")]
    day: u32,
    value: f64,
}

/// Accepts any JSON number with no fractional part that fits a `u32`, so `3` and `3.0` are
/// the same day.
fn whole_day<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = f64::deserialize(deserializer)?;
    if raw.fract() != 0.0 || raw < 0.0 || raw > f64::from(u32::MAX) {
        return Err(de::Error::custom(format!(
            "expected a non-negative whole number of days, got {raw}"
        )));
    }
    Ok(raw as u32)
}

fn observation_from_record(record: PlainRecord) -> PatientResult<Observation> {
    for field in [DAY_FIELD, VALUE_FIELD] {
        if !record.contains_key(field) {
            return Err(FormatError::MissingField(field).into());
        }
    }

    match serde_path_to_error::deserialize::<_, ObservationWire>(Value::Object(record)) {
        Ok(wire) => Ok(Observation::new(wire.day, wire.value)),
        Err(err) => {
            let path = err.path().to_string();
            let reason = err.into_inner().to_string();
            let error = match [DAY_FIELD, VALUE_FIELD].into_iter().find(|f| *f == path) {
                Some(field) => FormatError::InvalidField { field, reason },
                None => FormatError::MalformedDocument(format!(
                    "observation record mismatch at {path}: {reason}"
                )),
            };
            Err(error.into())
        }
    }
}
