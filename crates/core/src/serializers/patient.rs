use super::{ObservationSerializer, PlainRecord, Serializer};
use crate::constants::{NAME_FIELD, OBSERVATIONS_FIELD};
use crate::models::{Named, Patient};
use crate::{FormatError, PatientResult};
use serde_json::Value;

/// Record mapping shared by every patient codec.
///
/// Each patient becomes `{name, observations: [{day, value}, ...]}`. The on-disk codecs only
/// differ in how they store these records.
pub struct PatientSerializer;

impl PatientSerializer {
    pub fn serialize(instances: &[Patient]) -> Vec<PlainRecord> {
        instances
            .iter()
            .map(|patient| {
                let observations = ObservationSerializer::serialize(patient.observations())
                    .into_iter()
                    .map(Value::Object)
                    .collect();

                let mut record = PlainRecord::new();
                record.insert(NAME_FIELD.to_string(), Value::from(patient.name()));
                record.insert(OBSERVATIONS_FIELD.to_string(), Value::Array(observations));
                record
            })
            .collect()
    }

    /// Builds patients from records.
    ///
    /// The `observations` field is taken out of each record and decoded on its own; the patient
    /// is then built from what remains.
    pub fn deserialize(records: Vec<PlainRecord>) -> PatientResult<Vec<Patient>> {
        records.into_iter().map(patient_from_record).collect()
    }
}

fn patient_from_record(mut record: PlainRecord) -> PatientResult<Patient> {
    let observations = match record.remove(OBSERVATIONS_FIELD) {
        Some(Value::Array(items)) => items
            .into_iter()
            .map(|item| match item {
                Value::Object(map) => Ok(map),
                other => Err(FormatError::InvalidField {
                    field: OBSERVATIONS_FIELD,
                    reason: format!("expected an observation record, got {other}"),
                }),
            })
            .collect::<Result<Vec<_>, _>>()?,
        Some(other) => {
            return Err(FormatError::InvalidField {
                field: OBSERVATIONS_FIELD,
                reason: format!("expected a list, got {other}"),
            }
            .into())
        }
        None => return Err(FormatError::MissingField(OBSERVATIONS_FIELD).into()),
    };
    let observations = ObservationSerializer::deserialize(observations)?;

    let name = match record.remove(NAME_FIELD) {
        Some(Value::String(name)) => name,
        Some(other) => {
            return Err(FormatError::InvalidField {
                field: NAME_FIELD,
                reason: format!("expected a string, got {other}"),
            }
            .into())
        }
        None => return Err(FormatError::MissingField(NAME_FIELD).into()),
    };

    if let Some(unknown) = record.keys().next() {
        tracing::debug!("ignoring unknown patient field `{}`", unknown);
    }

    Ok(Patient::with_observations(name, observations))
}
