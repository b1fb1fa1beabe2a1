//! Structured-document patient codec.
//!
//! The whole collection is a single JSON array, one object per patient:
//!
//! ```json
//! [{"name": "Alice", "observations": [{"day": 0, "value": 1.5}]}]
//! ```
//!
//! Observation values keep their full precision. Non-finite values have no JSON
//! representation; they are written as `null` and rejected on load.

use super::{
    parse_record_document, render_record_document, PatientSerializer, PlainRecord, Serializer,
};
use crate::models::Patient;
use crate::{storage, PatientResult};
use std::path::Path;

pub struct PatientJsonSerializer;

impl Serializer for PatientJsonSerializer {
    type Instance = Patient;
    type Record = PlainRecord;

    fn serialize(instances: &[Patient]) -> Vec<PlainRecord> {
        PatientSerializer::serialize(instances)
    }

    fn deserialize(records: Vec<PlainRecord>) -> PatientResult<Vec<Patient>> {
        PatientSerializer::deserialize(records)
    }

    fn save(instances: &[Patient], path: &Path) -> PatientResult<()> {
        let document = render_record_document(&Self::serialize(instances))?;
        storage::write_atomic(path, document.as_bytes())?;
        tracing::debug!("saved {} patients to {}", instances.len(), path.display());
        Ok(())
    }

    fn load(path: &Path) -> PatientResult<Vec<Patient>> {
        let text = storage::read_text(path)?;
        let patients = Self::deserialize(parse_record_document(&text)?)?;
        tracing::debug!("loaded {} patients from {}", patients.len(), path.display());
        Ok(patients)
    }
}
