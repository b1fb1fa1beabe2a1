//! Serialization contract and the concrete record codecs.
//!
//! Every codec implements [`Serializer`], a capability set of four operations over a
//! homogeneous collection of one domain type:
//!
//! - `serialize`: domain objects to plain records (pure, total)
//! - `deserialize`: plain records to domain objects (pure, fails on malformed records)
//! - `save`: serialize, then replace the destination file
//! - `load`: read the source file, then deserialize
//!
//! All four are required trait items, so a codec that leaves one out does not compile.
//!
//! Codecs are chosen by type at the call site, for example
//! `PatientService::<PatientCsvSerializer>::new(path)`, rather than by a format flag inside the
//! codec layer.
//!
//! | Codec | Instance | On disk |
//! |---|---|---|
//! | [`ObservationSerializer`] | [`Observation`](crate::models::Observation) | JSON array of `{day, value}` |
//! | [`PatientJsonSerializer`] | [`Patient`](crate::models::Patient) | JSON array of `{name, observations}` |
//! | [`PatientCsvSerializer`] | [`Patient`](crate::models::Patient) | one row per patient, `name[,day,value...]` |

mod document;
mod flat_rows;
mod observation;
mod patient;

pub use document::PatientJsonSerializer;
pub use flat_rows::PatientCsvSerializer;
pub use observation::ObservationSerializer;
pub use patient::PatientSerializer;

use crate::PatientResult;
use std::path::Path;

/// A plain, loosely typed record: a map of field names to values.
pub type PlainRecord = serde_json::Map<String, serde_json::Value>;

/// The serialization contract shared by every codec.
pub trait Serializer {
    /// Domain type carried by this codec.
    type Instance;
    /// Plain record the domain type maps to.
    type Record;

    fn serialize(instances: &[Self::Instance]) -> Vec<Self::Record>;

    fn deserialize(records: Vec<Self::Record>) -> PatientResult<Vec<Self::Instance>>;

    fn save(instances: &[Self::Instance], path: &Path) -> PatientResult<()>;

    fn load(path: &Path) -> PatientResult<Vec<Self::Instance>>;
}

/// Parses a JSON document of plain records, reporting the path of the first element that does
/// not match.
pub(crate) fn parse_record_document(text: &str) -> PatientResult<Vec<PlainRecord>> {
    let mut deserializer = serde_json::Deserializer::from_str(text);

    match serde_path_to_error::deserialize::<_, Vec<PlainRecord>>(&mut deserializer) {
        Ok(records) => {
            deserializer
                .end()
                .map_err(|e| crate::FormatError::MalformedDocument(e.to_string()))?;
            Ok(records)
        }
        Err(err) => {
            let path = err.path().to_string();
            let source = err.into_inner();
            let path = if path.is_empty() || path == "." {
                "<root>"
            } else {
                path.as_str()
            };
            Err(crate::FormatError::MalformedDocument(format!(
                "record document mismatch at {path}: {source}"
            ))
            .into())
        }
    }
}

/// Renders plain records as a JSON document.
pub(crate) fn render_record_document(records: &[PlainRecord]) -> PatientResult<String> {
    serde_json::to_string(records).map_err(crate::PatientError::Serialization)
}
