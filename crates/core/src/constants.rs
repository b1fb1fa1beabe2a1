//! Constants used throughout the inflammation core crate.

/// Field name of a patient's name in a plain record.
pub const NAME_FIELD: &str = "name";

/// Field name of a patient's observation list in a plain record.
pub const OBSERVATIONS_FIELD: &str = "observations";

/// Field name of an observation's day in a plain record.
pub const DAY_FIELD: &str = "day";

/// Field name of an observation's value in a plain record.
pub const VALUE_FIELD: &str = "value";

/// Environment variable naming the default record format (`json` or `csv`).
pub const SERIALIZER_ENV_VAR: &str = "INFLAMMATION_SERIALIZER";

/// Longest patient name accepted by the controller-facing operations.
pub const MAX_PATIENT_NAME_LEN: usize = 256;
