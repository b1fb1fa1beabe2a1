/// Malformed input met while decoding plain records, documents or rows.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("record is missing required field `{0}`")]
    MissingField(&'static str),
    #[error("field `{field}` is invalid: {reason}")]
    InvalidField { field: &'static str, reason: String },
    #[error("row {line} has no fields")]
    EmptyRow { line: u64 },
    #[error("malformed document: {0}")]
    MalformedDocument(String),
}

#[derive(Debug, thiserror::Error)]
pub enum PatientError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("patient {0} not found")]
    NotFound(String),
    #[error("format error: {0}")]
    Format(#[from] FormatError),
    #[error("failed to read records file: {0}")]
    FileRead(std::io::Error),
    #[error("failed to write records file: {0}")]
    FileWrite(std::io::Error),
    #[error("failed to serialize records: {0}")]
    Serialization(serde_json::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl PatientError {
    /// True when the error came from malformed input rather than I/O or a lookup.
    pub fn is_format(&self) -> bool {
        matches!(self, PatientError::Format(_))
    }
}

pub type PatientResult<T> = std::result::Result<T, PatientError>;
