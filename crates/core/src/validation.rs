//! Input validation utilities.
//!
//! Checks applied to user input before it reaches the records file.

use crate::constants::MAX_PATIENT_NAME_LEN;
use crate::{PatientError, PatientResult};

/// Validates a patient name supplied by a caller and returns it trimmed.
///
/// - Rejects empty or whitespace-only names
/// - Bounds the length
/// - Rejects control characters such as newlines, which would split a flat-row record
///
/// # Errors
///
/// Returns a `PatientError::InvalidInput` if the name is invalid.
pub fn validate_patient_name(name: &str) -> PatientResult<&str> {
    let name = name.trim();

    if name.is_empty() {
        return Err(PatientError::InvalidInput(
            "patient name cannot be empty".into(),
        ));
    }

    if name.chars().count() > MAX_PATIENT_NAME_LEN {
        return Err(PatientError::InvalidInput(format!(
            "patient name exceeds maximum length of {} characters",
            MAX_PATIENT_NAME_LEN
        )));
    }

    if name.chars().any(char::is_control) {
        return Err(PatientError::InvalidInput(
            "patient name must not contain control characters".into(),
        ));
    }

    Ok(name)
}
