//! Numeric analysis of inflammation tables.
//!
//! An inflammation table is a 2-D array where each row holds one patient's measurements and
//! each column holds one day across all patients. The functions here are pure transforms over
//! such tables:
//!
//! - [`daily_mean`], [`daily_max`], [`daily_min`]: one value per day (column)
//! - [`patient_normalise`]: each patient's row scaled into `[0, 1]`
//!
//! Tables are read from headerless comma-separated files with [`load_csv`], or built from
//! untyped rows with [`table_from_rows`].

mod aggregates;
mod table;

pub use aggregates::{daily_max, daily_mean, daily_min, patient_normalise};
pub use table::{load_csv, table_from_rows, table_from_values};

/// Errors returned by the analysis functions.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// Input is not a numeric 2-D table.
    #[error("type error: {0}")]
    Type(String),

    /// Input is numeric but outside the accepted range.
    #[error("value error: {0}")]
    Value(String),

    /// The table has no patient rows to aggregate.
    #[error("inflammation table has no patients")]
    Empty,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Type alias for Results that can fail with an [`AnalysisError`].
pub type AnalysisResult<T> = Result<T, AnalysisError>;
