use crate::{AnalysisError, AnalysisResult};
use ndarray::Array2;
use std::fs::File;
use std::path::Path;

/// Loads a headerless, comma-separated inflammation table.
///
/// Blank lines are skipped. Every other row must have the same number of numeric cells.
///
/// # Errors
///
/// Returns [`AnalysisError`] if:
/// - the file cannot be opened or read,
/// - a cell is not a number (`Type`),
/// - rows have different widths (`Type`).
pub fn load_csv(path: &Path) -> AnalysisResult<Array2<f64>> {
    let file = File::open(path).map_err(|e| {
        AnalysisError::Io(std::io::Error::new(
            e.kind(),
            format!("Failed to open {}: {}", path.display(), e),
        ))
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_owned).collect::<Vec<_>>());
    }

    let table = table_from_rows(&rows)?;
    tracing::debug!(
        "loaded {}x{} inflammation table from {}",
        table.nrows(),
        table.ncols(),
        path.display()
    );
    Ok(table)
}

/// Builds a table from rows of textual cells.
///
/// # Errors
///
/// Returns `AnalysisError::Type` if a cell does not parse as a number or the rows are ragged.
pub fn table_from_rows<R, C>(rows: &[R]) -> AnalysisResult<Array2<f64>>
where
    R: AsRef<[C]>,
    C: AsRef<str>,
{
    let values = rows
        .iter()
        .enumerate()
        .map(|(r, row)| {
            row.as_ref()
                .iter()
                .enumerate()
                .map(|(c, cell)| {
                    let cell = cell.as_ref().trim();
                    cell.parse::<f64>().map_err(|_| {
                        AnalysisError::Type(format!(
                            "cell at row {r}, column {c} is not numeric: {cell:?}"
                        ))
                    })
                })
                .collect::<AnalysisResult<Vec<f64>>>()
        })
        .collect::<AnalysisResult<Vec<Vec<f64>>>>()?;

    table_from_values(values)
}

/// Builds a table from numeric rows.
///
/// # Errors
///
/// Returns `AnalysisError::Type` if the rows do not all have the same length.
pub fn table_from_values(rows: Vec<Vec<f64>>) -> AnalysisResult<Array2<f64>> {
    let nrows = rows.len();
    let ncols = rows.first().map_or(0, Vec::len);

    if let Some((r, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != ncols) {
        return Err(AnalysisError::Type(format!(
            "input is not a 2-D table: row {r} has {} columns, expected {ncols}",
            row.len()
        )));
    }

    let flat: Vec<f64> = rows.into_iter().flatten().collect();
    Array2::from_shape_vec((nrows, ncols), flat)
        .map_err(|e| AnalysisError::Type(format!("input is not a 2-D table: {e}")))
}
