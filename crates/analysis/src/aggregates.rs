use crate::{AnalysisError, AnalysisResult};
use ndarray::{Array1, Array2, ArrayBase, Axis, Data, Ix2};

/// Mean inflammation per day across all patients.
///
/// # Errors
///
/// Returns `AnalysisError::Empty` if the table has no rows.
pub fn daily_mean<S>(data: &ArrayBase<S, Ix2>) -> AnalysisResult<Array1<f64>>
where
    S: Data<Elem = f64>,
{
    data.mean_axis(Axis(0)).ok_or(AnalysisError::Empty)
}

/// Maximum inflammation per day across all patients. NaN cells propagate.
///
/// # Errors
///
/// Returns `AnalysisError::Empty` if the table has no rows.
pub fn daily_max<S>(data: &ArrayBase<S, Ix2>) -> AnalysisResult<Array1<f64>>
where
    S: Data<Elem = f64>,
{
    fold_days(data, f64::NEG_INFINITY, f64::max)
}

/// Minimum inflammation per day across all patients. NaN cells propagate.
///
/// # Errors
///
/// Returns `AnalysisError::Empty` if the table has no rows.
pub fn daily_min<S>(data: &ArrayBase<S, Ix2>) -> AnalysisResult<Array1<f64>>
where
    S: Data<Elem = f64>,
{
    fold_days(data, f64::INFINITY, f64::min)
}

fn fold_days<S>(
    data: &ArrayBase<S, Ix2>,
    init: f64,
    pick: fn(f64, f64) -> f64,
) -> AnalysisResult<Array1<f64>>
where
    S: Data<Elem = f64>,
{
    if data.nrows() == 0 {
        return Err(AnalysisError::Empty);
    }

    Ok(data.fold_axis(Axis(0), init, |&acc, &x| {
        if acc.is_nan() || x.is_nan() {
            f64::NAN
        } else {
            pick(acc, x)
        }
    }))
}

/// Scales each patient's row by that row's maximum.
///
/// NaN cells are ignored when finding the maximum, and any NaN result (including rows that are
/// all zero or all NaN) becomes 0. Negative results are clamped to 0.
///
/// # Errors
///
/// Returns `AnalysisError::Value` if any cell is negative.
pub fn patient_normalise<S>(data: &ArrayBase<S, Ix2>) -> AnalysisResult<Array2<f64>>
where
    S: Data<Elem = f64>,
{
    if data.iter().any(|&x| x < 0.0) {
        return Err(AnalysisError::Value(
            "inflammation values should not be negative".into(),
        ));
    }

    let mut normalised = data.to_owned();
    for mut row in normalised.rows_mut() {
        let max = row
            .iter()
            .copied()
            .filter(|x| !x.is_nan())
            .fold(f64::NAN, f64::max);

        row.mapv_inplace(|x| {
            let scaled = x / max;
            if scaled.is_nan() || scaled < 0.0 {
                0.0
            } else {
                scaled
            }
        });
    }

    Ok(normalised)
}
