//! Plain-text views of patient records and daily aggregates.

use inflammation_core::{Named, Patient};
use ndarray::Array1;

/// Daily aggregate series shown by the `visualize` view.
pub struct DailySummary {
    pub average: Array1<f64>,
    pub max: Array1<f64>,
    pub min: Array1<f64>,
}

pub fn render_summary(summary: &DailySummary) -> String {
    let rows: String = summary
        .average
        .iter()
        .zip(summary.max.iter())
        .zip(summary.min.iter())
        .enumerate()
        .map(|(day, ((avg, max), min))| format!("{day}\t{avg:.2}\t{max:.2}\t{min:.2}\n"))
        .collect();

    format!("day\taverage\tmax\tmin\n{rows}")
}

pub fn render_patient_record(patient: &Patient) -> String {
    if patient.observations().is_empty() {
        return format!("{}\n  no observations\n", patient.name());
    }

    let rows: String = patient
        .observations()
        .iter()
        .map(|obs| format!("  day {:>3}: {}\n", obs.day, obs.value))
        .collect();
    format!("{}\n{rows}", patient.name())
}

pub fn render_patients_list(patients: &[Patient]) -> String {
    if patients.is_empty() {
        return "No patients found.\n".to_string();
    }

    patients
        .iter()
        .map(|patient| {
            format!(
                "{}\t{} observations\n",
                patient.name(),
                patient.observations().len()
            )
        })
        .collect()
}
