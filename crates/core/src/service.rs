//! Patient service and related types.
//!
//! [`PatientService`] is the controller-facing surface of the records store: it loads a
//! collection through a codec, applies one change, and saves the collection back. The codec is a
//! type parameter, so the format is fixed where the service is constructed.

use crate::models::{Named, Patient};
use crate::serializers::Serializer;
use crate::validation::validate_patient_name;
use crate::{PatientError, PatientResult};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

/// Pure patient record operations against one records file.
pub struct PatientService<S> {
    records_path: PathBuf,
    codec: PhantomData<S>,
}

impl<S> PatientService<S>
where
    S: Serializer<Instance = Patient>,
{
    /// Creates a service bound to `records_path`. No I/O happens until an operation runs.
    pub fn new(records_path: impl Into<PathBuf>) -> Self {
        Self {
            records_path: records_path.into(),
            codec: PhantomData,
        }
    }

    pub fn records_path(&self) -> &Path {
        &self.records_path
    }

    /// Loads every patient from the records file.
    ///
    /// # Errors
    ///
    /// Returns `PatientError::FileRead` if the file cannot be read, or `PatientError::Format`
    /// if its content does not decode.
    pub fn load(&self) -> PatientResult<Vec<Patient>> {
        S::load(&self.records_path)
    }

    /// Replaces the records file with `patients`.
    pub fn save(&self, patients: &[Patient]) -> PatientResult<()> {
        S::save(patients, &self.records_path)
    }

    /// Finds the first patient called `name`.
    ///
    /// # Errors
    ///
    /// Returns `PatientError::NotFound` if no patient has that name.
    pub fn find<'a>(patients: &'a [Patient], name: &str) -> PatientResult<&'a Patient> {
        patients
            .iter()
            .find(|p| p.name() == name)
            .ok_or_else(|| PatientError::NotFound(name.to_string()))
    }

    /// Appends a new patient without observations and saves the collection.
    ///
    /// # Returns
    ///
    /// The updated collection, as written.
    ///
    /// # Errors
    ///
    /// Returns `PatientError::InvalidInput` for an unusable name, or any load/save error.
    pub fn add_patient(&self, name: &str) -> PatientResult<Vec<Patient>> {
        let name = validate_patient_name(name)?;
        let mut patients = self.load()?;

        patients.push(Patient::new(name));
        self.save(&patients)?;

        tracing::info!("added patient {} to {}", name, self.records_path.display());
        Ok(patients)
    }

    /// Records an observation for every patient called `name` and saves the collection.
    ///
    /// Names are not unique, so each matching patient receives the observation. When `day` is
    /// `None` each patient's day follows on from their own last observation.
    ///
    /// # Returns
    ///
    /// The updated patients, in collection order.
    ///
    /// # Errors
    ///
    /// Returns `PatientError::NotFound` before anything is written if no patient has that name.
    pub fn add_observation(
        &self,
        name: &str,
        value: f64,
        day: Option<u32>,
    ) -> PatientResult<Vec<Patient>> {
        let mut patients = self.load()?;
        Self::find(&patients, name)?;

        let mut updated = Vec::new();
        for patient in patients.iter_mut().filter(|p| p.name() == name) {
            let observation = patient.add_observation(value, day);
            tracing::debug!(
                "recorded day {} value {} for {}",
                observation.day,
                observation.value,
                name
            );
            updated.push(patient.clone());
        }

        self.save(&patients)?;
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Observation;
    use crate::serializers::{PatientCsvSerializer, PatientJsonSerializer};
    use std::fs;
    use tempfile::TempDir;

    fn seeded<S: Serializer<Instance = Patient>>(
        temp: &TempDir,
        file_name: &str,
    ) -> PatientService<S> {
        let service = PatientService::<S>::new(temp.path().join(file_name));
        let patients = vec![
            Patient::with_observations(
                "Alice",
                vec![Observation::new(0, 1.0), Observation::new(4, 2.0)],
            ),
            Patient::new("Bob"),
        ];
        service.save(&patients).expect("seed records");
        service
    }

    #[test]
    fn find_returns_matching_patient() {
        let patients = vec![Patient::new("Alice"), Patient::new("Bob")];
        let found = PatientService::<PatientJsonSerializer>::find(&patients, "Bob").unwrap();
        assert_eq!(found.name(), "Bob");
    }

    #[test]
    fn find_missing_patient_is_not_found() {
        let patients = vec![Patient::new("Alice")];
        let before = patients.clone();

        let err = PatientService::<PatientJsonSerializer>::find(&patients, "Zed").unwrap_err();

        assert!(matches!(err, PatientError::NotFound(ref name) if name == "Zed"));
        assert_eq!(patients, before);
    }

    #[test]
    fn add_patient_appends_and_saves() {
        let temp = TempDir::new().unwrap();
        let service = seeded::<PatientJsonSerializer>(&temp, "patients.json");

        let patients = service.add_patient("  Carol ").unwrap();

        assert_eq!(patients.len(), 3);
        assert_eq!(patients[2], Patient::new("Carol"));
        assert_eq!(service.load().unwrap(), patients);
    }

    #[test]
    fn add_patient_rejects_blank_name_without_writing() {
        let temp = TempDir::new().unwrap();
        let service = seeded::<PatientCsvSerializer>(&temp, "patients.csv");
        let before = fs::read(service.records_path()).unwrap();

        let err = service.add_patient("   ").unwrap_err();

        assert!(matches!(err, PatientError::InvalidInput(_)));
        assert_eq!(fs::read(service.records_path()).unwrap(), before);
    }

    #[test]
    fn add_observation_continues_from_last_day() {
        let temp = TempDir::new().unwrap();
        let service = seeded::<PatientJsonSerializer>(&temp, "patients.json");

        let updated = service.add_observation("Alice", 3.5, None).unwrap();

        assert_eq!(updated.len(), 1);
        assert_eq!(updated[0].observations().last(), Some(&Observation::new(5, 3.5)));

        let reloaded = service.load().unwrap();
        assert_eq!(reloaded[0], updated[0]);
    }

    #[test]
    fn add_first_observation_starts_at_day_zero() {
        let temp = TempDir::new().unwrap();
        let service = seeded::<PatientCsvSerializer>(&temp, "patients.csv");

        let updated = service.add_observation("Bob", 6.0, None).unwrap();

        assert_eq!(updated[0].observations(), &[Observation::new(0, 6.0)]);
        assert_eq!(
            fs::read_to_string(service.records_path()).unwrap(),
            "Alice,0,1,4,2\nBob,0,6\n"
        );
    }

    #[test]
    fn add_observation_with_explicit_day() {
        let temp = TempDir::new().unwrap();
        let service = seeded::<PatientJsonSerializer>(&temp, "patients.json");

        let updated = service.add_observation("Bob", 2.0, Some(9)).unwrap();

        assert_eq!(updated[0].observations(), &[Observation::new(9, 2.0)]);
    }

    #[test]
    fn add_observation_updates_every_namesake() {
        let temp = TempDir::new().unwrap();
        let service = PatientService::<PatientJsonSerializer>::new(temp.path().join("p.json"));
        service
            .save(&[
                Patient::new("Sam"),
                Patient::new("Kim"),
                Patient::with_observations("Sam", vec![Observation::new(2, 1.0)]),
            ])
            .unwrap();

        let updated = service.add_observation("Sam", 4.0, None).unwrap();

        assert_eq!(updated.len(), 2);
        assert_eq!(updated[0].observations(), &[Observation::new(0, 4.0)]);
        assert_eq!(
            updated[1].observations(),
            &[Observation::new(2, 1.0), Observation::new(3, 4.0)]
        );
        assert!(service.load().unwrap()[1].observations().is_empty());
    }

    #[test]
    fn add_observation_for_unknown_patient_leaves_file_untouched() {
        let temp = TempDir::new().unwrap();
        let service = seeded::<PatientJsonSerializer>(&temp, "patients.json");
        let before = fs::read(service.records_path()).unwrap();

        let err = service.add_observation("Nobody", 1.0, None).unwrap_err();

        assert!(matches!(err, PatientError::NotFound(_)));
        assert_eq!(fs::read(service.records_path()).unwrap(), before);
    }

    #[test]
    fn load_missing_file_is_read_error() {
        let temp = TempDir::new().unwrap();
        let service = PatientService::<PatientCsvSerializer>::new(temp.path().join("none.csv"));

        assert!(matches!(service.load(), Err(PatientError::FileRead(_))));
    }
}
