//! Domain model for patients and their inflammation observations.
//!
//! Patients' data is recorded as a sequence of daily observations. A [`Patient`] owns its
//! observations; a [`Doctor`] only holds non-owning references to the patients in their care.
//!
//! Both [`Patient`] and [`Doctor`] embed a [`Person`] rather than extending it, and expose the
//! shared behaviour through the [`Named`] trait.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// A patient shared between several holders, for example doctors' rosters.
pub type SharedPatient = Rc<RefCell<Patient>>;

/// Anything identified by a person's name.
pub trait Named {
    fn name(&self) -> &str;
}

/// A single inflammation measurement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Observation {
    /// Offset in days from the patient's first recorded day.
    pub day: u32,
    /// Measured inflammation level.
    pub value: f64,
}

impl Observation {
    pub fn new(day: u32, value: f64) -> Self {
        Self { day, value }
    }
}

/// A named person. Names are not guaranteed to be unique across a store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Person {
    name: String,
}

impl Person {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Named for Person {
    fn name(&self) -> &str {
        &self.name
    }
}

/// A patient and their observations, in chronological (insertion) order.
///
/// Equality compares names and the full observation sequences: patients whose sequences differ
/// only in length are *not* equal. See [`Patient::observations_share_prefix`] for the looser
/// comparison.
#[derive(Clone, Debug, PartialEq)]
pub struct Patient {
    person: Person,
    observations: Vec<Observation>,
}

impl Patient {
    /// Creates a patient with no observations.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_observations(name, Vec::new())
    }

    /// Creates a patient from an existing observation sequence.
    pub fn with_observations(name: impl Into<String>, observations: Vec<Observation>) -> Self {
        Self {
            person: Person::new(name),
            observations,
        }
    }

    pub fn person(&self) -> &Person {
        &self.person
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// Appends an observation and returns it.
    ///
    /// When `day` is `None` the day follows on from the last observation, or is 0 for a patient
    /// with no observations yet.
    pub fn add_observation(&mut self, value: f64, day: Option<u32>) -> Observation {
        let day = day.unwrap_or_else(|| self.next_day());
        let observation = Observation::new(day, value);
        self.observations.push(observation);
        observation
    }

    fn next_day(&self) -> u32 {
        self.observations
            .last()
            .map_or(0, |last| last.day.saturating_add(1))
    }

    /// Legacy comparison: names match and observations agree pairwise up to the shorter
    /// sequence's length.
    ///
    /// Kept for checking records against data produced by tooling that compared patients this
    /// way. Use `==` for real equality.
    pub fn observations_share_prefix(&self, other: &Patient) -> bool {
        self.name() == other.name()
            && self
                .observations
                .iter()
                .zip(&other.observations)
                .all(|(a, b)| a == b)
    }

    /// Wraps the patient for sharing with doctors' rosters.
    pub fn into_shared(self) -> SharedPatient {
        Rc::new(RefCell::new(self))
    }
}

impl Named for Patient {
    fn name(&self) -> &str {
        self.person.name()
    }
}

/// A doctor and the roster of patients in their care.
///
/// The roster does not own the patients: dropping every strong handle to a patient removes it
/// from [`Doctor::patients`].
#[derive(Clone, Debug)]
pub struct Doctor {
    person: Person,
    patients: Vec<Weak<RefCell<Patient>>>,
}

impl Doctor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            person: Person::new(name),
            patients: Vec::new(),
        }
    }

    pub fn person(&self) -> &Person {
        &self.person
    }

    /// Registers a patient with this doctor. The same patient may be registered with several
    /// doctors.
    pub fn add_patient(&mut self, patient: &SharedPatient) {
        self.patients.push(Rc::downgrade(patient));
    }

    /// Returns the live roster in registration order.
    pub fn patients(&self) -> Vec<SharedPatient> {
        self.patients.iter().filter_map(Weak::upgrade).collect()
    }

    /// Number of live patients on the roster.
    pub fn patient_count(&self) -> usize {
        self.patients.iter().filter(|p| p.strong_count() > 0).count()
    }
}

impl Named for Doctor {
    fn name(&self) -> &str {
        self.person.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_person() {
        let p = Person::new("Alice");
        assert_eq!(p.name(), "Alice");
    }

    #[test]
    fn create_patient() {
        let p = Patient::new("Alice");
        assert_eq!(p.name(), "Alice");
        assert!(p.observations().is_empty());
    }

    #[test]
    fn create_doctor() {
        let d = Doctor::new("Alice");
        assert_eq!(d.name(), "Alice");
        assert!(d.patients().is_empty());
    }

    #[test]
    fn first_observation_defaults_to_day_zero() {
        let mut p = Patient::new("Alice");
        let obs = p.add_observation(3.0, None);
        assert_eq!(obs, Observation::new(0, 3.0));
    }

    #[test]
    fn observation_day_follows_previous() {
        let mut p = Patient::with_observations("Alice", vec![Observation::new(4, 1.0)]);
        let obs = p.add_observation(2.0, None);
        assert_eq!(obs.day, 5);
        assert_eq!(p.observations().len(), 2);
    }

    #[test]
    fn explicit_day_overrides_increment() {
        let mut p = Patient::new("Alice");
        p.add_observation(1.0, None);
        let obs = p.add_observation(2.0, Some(10));
        assert_eq!(obs.day, 10);

        let next = p.add_observation(3.0, None);
        assert_eq!(next.day, 11);
    }

    #[test]
    fn patients_with_different_lengths_are_not_equal() {
        let short = Patient::with_observations("Bob", vec![Observation::new(0, 1.0)]);
        let long = Patient::with_observations(
            "Bob",
            vec![Observation::new(0, 1.0), Observation::new(1, 2.0)],
        );

        assert_ne!(short, long);
        assert!(short.observations_share_prefix(&long));
    }

    #[test]
    fn share_prefix_requires_matching_names_and_values() {
        let a = Patient::with_observations("Bob", vec![Observation::new(0, 1.0)]);
        let b = Patient::with_observations("Bob", vec![Observation::new(0, 2.0)]);
        let c = Patient::with_observations("Carol", vec![Observation::new(0, 1.0)]);

        assert!(!a.observations_share_prefix(&b));
        assert!(!a.observations_share_prefix(&c));
    }

    #[test]
    fn add_patient_to_doctor() {
        let mut d = Doctor::new("Alice");
        let p1 = Patient::new("Bob").into_shared();
        assert_eq!(d.patient_count(), 0);

        d.add_patient(&p1);
        assert_eq!(d.patient_count(), 1);
        assert_eq!(*d.patients()[0].borrow(), *p1.borrow());

        let p2 = Patient::new("Charlie").into_shared();
        d.add_patient(&p2);

        let names: Vec<String> = d
            .patients()
            .iter()
            .map(|p| p.borrow().name().to_string())
            .collect();
        assert_eq!(names, vec!["Bob", "Charlie"]);
    }

    #[test]
    fn shared_patient_is_visible_from_every_doctor() {
        let mut house = Doctor::new("House");
        let mut wilson = Doctor::new("Wilson");
        let patient = Patient::new("Bob").into_shared();

        house.add_patient(&patient);
        wilson.add_patient(&patient);
        patient.borrow_mut().add_observation(7.0, None);

        assert_eq!(house.patients()[0].borrow().observations().len(), 1);
        assert_eq!(wilson.patients()[0].borrow().observations().len(), 1);
    }

    #[test]
    fn roster_does_not_keep_patients_alive() {
        let mut d = Doctor::new("Alice");
        let patient = Patient::new("Bob").into_shared();
        d.add_patient(&patient);
        drop(patient);

        assert_eq!(d.patient_count(), 0);
        assert!(d.patients().is_empty());
    }
}
