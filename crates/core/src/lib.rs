//! # Inflammation Core
//!
//! Core persistence logic for the inflammation patient records system.
//!
//! This crate contains the domain model and format-agnostic storage of patient records:
//! - Patients, doctors and daily inflammation observations ([`models`])
//! - The [`Serializer`] contract with JSON document and CSV row codecs ([`serializers`])
//! - Whole-file, temp-then-rename storage ([`storage`])
//! - Load, change, save operations for a controller ([`PatientService`])
//!
//! **No presentation concerns**: argument parsing and text views belong in `inflammation-cli`;
//! numeric aggregates over inflammation tables live in `inflammation-analysis`.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod serializers;
pub mod service;
pub mod storage;
pub mod validation;

pub use config::{resolve_record_format, CoreConfig, RecordFormat};
pub use error::{FormatError, PatientError, PatientResult};
pub use models::{Doctor, Named, Observation, Patient, Person, SharedPatient};
pub use serializers::{
    ObservationSerializer, PatientCsvSerializer, PatientJsonSerializer, PatientSerializer,
    PlainRecord, Serializer,
};
pub use service::PatientService;
