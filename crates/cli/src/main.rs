//! Controller for the inflammation patient records system.
//!
//! Selects the model operation and the view for each input file and passes data between them.
//!
//! # Environment Variables
//! - `INFLAMMATION_SERIALIZER`: record format (`json` or `csv`) when `--serializer` is not given
//! - `RUST_LOG`: log filter, on top of the default `inflammation=info`

mod views;

use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use inflammation_analysis::{daily_max, daily_mean, daily_min, load_csv};
use inflammation_core::constants::SERIALIZER_ENV_VAR;
use inflammation_core::{
    resolve_record_format, CoreConfig, Observation, Patient, PatientCsvSerializer,
    PatientJsonSerializer, PatientService, RecordFormat, Serializer,
};
use ndarray::Array2;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use views::DailySummary;

#[derive(Parser, Debug)]
#[command(name = "inflammation")]
#[command(about = "A basic patient inflammation data management system")]
struct Cli {
    /// Input file(s): inflammation tables, or patient records for the record views
    #[arg(required = true)]
    infiles: Vec<PathBuf>,

    /// Which view should be used?
    #[arg(long, value_enum, default_value_t = View::Visualize)]
    view: View,

    /// Which patient row should be displayed by the record view?
    #[arg(long, default_value_t = 0)]
    patient: usize,

    /// Name of the patient to create or update
    #[arg(long)]
    patientname: Option<String>,

    /// Value of the observation to add
    #[arg(long)]
    observation: Option<f64>,

    /// Day of the observation to add (defaults to the day after the last one)
    #[arg(long)]
    day: Option<u32>,

    /// Which serializer should be used for patient records?
    #[arg(long, value_enum)]
    serializer: Option<SerializerArg>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum View {
    Visualize,
    Record,
    ListPatients,
    NewPatient,
    NewObservation,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum SerializerArg {
    Json,
    Csv,
}

impl From<SerializerArg> for RecordFormat {
    fn from(arg: SerializerArg) -> Self {
        match arg {
            SerializerArg::Json => RecordFormat::Json,
            SerializerArg::Csv => RecordFormat::Csv,
        }
    }
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("inflammation=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    for infile in &cli.infiles {
        match cli.view {
            View::Visualize => visualize(infile)?,
            View::Record => show_record(infile, cli.patient)?,
            View::ListPatients | View::NewPatient | View::NewObservation => {
                let cfg = resolve_config(&cli, infile)?;
                match cfg.format() {
                    RecordFormat::Json => manage_records(
                        &PatientService::<PatientJsonSerializer>::new(cfg.records_path()),
                        &cli,
                    )?,
                    RecordFormat::Csv => manage_records(
                        &PatientService::<PatientCsvSerializer>::new(cfg.records_path()),
                        &cli,
                    )?,
                }
            }
        }
    }

    Ok(())
}

fn resolve_config(cli: &Cli, infile: &Path) -> anyhow::Result<CoreConfig> {
    let format = match cli.serializer {
        Some(arg) => arg.into(),
        None => resolve_record_format(std::env::var(SERIALIZER_ENV_VAR).ok(), infile)?,
    };
    tracing::debug!("using {} records for {}", format, infile.display());

    Ok(CoreConfig::new(infile.to_path_buf(), format)?)
}

fn visualize(infile: &Path) -> anyhow::Result<()> {
    let data = load_table(infile)?;
    let summary = DailySummary {
        average: daily_mean(&data)?,
        max: daily_max(&data)?,
        min: daily_min(&data)?,
    };

    print!("{}", views::render_summary(&summary));
    Ok(())
}

fn show_record(infile: &Path, row: usize) -> anyhow::Result<()> {
    let data = load_table(infile)?;
    let patient = patient_from_row(&data, row)?;

    print!("{}", views::render_patient_record(&patient));
    Ok(())
}

fn load_table(infile: &Path) -> anyhow::Result<Array2<f64>> {
    load_csv(infile).with_context(|| format!("loading inflammation data {}", infile.display()))
}

/// Builds an anonymous patient from one row of an inflammation table, one observation per day.
fn patient_from_row(data: &Array2<f64>, row: usize) -> anyhow::Result<Patient> {
    if row >= data.nrows() {
        bail!(
            "patient row {row} is out of range: table has {} patients",
            data.nrows()
        );
    }

    let observations = data
        .row(row)
        .iter()
        .enumerate()
        .map(|(day, &value)| Ok(Observation::new(u32::try_from(day)?, value)))
        .collect::<anyhow::Result<Vec<_>>>()?;

    Ok(Patient::with_observations("UNKNOWN", observations))
}

fn manage_records<S>(service: &PatientService<S>, cli: &Cli) -> anyhow::Result<()>
where
    S: Serializer<Instance = Patient>,
{
    let path = service.records_path().display();

    match cli.view {
        View::ListPatients => {
            let patients = service
                .load()
                .with_context(|| format!("loading patient records {path}"))?;
            print!("{}", views::render_patients_list(&patients));
        }
        View::NewPatient => {
            let Some(name) = cli.patientname.as_deref() else {
                bail!("--patientname is required for the new-patient view");
            };
            let patients = service
                .add_patient(name)
                .with_context(|| format!("adding patient to {path}"))?;
            print!("{}", views::render_patients_list(&patients));
        }
        View::NewObservation => {
            let (Some(name), Some(value)) = (cli.patientname.as_deref(), cli.observation) else {
                bail!("--patientname and --observation are required for the new-observation view");
            };
            let updated = service
                .add_observation(name, value, cli.day)
                .with_context(|| format!("adding observation to {path}"))?;
            for patient in &updated {
                print!("{}", views::render_patient_record(patient));
            }
        }
        View::Visualize | View::Record => {
            unreachable!("table views do not read patient records")
        }
    }

    Ok(())
}
