//! # emr-survival-data
//!
//! Turns a stream of longitudinal EMR events into a tabular dataset
//! suitable for survival analysis.
//!
//! Given per-patient records (demographics, diagnoses, measurements,
//! prescriptions, visits, procedures, deaths) and two user-supplied
//! lists of "exposure" and "outcome" event types, the pipeline emits
//! one row per time interval during which a patient's exposure and
//! outcome status is constant, ending at either the first occurrence
//! of the outcome or the end of the patient's record.
//!
//! ## Quick start
//!
//! ```no_run
//! use std::fs::File;
//! use std::io::{BufReader, stdout};
//! use emr_survival_data::pipeline::{SurvivalPipelineConfig, run_pipeline};
//!
//! let input = BufReader::new(File::open("events.psv").unwrap());
//! let config = SurvivalPipelineConfig::builder()
//!     .exposures_file("exposures.psv").unwrap()
//!     .outcomes_file("outcomes.psv").unwrap()
//!     .build();
//! run_pipeline(input, &config, stdout()).unwrap();
//! ```

pub use emr_core as core;
pub use emr_parser as parser;
pub use emr_pipeline as pipeline;
pub use emr_survival as survival;

pub use emr_core::{
    date::Date,
    error::{Error, Result},
    event::{Event, EventType, Table},
    interval::Interval,
    scalar::Scalar,
    sequence::EventSequence,
};
pub use emr_pipeline::{run_pipeline, SurvivalPipelineConfig};
