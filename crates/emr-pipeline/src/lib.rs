//! Driver and output codec for the survival-data pipeline
//!
//! [`config`] builds a [`SurvivalPipelineConfig`] from exposure/outcome
//! type files and the knobs the CLI exposes; [`transform`] holds its
//! default record-level filter/rewrite hooks; [`mapping`] folds matched
//! events into the `exp`/`out` type families; [`driver::run_pipeline`]
//! wires the record codec, grouper, and `emr-survival` stages together;
//! [`output`] renders the resulting rows.

pub mod config;
pub mod driver;
pub mod mapping;
pub mod output;
pub mod transform;

pub use config::{build_event_type_map, read_event_type_file, EventRole, SurvivalPipelineConfig};
pub use driver::{run_pipeline, PipelineStats};
pub use mapping::map_event_types;
pub use output::{write_example, write_header};
pub use transform::{default_include_record, default_record_transformer};
