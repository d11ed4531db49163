//! Drug-duration inference, era aggregation, and the survival-example
//! generator
//!
//! This crate turns a parsed [`emr_core::sequence::EventSequence`] into
//! survival-analysis rows:
//! - [`drugduration`] fills in missing drug-interval ends
//! - [`era`] merges nearby same-family events into eras
//! - [`studyperiod`] clips a sequence to a DOB-relative age window
//! - [`transitions`] enumerates exposure/outcome state changes
//! - [`generator`] walks those transitions into [`generator::Example`] rows
//! - [`featurevec`] builds the feature-vector closures the generator calls

pub mod drugduration;
pub mod era;
pub mod featurevec;
pub mod generator;
pub mod studyperiod;
pub mod transitions;

pub use drugduration::{corrected_hi, infer_days_supply};
pub use era::make_eras;
pub use featurevec::{mk_event_count_feature, mk_fact_feature, mk_feature_vector_function, mk_has_event_feature};
pub use generator::{examples_from_transitions, survival_examples, truncate_to_first_outcome, Example, FeatureVectorFn};
pub use studyperiod::clip_to_study_period;
pub use transitions::{transitions, Transition};
