//! Pipeline configuration
//!
//! `SurvivalPipelineConfig` bundles the callbacks and knobs the driver
//! needs: the exposure/outcome type maps, era-aggregation gap, an
//! optional study-period definer, and an optional feature-vector
//! function. Built through `SurvivalPipelineConfigBuilder`: named
//! setters consuming and returning `Self`, with the two file-reading
//! setters returning `Result<Self>` since they do I/O at call time.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use emr_core::error::{Error, Result};
use emr_core::event::{EventType, Table, TypeKey};
use emr_core::scalar::Scalar;
use emr_core::sequence::EventSequence;
use emr_parser::config::RecordCodecConfig;
use emr_parser::record::Record;
use emr_survival::clip_to_study_period;

use crate::transform::{default_include_record, default_record_transformer};

/// Reads one `tbl|typ` per line: comments (`#`-prefixed) and blank
/// lines are skipped, an empty `typ` parses to `TypeKey::Absent`. A
/// `tbl` the record codec doesn't recognize still loads (via
/// [`Table::parse_any`]) rather than failing the whole file; it simply
/// never matches any event, since the codec never produces one.
pub fn read_event_type_file(path: impl AsRef<Path>, delimiter: char) -> Result<Vec<EventType>> {
    let file = File::open(path.as_ref()).map_err(Error::Io)?;
    let mut out = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line.map_err(Error::Io)?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut parts = line.splitn(2, delimiter);
        let tbl_str = parts.next().unwrap_or("");
        let typ_str = parts.next().unwrap_or("");
        let tbl = Table::parse_any(tbl_str);
        let typ = TypeKey::from(&Scalar::atom(typ_str));
        out.push(EventType::new(tbl, typ));
    }
    Ok(out)
}

/// Tag identifying which side of the exposure/outcome split a mapped
/// event type belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventRole {
    Exposure,
    Outcome,
}

impl EventRole {
    pub fn synthetic_name(self) -> &'static str {
        match self {
            EventRole::Exposure => "exp",
            EventRole::Outcome => "out",
        }
    }
}

/// Builds the `EventType -> synthetic EventType` map used by
/// [`crate::mapping::map_event_types`]. When a type appears in both
/// lists, the outcome mapping wins (outcomes are inserted last).
pub fn build_event_type_map(
    exposure_types: &[EventType],
    outcome_types: &[EventType],
) -> HashMap<EventType, EventType> {
    let mut map = HashMap::new();
    for ty in exposure_types {
        map.insert(ty.clone(), EventType::synthetic(EventRole::Exposure.synthetic_name()));
    }
    for ty in outcome_types {
        map.insert(ty.clone(), EventType::synthetic(EventRole::Outcome.synthetic_name()));
    }
    map
}

/// Callback-heavy configuration for [`crate::driver::run_pipeline`].
pub struct SurvivalPipelineConfig {
    pub record_codec: RecordCodecConfig,
    pub exposure_types: Vec<EventType>,
    pub outcome_types: Vec<EventType>,
    pub era_max_gap_days: i64,
    pub replace_mapped_events: bool,
    pub include_record: Option<Box<dyn Fn(&Record) -> bool>>,
    pub record_transformer: Option<Box<dyn Fn(Record) -> Record>>,
    pub study_period_definer: Option<Box<dyn Fn(&EventSequence) -> EventSequence>>,
    pub feature_vector_fn: Option<Box<dyn Fn(&EventSequence) -> Vec<Scalar>>>,
    pub feature_vector_header: Vec<String>,
}

impl SurvivalPipelineConfig {
    pub fn builder() -> SurvivalPipelineConfigBuilder {
        SurvivalPipelineConfigBuilder::default()
    }

    pub(crate) fn event_type_map(&self) -> HashMap<EventType, EventType> {
        build_event_type_map(&self.exposure_types, &self.outcome_types)
    }
}

pub struct SurvivalPipelineConfigBuilder {
    record_codec: RecordCodecConfig,
    exposure_types: Vec<EventType>,
    outcome_types: Vec<EventType>,
    era_max_gap_days: i64,
    replace_mapped_events: bool,
    min_age: Option<f64>,
    max_age: Option<f64>,
    include_record: Option<Box<dyn Fn(&Record) -> bool>>,
    record_transformer: Option<Box<dyn Fn(Record) -> Record>>,
    feature_vector_fn: Option<Box<dyn Fn(&EventSequence) -> Vec<Scalar>>>,
    feature_vector_header: Vec<String>,
}

/// Defaults to the recommended (but optional) `include_record`/
/// `record_transformer` hooks rather than a bare passthrough; call
/// `.raw_records()` to disable both.
impl Default for SurvivalPipelineConfigBuilder {
    fn default() -> Self {
        SurvivalPipelineConfigBuilder {
            record_codec: RecordCodecConfig::default(),
            exposure_types: Vec::new(),
            outcome_types: Vec::new(),
            era_max_gap_days: 0,
            replace_mapped_events: false,
            min_age: None,
            max_age: None,
            include_record: Some(Box::new(default_include_record)),
            record_transformer: Some(Box::new(default_record_transformer)),
            feature_vector_fn: None,
            feature_vector_header: Vec::new(),
        }
    }
}

impl SurvivalPipelineConfigBuilder {
    pub fn exposures_file(mut self, path: impl AsRef<Path>) -> Result<Self> {
        self.exposure_types = read_event_type_file(path, self.record_codec.delimiter)?;
        Ok(self)
    }

    pub fn outcomes_file(mut self, path: impl AsRef<Path>) -> Result<Self> {
        self.outcome_types = read_event_type_file(path, self.record_codec.delimiter)?;
        Ok(self)
    }

    pub fn era_max_gap_days(mut self, days: i64) -> Self {
        self.era_max_gap_days = days;
        self
    }

    pub fn replace_mapped_events(mut self, replace: bool) -> Self {
        self.replace_mapped_events = replace;
        self
    }

    pub fn min_age(mut self, years: f64) -> Self {
        self.min_age = Some(years);
        self
    }

    pub fn max_age(mut self, years: f64) -> Self {
        self.max_age = Some(years);
        self
    }

    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.record_codec.delimiter = delimiter;
        self
    }

    pub fn comment_prefix(mut self, comment_prefix: char) -> Self {
        self.record_codec.comment_prefix = comment_prefix;
        self
    }

    pub fn record_codec(mut self, record_codec: RecordCodecConfig) -> Self {
        self.record_codec = record_codec;
        self
    }

    pub fn feature_vector(
        mut self,
        header: Vec<String>,
        f: impl Fn(&EventSequence) -> Vec<Scalar> + 'static,
    ) -> Self {
        self.feature_vector_header = header;
        self.feature_vector_fn = Some(Box::new(f));
        self
    }

    pub fn include_record(mut self, f: impl Fn(&Record) -> bool + 'static) -> Self {
        self.include_record = Some(Box::new(f));
        self
    }

    pub fn record_transformer(mut self, f: impl Fn(Record) -> Record + 'static) -> Self {
        self.record_transformer = Some(Box::new(f));
        self
    }

    /// Disables the default `include_record`/`record_transformer` hooks,
    /// passing every recognized record through unchanged.
    pub fn raw_records(mut self) -> Self {
        self.include_record = None;
        self.record_transformer = None;
        self
    }

    pub fn build(self) -> SurvivalPipelineConfig {
        let (min_age, max_age) = (self.min_age, self.max_age);
        let study_period_definer: Option<Box<dyn Fn(&EventSequence) -> EventSequence>> =
            if min_age.is_some() || max_age.is_some() {
                Some(Box::new(move |seq: &EventSequence| clip_to_study_period(seq, min_age, max_age)))
            } else {
                None
            };
        SurvivalPipelineConfig {
            record_codec: self.record_codec,
            exposure_types: self.exposure_types,
            outcome_types: self.outcome_types,
            era_max_gap_days: self.era_max_gap_days,
            replace_mapped_events: self.replace_mapped_events,
            include_record: self.include_record,
            record_transformer: self.record_transformer,
            study_period_definer,
            feature_vector_fn: self.feature_vector_fn,
            feature_vector_header: self.feature_vector_header,
        }
    }
}
