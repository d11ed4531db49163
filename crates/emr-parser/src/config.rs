//! Parsing configuration
//!
//! `RecordCodecConfig` controls line-level lexing: delimiter, comment
//! prefix, and which source tables are read at all. `ParseConfig` holds
//! two record-level hooks, a filter and a rewrite, applied in that order
//! after a record is parsed and before it is grouped into a sequence.

use std::collections::HashSet;

use emr_core::event::Table;

use crate::record::Record;

/// Line-level lexing options for [`crate::record::RecordReader`].
#[derive(Debug, Clone)]
pub struct RecordCodecConfig {
    pub delimiter: char,
    pub comment_prefix: char,
    pub include_tables: HashSet<Table>,
}

impl Default for RecordCodecConfig {
    fn default() -> Self {
        RecordCodecConfig {
            delimiter: '|',
            comment_prefix: '#',
            include_tables: Table::all().iter().cloned().collect(),
        }
    }
}

/// Record-level filtering and rewriting hooks.
#[derive(Default)]
pub struct ParseConfig {
    pub include_record: Option<Box<dyn Fn(&Record) -> bool>>,
    pub record_transformer: Option<Box<dyn Fn(Record) -> Record>>,
}

impl ParseConfig {
    pub fn new() -> Self {
        ParseConfig::default()
    }

    pub fn include_record(mut self, f: impl Fn(&Record) -> bool + 'static) -> Self {
        self.include_record = Some(Box::new(f));
        self
    }

    pub fn record_transformer(mut self, f: impl Fn(Record) -> Record + 'static) -> Self {
        self.record_transformer = Some(Box::new(f));
        self
    }

    /// Applies `include_record` then `record_transformer`, mirroring
    /// `read_records`'s filter-then-transform order. Returns `None` when
    /// the record is filtered out.
    pub(crate) fn apply(&self, record: Record) -> Option<Record> {
        if let Some(pred) = &self.include_record {
            if !pred(&record) {
                return None;
            }
        }
        Some(match &self.record_transformer {
            Some(f) => f(record),
            None => record,
        })
    }
}

impl std::fmt::Debug for ParseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParseConfig")
            .field("include_record", &self.include_record.is_some())
            .field("record_transformer", &self.record_transformer.is_some())
            .finish()
    }
}
