//! Streaming reader for pipe-delimited EMR event records
//!
//! This crate turns a line-oriented record stream into event sequences,
//! one per patient: [`record::RecordReader`] lexes and types each line,
//! and [`group::group_into_sequences`] groups the resulting records by
//! id and splits them into facts and time-stamped events.

pub mod config;
pub mod group;
pub mod record;

pub use config::{ParseConfig, RecordCodecConfig};
pub use group::group_into_sequences;
pub use record::{Record, RecordReader};
