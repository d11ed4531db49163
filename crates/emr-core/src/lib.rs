//! Core data structures and types for EMR survival-data processing
//!
//! This crate provides the foundational types used throughout the
//! pipeline:
//! - Dates and closed-closed intervals over dates
//! - The typed scalar ("atom") carried by record `typ`/`val` columns
//! - The event / fact / event-sequence model
//! - Error types shared by every downstream crate

pub mod date;
pub mod error;
pub mod event;
pub mod interval;
pub mod scalar;
pub mod sequence;

pub use date::Date;
pub use error::{Error, Result};
pub use event::{Event, EventType, Table, TypeKey};
pub use interval::Interval;
pub use scalar::Scalar;
pub use sequence::EventSequence;
