//! Event and event-type model
//!
//! An event is `(when, type, value)`; a fact is an event with no time
//! interval, representing a time-independent per-patient attribute.

use std::fmt;

use serde_json::Value as Json;

use crate::interval::Interval;
use crate::scalar::Scalar;

/// The source tables a record can come from: eight fixed tables, one
/// synthetic table for pipeline-internal markers, and an opaque
/// fallback for names outside that set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Table {
    /// Biographic / demographic facts
    Bx,
    /// Diagnosis / condition events
    Dx,
    /// Measurement / lab / vitals events
    Mx,
    /// Observation events
    Ox,
    /// Procedure events
    Px,
    /// Prescription / drug events
    Rx,
    /// Visits
    Vx,
    /// Deaths
    Xx,
    /// A synthetic table for pipeline-internal pseudo-events that name no
    /// source table: mapped exposure/outcome markers (`exp`/`out`) and
    /// study-period boundary markers (`lo`/`hi`).
    Synthetic,
    /// A table name outside the fixed set above. Exposure/outcome type
    /// files may name a table the record codec doesn't recognize (a
    /// typo, a retired table); this variant lets such a line load
    /// without error while still never matching any event the record
    /// codec actually produces, since [`Table::from_str`] (the codec's
    /// own parser) never constructs it.
    Other(String),
}

impl Table {
    pub fn as_str(&self) -> &str {
        match self {
            Table::Bx => "bx",
            Table::Dx => "dx",
            Table::Mx => "mx",
            Table::Ox => "ox",
            Table::Px => "px",
            Table::Rx => "rx",
            Table::Vx => "vx",
            Table::Xx => "xx",
            Table::Synthetic => "synthetic",
            Table::Other(s) => s,
        }
    }

    /// Recognizes only the eight fixed source tables; used by the record
    /// codec to decide whether a record's `tbl` column names a table it
    /// understands at all.
    pub fn from_str(s: &str) -> Option<Table> {
        Some(match s {
            "bx" => Table::Bx,
            "dx" => Table::Dx,
            "mx" => Table::Mx,
            "ox" => Table::Ox,
            "px" => Table::Px,
            "rx" => Table::Rx,
            "vx" => Table::Vx,
            "xx" => Table::Xx,
            _ => return None,
        })
    }

    /// Parses any table name, falling back to [`Table::Other`] for
    /// strings outside the fixed set rather than failing. Used when
    /// reading exposure/outcome type files, where a table name that the
    /// record codec will never actually produce should simply never
    /// match, not abort the whole file.
    pub fn parse_any(s: &str) -> Table {
        Table::from_str(s).unwrap_or_else(|| Table::Other(s.to_string()))
    }

    /// The eight source tables a record's `tbl` column may name. Does not
    /// include the synthetic table or [`Table::Other`].
    pub fn all() -> &'static [Table] {
        &[
            Table::Bx,
            Table::Dx,
            Table::Mx,
            Table::Ox,
            Table::Px,
            Table::Rx,
            Table::Vx,
            Table::Xx,
        ]
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An event or fact type: a source table plus a type scalar. Exposure
/// and outcome type maps are keyed on this pair; an event matches a
/// mapped type iff the pair is exactly equal (an absent `typ`, such as
/// `xx|` with no code, only matches events whose own `typ` is also
/// absent; there is no table-wide wildcard).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EventType(pub Table, pub TypeKey);

/// `typ` narrowed to the subset of [`Scalar`] that makes sense as a map
/// key: events are typed by an optional string or integer, never a
/// float (a float `typ` is folded into its string form, which is rare
/// enough in practice not to warrant its own variant).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TypeKey {
    Int(i64),
    Str(String),
    Absent,
}

impl From<&Scalar> for TypeKey {
    fn from(s: &Scalar) -> Self {
        match s {
            Scalar::Int(i) => TypeKey::Int(*i),
            Scalar::Str(s) => TypeKey::Str(s.clone()),
            Scalar::Float(f) => TypeKey::Str(f.to_string()),
            Scalar::Absent => TypeKey::Absent,
        }
    }
}

impl EventType {
    pub fn new(tbl: Table, typ: TypeKey) -> Self {
        EventType(tbl, typ)
    }

    /// Build a pipeline-internal type such as `(Synthetic, "exp")` or
    /// `(Synthetic, "lo")`.
    pub fn synthetic(name: &str) -> Self {
        EventType(Table::Synthetic, TypeKey::Str(name.to_string()))
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.1 {
            TypeKey::Int(i) => write!(f, "{}|{}", self.0, i),
            TypeKey::Str(s) => write!(f, "{}|{}", self.0, s),
            TypeKey::Absent => write!(f, "{}|", self.0),
        }
    }
}

/// An event's value: the typed `val` column plus an optional JSON payload.
pub type EventValue = (Scalar, Option<Json>);

/// A time-stamped or time-independent occurrence in a patient's record.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub when: Interval,
    pub ty: EventType,
    pub value: EventValue,
}

impl Event {
    pub fn new(when: Interval, ty: EventType, value: EventValue) -> Self {
        Event { when, ty, value }
    }

    /// True when `self.ty` is exactly `key`.
    pub fn matches(&self, key: &EventType) -> bool {
        self.ty == *key
    }
}
