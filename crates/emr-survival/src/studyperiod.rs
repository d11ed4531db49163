//! Study-period clipper
//!
//! Limits a sequence to an age window derived from the `('bx','dob')`
//! fact, inserting synthetic boundary markers at the kept bounds. A
//! sequence with no DOB fact is returned unchanged; there is nothing
//! else a date-of-birth-less cohort definition can reasonably do.

use emr_core::date::Date;
use emr_core::event::{Event, EventType, Table, TypeKey};
use emr_core::interval::Interval;
use emr_core::scalar::Scalar;
use emr_core::sequence::EventSequence;

fn dob_of(seq: &EventSequence) -> Option<Date> {
    let key = EventType::new(Table::Bx, TypeKey::Str("dob".to_string()));
    let (val, _) = seq.fact(&key)?;
    val.as_str().and_then(Date::parse)
}

/// Clips `seq` to `[dob + min_age*365d, dob + max_age*365d]`. Either
/// bound may be absent, in which case that side is left open and no
/// boundary marker is inserted for it.
pub fn clip_to_study_period(
    seq: &EventSequence,
    min_age: Option<f64>,
    max_age: Option<f64>,
) -> EventSequence {
    if min_age.is_none() && max_age.is_none() {
        return seq.clone();
    }
    let Some(dob) = dob_of(seq) else {
        return seq.clone();
    };
    let min_date = min_age.map(|a| dob.plus_age_years(a));
    let max_date = max_age.map(|a| dob.plus_age_years(a));
    let bounds = Interval::new(min_date.unwrap_or(Date::MIN), max_date.unwrap_or(Date::MAX));

    let mut events: Vec<Event> = Vec::new();
    for e in seq.events() {
        if e.when.issubset(&bounds) {
            events.push(e.clone());
        } else if let Some(clipped) = e.when.intersection(&bounds) {
            events.push(Event::new(clipped, e.ty.clone(), e.value.clone()));
        }
    }
    if let Some(lo) = min_date {
        events.insert(
            0,
            Event::new(Interval::point(lo), EventType::synthetic("lo"), (Scalar::Absent, None)),
        );
    }
    if let Some(hi) = max_date {
        events.push(Event::new(
            Interval::point(hi),
            EventType::synthetic("hi"),
            (Scalar::Absent, None),
        ));
    }
    seq.with_events(events)
}
