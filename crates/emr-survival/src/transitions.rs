//! Transition iterator
//!
//! Enumerates every instant at which an exposure- or outcome-typed event
//! starts, stops, or occurs as a zero-length point, in increasing order.

use std::collections::BTreeSet;

use emr_core::date::Date;
use emr_core::event::{Event, EventType};
use emr_core::sequence::EventSequence;

/// One instant `now` and the events of type E/O that start, stop, or
/// point there. `starts`/`stops` only ever contain non-point events;
/// `points` only ever contains point events (`lo == hi`).
#[derive(Debug, Clone)]
pub struct Transition {
    pub now: Date,
    pub starts: Vec<Event>,
    pub stops: Vec<Event>,
    pub points: Vec<Event>,
}

/// Builds the full, increasing-order transition list for one sequence
/// and a pair of event-type keys (exposure, outcome). Bounded by the
/// number of exposure/outcome events in the sequence, not the whole
/// patient record.
pub fn transitions(seq: &EventSequence, exposure: &EventType, outcome: &EventType) -> Vec<Transition> {
    let relevant: Vec<&Event> = seq
        .events()
        .iter()
        .filter(|ev| ev.matches(exposure) || ev.matches(outcome))
        .collect();

    let mut instants: BTreeSet<Date> = BTreeSet::new();
    for ev in &relevant {
        if ev.when.is_point() {
            instants.insert(ev.when.lo);
        } else {
            instants.insert(ev.when.lo);
            instants.insert(ev.when.hi);
        }
    }

    instants
        .into_iter()
        .map(|now| {
            let mut starts = Vec::new();
            let mut stops = Vec::new();
            let mut points = Vec::new();
            for ev in &relevant {
                if ev.when.is_point() {
                    if ev.when.lo == now {
                        points.push((*ev).clone());
                    }
                } else {
                    if ev.when.lo == now {
                        starts.push((*ev).clone());
                    }
                    if ev.when.hi == now {
                        stops.push((*ev).clone());
                    }
                }
            }
            Transition { now, starts, stops, points }
        })
        .collect()
}
