//! Exposure/outcome type mapping
//!
//! Replaces (or augments) events whose type is listed in the exposure
//! or outcome file with a synthetic `exp`/`out` event sharing the same
//! interval and value, so the era aggregator and transition iterator
//! downstream only ever need to know about two type families.

use std::collections::HashMap;

use emr_core::event::{Event, EventType};
use emr_core::sequence::EventSequence;

/// Maps `seq`'s events through `type_map`. When `replace` is true, a
/// mapped event's original type is dropped in favor of the synthetic
/// one; when false, both are kept so feature-vector functions can
/// still see the original diagnosis/procedure code.
pub fn map_event_types(
    seq: &EventSequence,
    type_map: &HashMap<EventType, EventType>,
    replace: bool,
) -> EventSequence {
    let mut events = Vec::with_capacity(seq.len());
    for e in seq.events() {
        match type_map.get(&e.ty) {
            Some(target) => {
                if !replace {
                    events.push(e.clone());
                }
                events.push(Event::new(e.when, target.clone(), e.value.clone()));
            }
            None => events.push(e.clone()),
        }
    }
    seq.with_events(events)
}
