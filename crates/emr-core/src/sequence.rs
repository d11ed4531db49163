//! Per-patient event sequences

use std::collections::HashMap;

use crate::event::{Event, EventType, EventValue};
use crate::interval::Interval;

/// All events and facts belonging to one patient.
///
/// Invariants: at most one fact per type, `events` sorted by
/// `(when.lo, when.hi)`, and every contributing record shares `id`.
#[derive(Debug, Clone, PartialEq)]
pub struct EventSequence {
    pub id: i64,
    facts: HashMap<EventType, EventValue>,
    events: Vec<Event>,
}

impl EventSequence {
    pub fn new(id: i64, facts: HashMap<EventType, EventValue>, mut events: Vec<Event>) -> Self {
        events.sort_by(|a, b| (a.when.lo, a.when.hi).cmp(&(b.when.lo, b.when.hi)));
        EventSequence { id, facts, events }
    }

    /// Rebuild this sequence with a new event list, keeping id and facts.
    /// Used by the era aggregator and the study-period clipper, which are
    /// both pure functions over one sequence.
    pub fn with_events(&self, mut events: Vec<Event>) -> Self {
        events.sort_by(|a, b| (a.when.lo, a.when.hi).cmp(&(b.when.lo, b.when.hi)));
        EventSequence {
            id: self.id,
            facts: self.facts.clone(),
            events,
        }
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn facts(&self) -> &HashMap<EventType, EventValue> {
        &self.facts
    }

    pub fn fact(&self, ty: &EventType) -> Option<&EventValue> {
        self.facts.get(ty)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn has_type(&self, ty: &EventType) -> bool {
        self.events.iter().any(|e| e.matches(ty))
    }

    pub fn n_events_of_type(&self, ty: &EventType) -> usize {
        self.events.iter().filter(|e| e.matches(ty)).count()
    }

    /// The overall time span of the sequence: earliest `lo`, latest `hi`.
    /// `None` for an empty sequence.
    pub fn span(&self) -> Option<Interval> {
        let lo = self.events.first()?.when.lo;
        let hi = self.events.iter().map(|e| e.when.hi).max()?;
        Some(Interval::new(lo, hi))
    }

    /// Events overlapping the given interval, in order. Used to build the
    /// feature-vector subsequence for one emitted example.
    pub fn events_overlapping(&self, itvl: &Interval) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.when.intersects(itvl))
            .collect()
    }

    /// A fresh sequence containing only the given events, keeping id and
    /// facts. Used to materialize a feature-vector subsequence.
    pub fn subsequence(&self, events: Vec<Event>) -> EventSequence {
        EventSequence {
            id: self.id,
            facts: self.facts.clone(),
            events,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date::Date;
    use crate::event::Table;
    use crate::event::TypeKey;
    use crate::scalar::Scalar;

    fn d(s: &str) -> Date {
        Date::parse(s).unwrap()
    }

    #[test]
    fn events_are_kept_sorted() {
        let ty = EventType::new(Table::Dx, TypeKey::Int(1));
        let e1 = Event::new(
            Interval::new(d("2015-01-01"), d("2015-02-01")),
            ty.clone(),
            (Scalar::Absent, None),
        );
        let e2 = Event::new(
            Interval::new(d("2010-01-01"), d("2010-02-01")),
            ty,
            (Scalar::Absent, None),
        );
        let seq = EventSequence::new(1, HashMap::new(), vec![e1, e2.clone()]);
        assert_eq!(seq.events()[0], e2);
    }

    #[test]
    fn span_covers_earliest_lo_and_latest_hi() {
        let ty = EventType::new(Table::Dx, TypeKey::Int(1));
        let events = vec![
            Event::new(
                Interval::new(d("2010-01-01"), d("2010-02-01")),
                ty.clone(),
                (Scalar::Absent, None),
            ),
            Event::new(
                Interval::new(d("2011-01-01"), d("2020-01-01")),
                ty,
                (Scalar::Absent, None),
            ),
        ];
        let seq = EventSequence::new(1, HashMap::new(), events);
        let span = seq.span().unwrap();
        assert_eq!(span.lo, d("2010-01-01"));
        assert_eq!(span.hi, d("2020-01-01"));
    }
}
