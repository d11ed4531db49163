//! Era aggregator
//!
//! Merges time-adjacent events of given types into maximal unions
//! separated by more than `max_gap` days, replacing the merged group
//! with one synthetic event per maximal run. Events outside `types`
//! pass through unchanged.
//!
//! Aggregation is per type family: this module takes one
//! `types`/`era_type` pair per call, so callers wanting both an
//! exposure and an outcome family aggregate independently by calling
//! this once per family, rather than ever merging the two into a
//! shared era.

use emr_core::event::{Event, EventType};
use emr_core::interval::Interval;
use emr_core::scalar::Scalar;
use emr_core::sequence::EventSequence;

/// Returns a new sequence where every event whose type is in `types` is
/// replaced by one synthetic event of type `era_type` per maximal run of
/// mutually adjacent-within-`max_gap_days` intervals.
pub fn make_eras(
    seq: &EventSequence,
    types: &[EventType],
    era_type: EventType,
    max_gap_days: i64,
) -> EventSequence {
    let in_family = |e: &&Event| types.iter().any(|t| e.matches(t));

    let mut target: Vec<Interval> = seq.events().iter().filter(in_family).map(|e| e.when).collect();
    target.sort_by_key(|w| (w.lo, w.hi));

    let mut eras: Vec<Interval> = Vec::new();
    for w in target.drain(..) {
        match eras.last_mut() {
            Some(last) if last.adjacent_within(&w, max_gap_days) => {
                *last = Interval::new(last.lo.min(w.lo), last.hi.max(w.hi));
            }
            _ => eras.push(w),
        }
    }

    let mut events: Vec<Event> = seq
        .events()
        .iter()
        .filter(|e| !in_family(e))
        .cloned()
        .collect();
    events.extend(
        eras.into_iter()
            .map(|w| Event::new(w, era_type.clone(), (Scalar::Absent, None))),
    );
    seq.with_events(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use emr_core::date::Date;
    use emr_core::event::{Table, TypeKey};
    use std::collections::HashMap;

    fn d(s: &str) -> Date {
        Date::parse(s).unwrap()
    }

    fn ev(lo: &str, hi: &str, ty: EventType) -> Event {
        Event::new(Interval::new(d(lo), d(hi)), ty, (Scalar::Absent, None))
    }

    #[test]
    fn merges_within_gap_and_splits_beyond_it() {
        let e1 = EventType::new(Table::Dx, TypeKey::Str("e1".into()));
        let events = vec![
            ev("2013-01-12", "2013-02-11", e1.clone()),
            ev("2013-03-11", "2013-10-07", e1.clone()),
            ev("2014-05-02", "2014-06-01", e1.clone()),
        ];
        let seq = EventSequence::new(0, HashMap::new(), events);
        let era_type = EventType::synthetic("exp");
        let merged = make_eras(&seq, &[e1], era_type.clone(), 90);
        let eras: Vec<_> = merged.events().iter().filter(|e| e.ty == era_type).collect();
        assert_eq!(eras.len(), 2);
        assert_eq!(eras[0].when, Interval::new(d("2013-01-12"), d("2013-10-07")));
        assert_eq!(eras[1].when, Interval::new(d("2014-05-02"), d("2014-06-01")));
    }

    #[test]
    fn events_outside_the_family_pass_through() {
        let e1 = EventType::new(Table::Dx, TypeKey::Str("e1".into()));
        let other = EventType::new(Table::Dx, TypeKey::Str("a".into()));
        let events = vec![
            ev("2013-01-12", "2013-02-11", e1.clone()),
            ev("2013-01-15", "2013-01-15", other.clone()),
        ];
        let seq = EventSequence::new(0, HashMap::new(), events);
        let merged = make_eras(&seq, &[e1], EventType::synthetic("exp"), 90);
        assert!(merged.events().iter().any(|e| e.ty == other));
    }

    mod props {
        use super::*;
        use proptest::collection::vec as vec_of;
        use proptest::prelude::*;

        fn base() -> Date {
            d("2000-01-01")
        }

        fn build_seq(spans: &[(u16, u16)], ty: &EventType) -> EventSequence {
            let events = spans
                .iter()
                .map(|(start, len)| {
                    let lo = base().plus_days(*start as i64);
                    let hi = lo.plus_days(*len as i64);
                    Event::new(Interval::new(lo, hi), ty.clone(), (Scalar::Absent, None))
                })
                .collect();
            EventSequence::new(0, HashMap::new(), events)
        }

        fn spans_strategy() -> impl Strategy<Value = Vec<(u16, u16)>> {
            vec_of((0u16..2000, 0u16..60), 0..30)
        }

        proptest! {
            #[test]
            fn eras_are_maximal(spans in spans_strategy(), gap in 0i64..120) {
                let ty = EventType::new(Table::Dx, TypeKey::Str("e1".into()));
                let seq = build_seq(&spans, &ty);
                let era_type = EventType::synthetic("exp");
                let merged = make_eras(&seq, &[ty], era_type.clone(), gap);
                let mut eras: Vec<Interval> = merged
                    .events()
                    .iter()
                    .filter(|e| e.ty == era_type)
                    .map(|e| e.when)
                    .collect();
                eras.sort_by_key(|w| w.lo);
                for pair in eras.windows(2) {
                    prop_assert!(!pair[0].adjacent_within(&pair[1], gap));
                }
            }

            #[test]
            fn make_eras_is_idempotent(spans in spans_strategy(), gap in 0i64..120) {
                let ty = EventType::new(Table::Dx, TypeKey::Str("e1".into()));
                let seq = build_seq(&spans, &ty);
                let era_type = EventType::synthetic("exp");
                let once = make_eras(&seq, &[ty], era_type.clone(), gap);

                let mut first: Vec<Interval> =
                    once.events().iter().filter(|e| e.ty == era_type).map(|e| e.when).collect();
                first.sort_by_key(|w| w.lo);

                let twice = make_eras(&once, &[era_type.clone()], era_type.clone(), gap);
                let mut second: Vec<Interval> =
                    twice.events().iter().filter(|e| e.ty == era_type).map(|e| e.when).collect();
                second.sort_by_key(|w| w.lo);

                prop_assert_eq!(first, second);
            }
        }
    }
}
