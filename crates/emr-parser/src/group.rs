//! Event-sequence assembly
//!
//! Groups a record stream by `id` using adjacency, not a sort: records
//! for one patient are assumed to arrive as one contiguous run. Within a
//! run, records with both `lo` and `hi` absent become facts; everything
//! else becomes a time-stamped event.

use std::collections::HashMap;

use emr_core::date::Date;
use emr_core::error::{Error, Result};
use emr_core::event::{Event, EventType, EventValue, TypeKey};
use emr_core::interval::Interval;
use emr_core::sequence::EventSequence;

use crate::config::ParseConfig;
use crate::record::Record;

fn event_when(lo: Option<Date>, hi: Option<Date>) -> Interval {
    match (lo, hi) {
        (Some(l), Some(h)) => Interval::new(l, h),
        (Some(l), None) => Interval::point(l),
        (None, Some(h)) => Interval::point(h),
        (None, None) => unreachable!("facts have no interval"),
    }
}

fn add_record(r: Record, facts: &mut HashMap<EventType, EventValue>, events: &mut Vec<Event>) {
    let is_fact = r.is_fact();
    let ty = EventType::new(r.tbl, TypeKey::from(&r.typ));
    if is_fact {
        facts.insert(ty, (r.val, r.jsn));
    } else {
        events.push(Event::new(event_when(r.lo, r.hi), ty, (r.val, r.jsn)));
    }
}

/// Streaming adjacency groupby of a filtered/transformed record stream
/// into one [`EventSequence`] per contiguous run of equal `id`. Carries
/// the lifetime of whatever `ParseConfig` hooks and underlying reader
/// it was built from, rather than requiring them to be `'static`, so
/// callers that borrow a pipeline-level config for the hooks don't
/// need to clone or leak it.
pub struct SequenceGrouper<'a> {
    records: std::iter::Peekable<Box<dyn Iterator<Item = Result<Record>> + 'a>>,
    last_id: Option<i64>,
}

impl<'a> SequenceGrouper<'a> {
    pub fn new(
        records: impl Iterator<Item = Result<Record>> + 'a,
        parse_config: ParseConfig,
    ) -> Self {
        let filtered: Box<dyn Iterator<Item = Result<Record>> + 'a> =
            Box::new(records.filter_map(move |r| match r {
                Err(e) => Some(Err(e)),
                Ok(rec) => parse_config.apply(rec).map(Ok),
            }));
        SequenceGrouper {
            records: filtered.peekable(),
            last_id: None,
        }
    }
}

impl<'a> Iterator for SequenceGrouper<'a> {
    type Item = Result<EventSequence>;

    fn next(&mut self) -> Option<Self::Item> {
        let first = match self.records.next()? {
            Ok(r) => r,
            Err(e) => return Some(Err(e)),
        };
        let id = first.id;
        if let Some(last) = self.last_id {
            if id < last {
                // Line numbers aren't tracked past the record codec layer;
                // the id comparison itself is what matters here.
                return Some(Err(Error::OutOfOrderInput { prev_id: last, id, line: 0 }));
            }
        }
        let mut facts = HashMap::new();
        let mut events = Vec::new();
        add_record(first, &mut facts, &mut events);
        loop {
            match self.records.peek() {
                Some(Ok(r)) if r.id == id => {
                    let r = self.records.next().unwrap().unwrap();
                    add_record(r, &mut facts, &mut events);
                }
                _ => break,
            }
        }
        self.last_id = Some(id);
        Some(Ok(EventSequence::new(id, facts, events)))
    }
}

/// Groups a filtered/transformed record stream into event sequences.
pub fn group_into_sequences<'a>(
    records: impl Iterator<Item = Result<Record>> + 'a,
    parse_config: ParseConfig,
) -> impl Iterator<Item = Result<EventSequence>> + 'a {
    SequenceGrouper::new(records, parse_config)
}
