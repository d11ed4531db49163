//! Survival-example generator
//!
//! Turns a sequence's exposure/outcome transitions into one example per
//! maximal constant-state interval, then truncates the series at the
//! first outcome.

use emr_core::date::Date;
use emr_core::event::EventType;
use emr_core::interval::Interval;
use emr_core::scalar::Scalar;
use emr_core::sequence::EventSequence;

use crate::transitions::transitions;

/// Reads a subsequence (the events overlapping one emitted example) and
/// produces a fixed-shape row of covariates.
pub type FeatureVectorFn = dyn Fn(&EventSequence) -> Vec<Scalar>;

/// One emitted survival row.
#[derive(Debug, Clone, PartialEq)]
pub struct Example {
    pub id: i64,
    pub dates: Interval,
    pub lo_days: i64,
    pub hi_days: i64,
    pub len_days: i64,
    pub exp: u8,
    pub out: u8,
    pub fv: Option<Vec<Scalar>>,
}

fn build_example(
    seq: &EventSequence,
    ref_lo: Date,
    when_lo: Date,
    when_hi: Date,
    exp: u8,
    out: u8,
    fv_fn: Option<&FeatureVectorFn>,
) -> Example {
    let itvl = Interval::new(when_lo, when_hi);
    let fv = fv_fn.map(|f| {
        let overlapping = seq.events_overlapping(&itvl).into_iter().cloned().collect();
        f(&seq.subsequence(overlapping))
    });
    Example {
        id: seq.id,
        dates: itvl,
        lo_days: Date::days_between(ref_lo, when_lo),
        hi_days: Date::days_between(ref_lo, when_hi),
        len_days: Date::days_between(when_lo, when_hi),
        exp,
        out,
        fv,
    }
}

/// Walks `seq`'s exposure/outcome transitions and emits one example per
/// maximal constant-state interval, including zero-length point
/// examples. Empty sequences yield no examples.
pub fn examples_from_transitions(
    seq: &EventSequence,
    exposure: &EventType,
    outcome: &EventType,
    fv_fn: Option<&FeatureVectorFn>,
) -> Vec<Example> {
    if seq.is_empty() {
        return Vec::new();
    }
    let es_lo = seq.events()[0].when.lo;
    let es_hi = seq.events().iter().map(|e| e.when.hi).max().unwrap();

    let mut examples = Vec::new();
    let mut before = es_lo;
    let (mut exp_state, mut out_state) = (0u8, 0u8);

    for tx in transitions(seq, exposure, outcome) {
        if tx.now > before {
            examples.push(build_example(seq, es_lo, before, tx.now, exp_state, out_state, fv_fn));
        }
        // Stops take effect at `now`, just before points and starts.
        for stopped in &tx.stops {
            if stopped.matches(exposure) {
                exp_state = 0;
            }
            if stopped.matches(outcome) {
                out_state = 0;
            }
        }
        if !tx.points.is_empty() {
            for pt in &tx.points {
                if pt.matches(exposure) {
                    exp_state = 1;
                }
                if pt.matches(outcome) {
                    out_state = 1;
                }
            }
            examples.push(build_example(seq, es_lo, tx.now, tx.now, exp_state, out_state, fv_fn));
            for pt in &tx.points {
                if pt.matches(exposure) {
                    exp_state = 0;
                }
                if pt.matches(outcome) {
                    out_state = 0;
                }
            }
        }
        // Starts take effect just after `now`.
        for started in &tx.starts {
            if started.matches(exposure) {
                exp_state = 1;
            }
            if started.matches(outcome) {
                out_state = 1;
            }
        }
        before = tx.now;
    }
    if es_hi > before {
        examples.push(build_example(seq, es_lo, before, es_hi, exp_state, out_state, fv_fn));
    }
    examples
}

/// Truncates a series of examples at the first outcome: the example
/// whose end coincides with the first `out = 1` instant is
/// emitted with `out` forced to `1`, and nothing after it survives. The
/// sole exception is an outcome at the very first instant, which yields
/// one zero-length row rather than zero rows.
pub fn truncate_to_first_outcome(examples: Vec<Example>) -> Vec<Example> {
    let mut kept = Vec::new();
    let mut prev: Option<Example> = None;
    for curr in examples {
        if curr.out == 1 {
            match prev.take() {
                Some(mut p) => {
                    p.out = 1;
                    prev = Some(p);
                }
                None => prev = Some(curr),
            }
            break;
        }
        if let Some(p) = prev.take() {
            kept.push(p);
        }
        prev = Some(curr);
    }
    if let Some(p) = prev {
        kept.push(p);
    }
    kept
}

/// Runs the generator and truncation for one sequence.
pub fn survival_examples(
    seq: &EventSequence,
    exposure: &EventType,
    outcome: &EventType,
    fv_fn: Option<&FeatureVectorFn>,
) -> Vec<Example> {
    truncate_to_first_outcome(examples_from_transitions(seq, exposure, outcome, fv_fn))
}
