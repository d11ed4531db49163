//! Feature-vector helpers
//!
//! Small combinators that read facts and event statistics from a
//! sequence to produce one column of a fixed-shape covariate row.
//! `mk_feature_vector_function` combines several into the
//! `FeatureVectorFn` the generator expects.

use emr_core::event::EventType;
use emr_core::scalar::Scalar;
use emr_core::sequence::EventSequence;

/// One column of a feature vector.
pub type FeatureFn = Box<dyn Fn(&EventSequence) -> Scalar>;

/// Reads a fact's value, or `Scalar::Absent` if the sequence has none.
pub fn mk_fact_feature(key: EventType) -> FeatureFn {
    Box::new(move |seq| seq.fact(&key).map(|(v, _)| v.clone()).unwrap_or(Scalar::Absent))
}

/// `1` if the sequence has at least one event of `key`'s type, else `0`.
pub fn mk_has_event_feature(key: EventType) -> FeatureFn {
    Box::new(move |seq| Scalar::Int(seq.has_type(&key) as i64))
}

/// The number of events of `key`'s type in the sequence.
pub fn mk_event_count_feature(key: EventType) -> FeatureFn {
    Box::new(move |seq| Scalar::Int(seq.n_events_of_type(&key) as i64))
}

/// Combines feature columns into one function suitable for
/// `generator::FeatureVectorFn`.
pub fn mk_feature_vector_function(funcs: Vec<FeatureFn>) -> Box<dyn Fn(&EventSequence) -> Vec<Scalar>> {
    Box::new(move |seq| funcs.iter().map(|f| f(seq)).collect())
}

/// Age in years (one decimal place, flat 365-day year) at the
/// sequence's earliest event, or `Scalar::Absent` if there is no DOB
/// fact or no events.
pub fn age_at_first_event(seq: &EventSequence) -> Scalar {
    use emr_core::date::Date;
    use emr_core::event::{Table, TypeKey};

    let Some(first) = seq.events().first() else {
        return Scalar::Absent;
    };
    let dob_key = EventType::new(Table::Bx, TypeKey::Str("dob".to_string()));
    let Some((dob_val, _)) = seq.fact(&dob_key) else {
        return Scalar::Absent;
    };
    let Some(dob) = dob_val.as_str().and_then(Date::parse) else {
        return Scalar::Absent;
    };
    let years = Date::days_between(dob, first.when.lo) as f64 / 365.0;
    Scalar::Float((years * 10.0).round() / 10.0)
}
