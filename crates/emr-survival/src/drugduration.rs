//! Drug-duration inference
//!
//! Derives a prescription's end date from `days_supply` / `refills` /
//! `quantity` fields in its JSON payload. Never fails: missing JSON keys
//! simply fall further down the table below.

use emr_core::date::Date;
use serde_json::Value as Json;

/// `(days_supply, refills, quantity, default_rx_days) -> inferred days`.
/// `refills` is the raw refill count; it is converted to a fill count
/// (`refills + 1`) internally.
pub fn infer_days_supply(
    days_supply: Option<f64>,
    refills: Option<i64>,
    quantity: Option<f64>,
    default_rx_days: f64,
) -> f64 {
    let fills = refills.map(|r| (r + 1) as f64);
    if let Some(days) = days_supply {
        match fills {
            Some(f) => days * f,
            None => days,
        }
    } else if let Some(q) = quantity {
        match fills {
            Some(f) => q * f,
            None => q,
        }
    } else if let Some(f) = fills {
        default_rx_days * f
    } else {
        default_rx_days
    }
}

fn json_f64(v: &Json) -> Option<f64> {
    v.as_f64()
}

fn json_i64(v: &Json) -> Option<i64> {
    v.as_i64()
}

/// Computes the corrected `hi` for a prescription record given its `lo`,
/// current `hi`, and JSON attributes. `hi` is never decreased, and `lo`
/// is left untouched by this step.
///
/// `min_days` is both the inference table's default and the floor
/// applied to the inferred day count; `washout` is added afterward.
pub fn corrected_hi(
    lo: Option<Date>,
    hi: Option<Date>,
    jsn: Option<&Json>,
    min_days: f64,
    washout: f64,
) -> Option<Date> {
    let attrs = jsn.and_then(Json::as_object);
    let days_supply = attrs.and_then(|o| o.get("days_supply")).and_then(json_f64);
    let refills = attrs.and_then(|o| o.get("refills")).and_then(json_i64);
    let quantity = attrs.and_then(|o| o.get("quantity")).and_then(json_f64);
    let inferred = infer_days_supply(days_supply, refills, quantity, min_days);
    let days = (inferred.max(min_days) + washout).round() as i64;
    match (lo, hi) {
        (Some(l), Some(h)) => {
            if Date::days_between(l, h) < days {
                Some(l.plus_days(days))
            } else {
                Some(h)
            }
        }
        (Some(l), None) => Some(l.plus_days(days)),
        (None, h) => h,
    }
}
