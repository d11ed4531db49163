//! Default record-level hooks
//!
//! Drop the `bx|record` placeholder fact and `rx` "medication mention"
//! rows, and correct a prescription's `hi` using
//! [`emr_survival::drugduration::corrected_hi`]. These are the pipeline's
//! defaults, not hard requirements of the record codec itself; callers
//! that want the raw stream can override both on the builder.

use emr_core::event::Table;
use emr_core::scalar::Scalar;
use emr_parser::record::Record;
use emr_survival::corrected_hi;

/// The drug-type concept id that flags a medication *mention* rather
/// than an active prescription.
const MEDICATION_MENTION_CONCEPT_ID: i64 = 38_000_178;

fn json_i64(jsn: Option<&serde_json::Value>, key: &str) -> Option<i64> {
    jsn.and_then(|v| v.as_object()).and_then(|o| o.get(key)).and_then(|v| v.as_i64())
}

/// Drops the `bx|record` placeholder fact and `rx` rows flagged as a
/// medication mention rather than an active prescription.
pub fn default_include_record(record: &Record) -> bool {
    match record.tbl {
        Table::Bx => record.typ != Scalar::Str("record".to_string()),
        Table::Rx => json_i64(record.jsn.as_ref(), "drug_type_concept_id") != Some(MEDICATION_MENTION_CONCEPT_ID),
        _ => true,
    }
}

/// Applies [`corrected_hi`] (30-day floor, no washout) to `rx` records;
/// leaves every other record unchanged.
pub fn default_record_transformer(mut record: Record) -> Record {
    if record.tbl == Table::Rx {
        record.hi = corrected_hi(record.lo, record.hi, record.jsn.as_ref(), 30.0, 0.0);
    }
    record
}
