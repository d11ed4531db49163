//! Pipe-delimited EMR record codec
//!
//! Input lines look like `id|lo|hi|tbl|typ|val|jsn`. `jsn` is allowed to
//! carry extra, unescaped delimiters; any columns past the canonical
//! seven are rejoined into `jsn` before the row is split into fields.

use std::io::BufRead;

use emr_core::date::Date;
use emr_core::error::{Error, Result};
use emr_core::event::Table;
use emr_core::scalar::Scalar;

use crate::config::RecordCodecConfig;

const FIELD_COUNT: usize = 7;
const HEADER: [&str; FIELD_COUNT] = ["id", "lo", "hi", "tbl", "typ", "val", "jsn"];

/// One parsed row of the input stream.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub id: i64,
    pub lo: Option<Date>,
    pub hi: Option<Date>,
    pub tbl: Table,
    pub typ: Scalar,
    pub val: Scalar,
    pub jsn: Option<serde_json::Value>,
}

impl Record {
    /// A fact has no time interval at all.
    pub fn is_fact(&self) -> bool {
        self.lo.is_none() && self.hi.is_none()
    }
}

/// Splits one stripped, non-comment line into exactly `FIELD_COUNT`
/// fields, rejoining any surplus columns into `jsn`.
fn split_fields(line: &str, delimiter: char) -> Vec<String> {
    let mut fields: Vec<String> = line.split(delimiter).map(str::to_string).collect();
    if fields.len() > FIELD_COUNT {
        let jsn = fields[FIELD_COUNT - 1..].join(&delimiter.to_string());
        fields.truncate(FIELD_COUNT - 1);
        fields.push(jsn);
    }
    fields
}

fn is_header_row(fields: &[String]) -> bool {
    fields.len() == FIELD_COUNT && fields.iter().zip(HEADER.iter()).all(|(a, b)| a == b)
}

fn parse_date_field(text: &str, line_no: usize) -> Result<Option<Date>> {
    if text.is_empty() {
        return Ok(None);
    }
    Date::parse(text).map(Some).ok_or_else(|| Error::malformed(line_no, format!("bad date {text:?}")))
}

/// Parses one row's fields into a `Record`, or `Ok(None)` when the row's
/// table is absent from `config.include_tables` (including tables this
/// codec doesn't recognize at all, e.g. a stray `dlux` table).
fn parse_fields(raw: &[String], config: &RecordCodecConfig, line_no: usize) -> Result<Option<Record>> {
    if raw.len() < FIELD_COUNT {
        return Err(Error::malformed(
            line_no,
            format!("expected {FIELD_COUNT} fields, got {}", raw.len()),
        ));
    }
    let Some(tbl) = Table::from_str(&raw[3]) else {
        return Ok(None);
    };
    if !config.include_tables.contains(&tbl) {
        return Ok(None);
    }
    let id: i64 = raw[0]
        .parse()
        .map_err(|_| Error::malformed(line_no, format!("bad id {:?}", raw[0])))?;
    let lo = parse_date_field(&raw[1], line_no)?;
    let hi = parse_date_field(&raw[2], line_no)?;
    let typ = Scalar::atom(&raw[4]);
    let val = Scalar::atom(&raw[5]);
    let jsn = if raw[6].is_empty() {
        None
    } else {
        Some(
            serde_json::from_str(&raw[6])
                .map_err(|e| Error::malformed(line_no, format!("bad JSON: {e}")))?,
        )
    };
    Ok(Some(Record { id, lo, hi, tbl, typ, val, jsn }))
}

/// Streaming reader over a record file. One line of input yields at
/// most one `Record`; lines for excluded tables are skipped silently.
pub struct RecordReader<R> {
    lines: std::io::Lines<R>,
    config: RecordCodecConfig,
    line_no: usize,
    past_header_check: bool,
}

impl<R: BufRead> RecordReader<R> {
    pub fn new(reader: R, config: RecordCodecConfig) -> Self {
        RecordReader {
            lines: reader.lines(),
            config,
            line_no: 0,
            past_header_check: false,
        }
    }
}

impl<R: BufRead> Iterator for RecordReader<R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let raw_line = match self.lines.next()? {
                Ok(l) => l,
                Err(e) => return Some(Err(Error::Io(e))),
            };
            self.line_no += 1;
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with(self.config.comment_prefix) {
                continue;
            }
            let fields = split_fields(line, self.config.delimiter);
            if !self.past_header_check {
                self.past_header_check = true;
                if is_header_row(&fields) {
                    continue;
                }
            }
            match parse_fields(&fields, &self.config, self.line_no) {
                Ok(Some(record)) => return Some(Ok(record)),
                Ok(None) => continue,
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn read_all(text: &str) -> Vec<Record> {
        RecordReader::new(Cursor::new(text.as_bytes()), RecordCodecConfig::default())
            .collect::<Result<Vec<_>>>()
            .unwrap()
    }

    #[test]
    fn skips_comments_and_blank_lines() {
        let text = "  # a comment\n\n1|||bx|dob|1932-11-29|\n";
        let recs = read_all(text);
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].id, 1);
    }

    #[test]
    fn skips_tolerated_header_row() {
        let text = "id|lo|hi|tbl|typ|val|jsn\n1|||bx|dob|1932-11-29|\n";
        let recs = read_all(text);
        assert_eq!(recs.len(), 1);
    }

    #[test]
    fn excludes_unrecognized_table() {
        let text = "1|1997-07-01||dlux|486||\n";
        assert!(read_all(text).is_empty());
    }

    #[test]
    fn reassembles_json_with_embedded_pipes() {
        let text = "1|2009-08-12||xx|||\"|||||\"\n";
        let recs = read_all(text);
        assert_eq!(recs[0].jsn, Some(serde_json::Value::String("|||||".to_string())));
    }

    #[test]
    fn parses_typed_atoms() {
        let text = "1|1996-10-01|1997-11-13|mx|12345|100.0|[1,2,3]\n";
        let recs = read_all(text);
        assert_eq!(recs[0].typ, Scalar::Int(12345));
        assert_eq!(recs[0].val, Scalar::Float(100.0));
        assert_eq!(recs[0].jsn, Some(serde_json::json!([1, 2, 3])));
    }

    #[test]
    fn malformed_record_reports_line_number() {
        let text = "1|2|3\n";
        let err = RecordReader::new(Cursor::new(text.as_bytes()), RecordCodecConfig::default())
            .next()
            .unwrap()
            .unwrap_err();
        assert!(err.to_string().contains("line 1"));
    }

    #[test]
    fn facts_have_no_interval() {
        let text = "1|||bx|dob|1932-11-29|\n";
        let recs = read_all(text);
        assert!(recs[0].is_fact());
    }
}
