//! Output codec
//!
//! Renders one pipe-delimited row per [`emr_survival::Example`]:
//! `id|date_lo|date_hi|lo|hi|len|exp|out` plus any feature-vector
//! columns. Absent values and missing feature vectors render as the
//! empty string.

use std::io::{self, Write};

use emr_core::error::Result;
use emr_survival::Example;

const FIXED_HEADER: [&str; 8] = ["id", "date_lo", "date_hi", "lo", "hi", "len", "exp", "out"];

/// Writes the header row: the eight fixed columns plus `feature_vector_header`.
pub fn write_header<W: Write>(mut w: W, delimiter: char, feature_vector_header: &[String]) -> Result<()> {
    let mut cols: Vec<&str> = FIXED_HEADER.to_vec();
    cols.extend(feature_vector_header.iter().map(String::as_str));
    writeln!(w, "{}", cols.join(&delimiter.to_string())).map_err(map_io)?;
    Ok(())
}

/// Writes one row for `example`.
pub fn write_example<W: Write>(mut w: W, delimiter: char, example: &Example) -> Result<()> {
    let mut cols = vec![
        example.id.to_string(),
        example.dates.lo.to_string(),
        example.dates.hi.to_string(),
        example.lo_days.to_string(),
        example.hi_days.to_string(),
        example.len_days.to_string(),
        example.exp.to_string(),
        example.out.to_string(),
    ];
    if let Some(fv) = &example.fv {
        cols.extend(fv.iter().map(|s| s.to_string()));
    }
    writeln!(w, "{}", cols.join(&delimiter.to_string())).map_err(map_io)?;
    Ok(())
}

fn map_io(e: io::Error) -> emr_core::error::Error {
    emr_core::error::Error::Io(e)
}

#[cfg(test)]
mod tests {
    use super::*;
    use emr_core::date::Date;
    use emr_core::interval::Interval;
    use emr_core::scalar::Scalar;

    #[test]
    fn renders_header_with_feature_columns() {
        let mut buf = Vec::new();
        write_header(&mut buf, '|', &["gndr".to_string()]).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "id|date_lo|date_hi|lo|hi|len|exp|out|gndr\n");
    }

    #[test]
    fn renders_patient_746_row() {
        let example = Example {
            id: 746,
            dates: Interval::new(Date::parse("1979-11-13").unwrap(), Date::parse("1980-11-12").unwrap()),
            lo_days: 0,
            hi_days: 365,
            len_days: 365,
            exp: 1,
            out: 0,
            fv: None,
        };
        let mut buf = Vec::new();
        write_example(&mut buf, '|', &example).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "746|1979-11-13|1980-11-12|0|365|365|1|0\n");
    }

    #[test]
    fn absent_feature_renders_as_empty_string() {
        let example = Example {
            id: 1,
            dates: Interval::point(Date::parse("2000-01-01").unwrap()),
            lo_days: 0,
            hi_days: 0,
            len_days: 0,
            exp: 0,
            out: 1,
            fv: Some(vec![Scalar::Absent]),
        };
        let mut buf = Vec::new();
        write_example(&mut buf, '|', &example).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "1|2000-01-01|2000-01-01|0|0|0|0|1|\n");
    }
}
