//! End-to-end runs of the full pipeline (parse -> filter/transform ->
//! group -> map -> era -> clip -> generate -> write) against the
//! patient-746 fixture: a full run, an immediate-outcome run, a
//! min-age-clipped run, and a run whose study period is clipped away
//! entirely.

use std::io::{Cursor, Write as _};

use emr_pipeline::{run_pipeline, SurvivalPipelineConfig};

const EVENTS_CSV: &str = "\
id|lo|hi|tbl|typ|val|jsn

746|||bx|dob|1944-09-03|
746|||bx|ethn|38003564|
746|||bx|gndr|F|
746|||bx|race|4212311|
746|||bx|record||

746|1979-11-13|1979-11-13|mx|88428|154584207|{\"val\":1.28,\"unit\":\"g\"}
746|1979-11-13||dx|2818||
746|1979-11-13|1980-11-12|rx|976||{\"quantity\":20,\"refills\":1}
746|1979-11-13|1979-11-13|vx|2||{\"care_site_id\":1}
746|1979-11-13||dx|2818||{\"provider_id\":276750642}

746|2005-02-06|2005-02-06|px|58||
746|2005-02-06|2005-02-06|vx|2||{\"care_site_id\":1}
746|2005-02-06|2005-02-06|vx|2||{\"care_site_id\":5}
746|2005-02-06|2005-02-07|rx|377||{\"days_supply\":30,\"refills\":10}
746|2005-02-06||dx|9677||

746|2005-05-30|2005-05-30|px|70||{\"provider_id\":276750642}
746|2005-05-30|2005-05-30|mx|65772|443055837|{\"val\":5.4,\"unit\":\"u/L\"}
746|2005-05-30|2005-05-30|mx|29979|154584207|{\"val\":2.66,\"unit\":\"mg\"}
746|2005-05-30||dx|4181||

746|2007-11-10|2007-11-10|vx|2||{\"provider_id\":276750642}
746|2007-11-10||dx|1927||{\"condition_source_value\":\"VVV04.08486\"}
746|2007-11-10|2007-11-11|rx|733||{\"days_supply\":90}
746|2007-11-10|2007-11-10|mx|29979|443055837|{\"val\":3.51,\"unit\":\"mg\"}
746|2007-11-10|2007-11-10|ox|16976||{\"provider_id\":31866686}
746|2007-11-10|2007-11-10|ox|96980||{\"provider_id\":31866686}
746|2007-11-10|2008-11-09|rx|731||

746|2008-01-25|2008-01-26|rx|733||{\"days_supply\":90,\"refills\":12}

746|2008-10-28|2009-10-29|rx|731||{\"quantity\":30,\"provider_id\":276750642,\"refills\":24}

746|2010-10-22||xx|||
";

fn type_file(lines: &[&str]) -> tempfile::NamedTempFile {
    let mut f = tempfile::NamedTempFile::new().unwrap();
    for line in lines {
        writeln!(f, "{line}").unwrap();
    }
    f
}

#[test]
fn full_run_yields_the_five_documented_rows() {
    let exposures = type_file(&["rx|377", "rx|733", "rx|976"]);
    let outcomes = type_file(&["xx|"]);
    let config = SurvivalPipelineConfig::builder()
        .exposures_file(exposures.path())
        .unwrap()
        .outcomes_file(outcomes.path())
        .unwrap()
        .build();

    let mut out = Vec::new();
    run_pipeline(Cursor::new(EVENTS_CSV.as_bytes()), &config, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();

    let expected = "\
id|date_lo|date_hi|lo|hi|len|exp|out
746|1979-11-13|1980-11-12|0|365|365|1|0
746|1980-11-12|2005-02-06|365|9217|8852|0|0
746|2005-02-06|2006-01-02|9217|9547|330|1|0
746|2006-01-02|2007-11-10|9547|10224|677|0|0
746|2007-11-10|2010-10-22|10224|11301|1077|1|1
";
    assert_eq!(text, expected);
}

#[test]
fn immediate_outcome_yields_a_single_zero_length_row() {
    let exposures = type_file(&["rx|976"]);
    let outcomes = type_file(&["dx|2818"]);
    let config = SurvivalPipelineConfig::builder()
        .exposures_file(exposures.path())
        .unwrap()
        .outcomes_file(outcomes.path())
        .unwrap()
        .build();

    let mut out = Vec::new();
    run_pipeline(Cursor::new(EVENTS_CSV.as_bytes()), &config, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();

    let expected = "\
id|date_lo|date_hi|lo|hi|len|exp|out
746|1979-11-13|1979-11-13|0|0|0|0|1
";
    assert_eq!(text, expected);
}

#[test]
fn limit_to_ages_min_only_clips_to_a_single_row() {
    // `qx` isn't a recognized table, so this exposure type never
    // matches any event in the fixture.
    let exposures = type_file(&["qx|111"]);
    let outcomes = type_file(&["xx|"]);
    let config = SurvivalPipelineConfig::builder()
        .exposures_file(exposures.path())
        .unwrap()
        .outcomes_file(outcomes.path())
        .unwrap()
        .min_age(50.0)
        .build();

    let mut out = Vec::new();
    run_pipeline(Cursor::new(EVENTS_CSV.as_bytes()), &config, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();

    let expected = "\
id|date_lo|date_hi|lo|hi|len|exp|out
746|1994-08-22|2010-10-22|0|5905|5905|0|1
";
    assert_eq!(text, expected);
}

#[test]
fn empty_study_period_yields_no_rows() {
    // `qx` isn't a recognized table, so this exposure type never
    // matches any event in the fixture.
    let exposures = type_file(&["qx|111"]);
    let outcomes = type_file(&["xx|"]);
    let config = SurvivalPipelineConfig::builder()
        .exposures_file(exposures.path())
        .unwrap()
        .outcomes_file(outcomes.path())
        .unwrap()
        .max_age(0.0)
        .build();

    let mut out = Vec::new();
    let stats = run_pipeline(Cursor::new(EVENTS_CSV.as_bytes()), &config, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();

    assert_eq!(text, "id|date_lo|date_hi|lo|hi|len|exp|out\n");
    assert_eq!(stats.rows_written, 0);
    assert_eq!(stats.sequences_skipped, 1);
}
