//! Pipeline driver
//!
//! Wires the record codec, event-sequence grouper, and survival-example
//! generator together: parse -> group -> map exposure/outcome types ->
//! era-aggregate each family -> clip to the study period -> walk
//! transitions -> truncate at the first outcome -> write. One patient
//! sequence is held in memory at a time.

use std::io::{BufRead, Write};

use emr_core::error::Result;
use emr_core::event::EventType;
use emr_parser::group::group_into_sequences;
use emr_parser::record::RecordReader;
use emr_parser::config::ParseConfig;
use emr_survival::{make_eras, survival_examples};

use crate::config::SurvivalPipelineConfig;
use crate::mapping::map_event_types;
use crate::output::{write_example, write_header};

/// Counts returned by [`run_pipeline`] for the CLI to report and for
/// tests to assert against without parsing the written output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineStats {
    pub sequences_read: usize,
    pub sequences_skipped: usize,
    pub rows_written: usize,
}

const PROGRESS_EVERY: usize = 10_000;

/// Runs the full pipeline over `input`, writing survival-example rows
/// to `output`.
pub fn run_pipeline<R: BufRead, W: Write>(
    input: R,
    config: &SurvivalPipelineConfig,
    mut output: W,
) -> Result<PipelineStats> {
    tracing::info!(
        era_max_gap_days = config.era_max_gap_days,
        exposure_types = config.exposure_types.len(),
        outcome_types = config.outcome_types.len(),
        "starting survival pipeline run"
    );

    let type_map = config.event_type_map();
    let exp_ty = EventType::synthetic("exp");
    let out_ty = EventType::synthetic("out");

    write_header(&mut output, config.record_codec.delimiter, &config.feature_vector_header)?;

    let records = RecordReader::new(input, config.record_codec.clone());
    let records = records.filter_map(move |r| match r {
        Err(e) => Some(Err(e)),
        Ok(rec) => {
            if let Some(pred) = &config.include_record {
                if !pred(&rec) {
                    return None;
                }
            }
            let rec = match &config.record_transformer {
                Some(f) => f(rec),
                None => rec,
            };
            Some(Ok(rec))
        }
    });
    let sequences = group_into_sequences(records, ParseConfig::new());

    let mut stats = PipelineStats::default();
    for seq in sequences {
        let seq = seq?;
        stats.sequences_read += 1;

        let mapped = map_event_types(&seq, &type_map, config.replace_mapped_events);
        let with_exp_eras = make_eras(&mapped, &[exp_ty.clone()], exp_ty.clone(), config.era_max_gap_days);
        let with_eras = make_eras(&with_exp_eras, &[out_ty.clone()], out_ty.clone(), config.era_max_gap_days);
        let clipped = match &config.study_period_definer {
            Some(definer) => definer(&with_eras),
            None => with_eras,
        };

        let examples = survival_examples(&clipped, &exp_ty, &out_ty, config.feature_vector_fn.as_deref());
        if examples.is_empty() {
            tracing::warn!(id = clipped.id, "sequence produced no survival examples, skipping");
            stats.sequences_skipped += 1;
            continue;
        }
        for example in &examples {
            write_example(&mut output, config.record_codec.delimiter, example)?;
        }
        stats.rows_written += examples.len();

        if stats.sequences_read % PROGRESS_EVERY == 0 {
            tracing::info!(
                sequences_read = stats.sequences_read,
                rows_written = stats.rows_written,
                "pipeline progress"
            );
        }
    }

    tracing::info!(
        sequences_read = stats.sequences_read,
        sequences_skipped = stats.sequences_skipped,
        rows_written = stats.rows_written,
        "survival pipeline run complete"
    );
    Ok(stats)
}
