use anyhow::{Context, Result};
use futures::StreamExt;
use std::io::Write;
use tracing::debug;

use super::formatter::{format_raw_document, format_weighted_sum, ProgressMark, OUTPUT_HEADERS};
use crate::scoring::{weighted_sum, FeatureCache, RevIds, ScoreDocument, ScoreProcessor};
use crate::tsv::TsvWriter;

/// Tally of what happened to each revision in a run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub scored: usize,
    pub errors: usize,
    pub unrecognized: usize,
}

impl RunSummary {
    pub fn total(&self) -> usize {
        self.scored + self.errors + self.unrecognized
    }
}

/// Score every revision in `rev_ids` and write the result table to `out`.
///
/// Each revision leaves one mark on `progress`, flushed immediately: `.` for
/// a scored revision (which also gets a row in `out`), `e` for an error
/// document, or the raw JSON of an unrecognized document. A newline follows
/// the last revision.
///
/// The first failure (bad input, unknown class, scorer failure) stops the
/// run. Rows already written are flushed to `out` before the error returns.
pub async fn run<P, O, E>(
    rev_ids: RevIds<'_>,
    processor: &P,
    cache: &FeatureCache,
    out: O,
    mut progress: E,
) -> Result<RunSummary>
where
    P: ScoreProcessor + ?Sized,
    O: Write,
    E: Write,
{
    let mut writer = TsvWriter::new(out, &OUTPUT_HEADERS).context("Failed to write output header")?;

    let result = score_all(rev_ids, processor, cache, &mut writer, &mut progress).await;
    let flushed = writer.flush();

    let summary = result?;
    flushed.context("Failed to flush output")?;
    Ok(summary)
}

async fn score_all<P, O, E>(
    rev_ids: RevIds<'_>,
    processor: &P,
    cache: &FeatureCache,
    writer: &mut TsvWriter<O>,
    progress: &mut E,
) -> Result<RunSummary>
where
    P: ScoreProcessor + ?Sized,
    O: Write,
    E: Write,
{
    let mut summary = RunSummary::default();
    let mut scores = processor.score(rev_ids, cache);

    while let Some(item) = scores.next().await {
        let (rev_id, document) = item?;

        match document {
            ScoreDocument::Error { kind, message } => {
                debug!(%rev_id, %kind, message = message.as_deref().unwrap_or(""), "scorer returned an error");
                progress.write_all(ProgressMark::Error.as_str().as_bytes())?;
                summary.errors += 1;
            }
            ScoreDocument::Probability {
                prediction,
                probability,
            } => {
                let sum = weighted_sum(&probability)
                    .with_context(|| format!("Failed to weight score for revision {}", rev_id))?;
                writer
                    .write_row(&[
                        Some(rev_id.to_string().as_str()),
                        Some(prediction.as_str()),
                        Some(format_weighted_sum(sum).as_str()),
                    ])
                    .context("Failed to write output row")?;
                progress.write_all(ProgressMark::Scored.as_str().as_bytes())?;
                summary.scored += 1;
            }
            ScoreDocument::Unrecognized(value) => {
                let raw = format_raw_document(&value)?;
                progress.write_all(raw.as_bytes())?;
                summary.unrecognized += 1;
            }
        }

        progress.flush()?;
    }

    progress.write_all(b"\n")?;
    progress.flush()?;

    Ok(summary)
}
