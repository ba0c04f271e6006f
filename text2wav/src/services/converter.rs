//! Conversion loop
//!
//! Drives each input row through history lookup, synthesis, file write and
//! history append, strictly one row at a time. Per-row failures are logged
//! and counted; the run continues. A row that fails gets no history record,
//! so the next run retries it.
//!
//! Fatal conditions (malformed CSV, history file unwritable) abort the run
//! with an error.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use text2wav_common::config::AudioEncoding;
use text2wav_common::Result;
use tracing::{error, info, warn};

use crate::error::ConvertResult;
use crate::models::{ConversionSummary, HistoryEntry, InputLine, InputRow, RowFailure};
use crate::services::history_store::{ConversionDecision, HistoryStore};
use crate::services::output_writer::{output_path, write_audio};
use crate::tts::Synthesizer;

/// Output settings for a run
#[derive(Debug, Clone)]
pub struct ConverterOptions {
    pub output_prefix: String,
    pub encoding: AudioEncoding,
}

/// Row-by-row converter
///
/// Built with a synthesizer for a real run, or without one via
/// [`Converter::dry_run`] to report what would be converted.
pub struct Converter<'a> {
    history: HistoryStore,
    options: ConverterOptions,
    synthesizer: Option<&'a dyn Synthesizer>,
    /// Outputs a dry run would have written so far
    planned_outputs: HashSet<PathBuf>,
}

impl<'a> Converter<'a> {
    pub fn new(
        history: HistoryStore,
        options: ConverterOptions,
        synthesizer: &'a dyn Synthesizer,
    ) -> Self {
        Self {
            history,
            options,
            synthesizer: Some(synthesizer),
            planned_outputs: HashSet::new(),
        }
    }

    /// Converter that decides and counts but never calls the service or writes
    pub fn dry_run(history: HistoryStore, options: ConverterOptions) -> Self {
        Self {
            history,
            options,
            synthesizer: None,
            planned_outputs: HashSet::new(),
        }
    }

    pub fn is_dry_run(&self) -> bool {
        self.synthesizer.is_none()
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn into_history(self) -> HistoryStore {
        self.history
    }

    /// Process every input line in order
    pub async fn run<I>(&mut self, lines: I) -> Result<ConversionSummary>
    where
        I: IntoIterator<Item = Result<InputLine>>,
    {
        let mut summary = ConversionSummary::new(self.is_dry_run());

        for line in lines {
            match line? {
                InputLine::Invalid { line, fields } => {
                    warn!(line, fields = ?fields, "Skipping invalid row (fewer than 3 fields)");
                    summary.invalid += 1;
                }
                InputLine::Row(row) => self.process_row(&row, &mut summary).await?,
            }
        }

        if summary.dry_run {
            info!(
                would_convert = summary.converted,
                skipped = summary.skipped,
                invalid = summary.invalid,
                "Dry run complete"
            );
        } else {
            info!(
                converted = summary.converted,
                skipped = summary.skipped,
                invalid = summary.invalid,
                failed = summary.failed,
                "Conversion complete"
            );
        }

        Ok(summary)
    }

    async fn process_row(&mut self, row: &InputRow, summary: &mut ConversionSummary) -> Result<()> {
        let path = output_path(&self.options.output_prefix, &row.filename, self.options.encoding);
        let output_exists = path.exists() || self.planned_outputs.contains(&path);
        let decision = self.history.decide(row, output_exists);

        let reason = match decision {
            ConversionDecision::Skip(reason) => {
                info!(
                    sequence = %row.sequence,
                    "Skipped: {} ({})",
                    row.filename,
                    reason
                );
                summary.skipped += 1;
                return Ok(());
            }
            ConversionDecision::Convert(reason) => reason,
        };

        let Some(synthesizer) = self.synthesizer else {
            info!(
                sequence = %row.sequence,
                chars = row.char_count(),
                "Would convert: {} ({})",
                path.display(),
                reason
            );
            // Later rows must see this one as done, as in a real run
            self.history
                .remember(HistoryEntry::from_row(row, text2wav_common::time::now_iso_local()));
            self.planned_outputs.insert(path);
            summary.converted += 1;
            summary.converted_chars += row.char_count();
            return Ok(());
        };

        match synthesize_to_file(synthesizer, row, &path).await {
            Ok(()) => {
                info!(
                    sequence = %row.sequence,
                    chars = row.char_count(),
                    "Generated audio file: {} ({})",
                    path.display(),
                    reason
                );
                // History failure is fatal: later rows could not be recorded either
                self.history
                    .append(HistoryEntry::from_row(row, text2wav_common::time::now_iso_local()))?;
                summary.converted += 1;
                summary.converted_chars += row.char_count();
            }
            Err(e) => {
                error!(
                    sequence = %row.sequence,
                    code = e.code(),
                    "Failed to generate audio file {}: {}",
                    path.display(),
                    e
                );
                summary.failed += 1;
                summary.failures.push(RowFailure {
                    line: row.line,
                    sequence: row.sequence.clone(),
                    filename: row.filename.clone(),
                    error_code: e.code().to_string(),
                    error_message: e.to_string(),
                });
            }
        }

        Ok(())
    }
}

async fn synthesize_to_file(
    synthesizer: &dyn Synthesizer,
    row: &InputRow,
    path: &Path,
) -> ConvertResult<()> {
    let audio = synthesizer.synthesize(&row.text).await?;
    write_audio(path, &audio)?;
    Ok(())
}
