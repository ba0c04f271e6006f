//! Conversion history and change detection
//!
//! The history file is an append-only CSV with header
//! `Sequence,Filename,Text,Timestamp,CharCount`. It is read fully into memory
//! at startup; when a sequence id occurs more than once the last record wins.
//!
//! # Skip logic
//! A row is synthesized again only when at least one of these holds:
//! 1. its output file is missing
//! 2. its sequence id is not in history
//! 3. the stored text differs from the current text
//!
//! Voice or audio setting changes are not tracked. Delete the history file
//! to force a full re-conversion.

use std::collections::HashMap;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::path::PathBuf;

use text2wav_common::Result;
use tracing::{debug, info, warn};

use crate::models::{HistoryEntry, InputRow};

/// Header row of the history file
pub const HISTORY_HEADER: [&str; 5] = ["Sequence", "Filename", "Text", "Timestamp", "CharCount"];

/// Why a row must be synthesized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvertReason {
    /// Expected output file does not exist
    OutputMissing,
    /// Sequence id never converted before
    NotInHistory,
    /// Text differs from the last conversion
    TextChanged,
}

/// Why a row is left alone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Same text already converted and output present
    Unchanged,
}

/// Change-detection result for one row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionDecision {
    Convert(ConvertReason),
    Skip(SkipReason),
}

impl fmt::Display for ConvertReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConvertReason::OutputMissing => "output missing",
            ConvertReason::NotInHistory => "not in history",
            ConvertReason::TextChanged => "text changed",
        })
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SkipReason::Unchanged => "unchanged",
        })
    }
}

/// In-memory view of the history file plus its location
#[derive(Debug)]
pub struct HistoryStore {
    path: PathBuf,
    entries: HashMap<String, HistoryEntry>,
}

impl HistoryStore {
    /// Load history from `path`; a missing file yields an empty store
    ///
    /// The first record is treated as the header when its first field is
    /// `Sequence`. Records with fewer than three fields are ignored. A missing
    /// timestamp loads as empty, a missing or unparsable count as 0.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let mut entries = HashMap::new();

        if !path.exists() {
            debug!(path = %path.display(), "No history file yet");
            return Ok(Self { path, entries });
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&path)?;

        let mut ignored = 0usize;
        for (index, record) in reader.records().enumerate() {
            let record = record?;

            if index == 0 && record.get(0) == Some(HISTORY_HEADER[0]) {
                continue;
            }

            let (Some(sequence), Some(filename), Some(text)) =
                (record.get(0), record.get(1), record.get(2))
            else {
                ignored += 1;
                continue;
            };

            let char_count = match record.get(4) {
                Some(raw) => raw.trim().parse::<u64>().unwrap_or_else(|_| {
                    warn!(sequence = %sequence, value = %raw, "Unparsable CharCount in history, using 0");
                    0
                }),
                None => 0,
            };

            let entry = HistoryEntry {
                sequence: sequence.to_string(),
                filename: filename.to_string(),
                text: text.to_string(),
                timestamp: record.get(3).unwrap_or_default().to_string(),
                char_count,
            };
            entries.insert(entry.sequence.clone(), entry);
        }

        if ignored > 0 {
            warn!(ignored, "Ignored short records in history file");
        }

        info!(
            path = %path.display(),
            entries = entries.len(),
            "Loaded conversion history"
        );

        Ok(Self { path, entries })
    }

    /// Create the history file with its header if it does not exist or is empty
    pub fn ensure_header(&self) -> Result<()> {
        let needs_header = match std::fs::metadata(&self.path) {
            Ok(meta) => meta.len() == 0,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => true,
            Err(e) => return Err(e.into()),
        };

        if needs_header {
            if let Some(parent) = self.path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            let mut writer = csv::Writer::from_path(&self.path)?;
            writer.write_record(HISTORY_HEADER)?;
            writer.flush()?;
            info!(path = %self.path.display(), "Created history file");
        }
        Ok(())
    }

    pub fn get(&self, sequence: &str) -> Option<&HistoryEntry> {
        self.entries.get(sequence)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Decide whether `row` needs synthesis
    pub fn decide(&self, row: &InputRow, output_exists: bool) -> ConversionDecision {
        if !output_exists {
            return ConversionDecision::Convert(ConvertReason::OutputMissing);
        }

        match self.entries.get(&row.sequence) {
            None => ConversionDecision::Convert(ConvertReason::NotInHistory),
            Some(entry) if entry.text != row.text => {
                ConversionDecision::Convert(ConvertReason::TextChanged)
            }
            Some(_) => ConversionDecision::Skip(SkipReason::Unchanged),
        }
    }

    /// Append one record to the file and update the in-memory view
    pub fn append(&mut self, entry: HistoryEntry) -> Result<()> {
        let file: File = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer.write_record(entry.to_record())?;
        writer.flush()?;

        debug!(sequence = %entry.sequence, "Appended history record");
        self.remember(entry);
        Ok(())
    }

    /// Update the in-memory view only; the file is left untouched
    pub fn remember(&mut self, entry: HistoryEntry) {
        self.entries.insert(entry.sequence.clone(), entry);
    }
}
