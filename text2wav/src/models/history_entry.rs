//! History log entries

use crate::models::InputRow;

/// One line of the history CSV
///
/// Column order matches [`crate::services::history_store::HISTORY_HEADER`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub sequence: String,
    pub filename: String,
    pub text: String,
    /// ISO-8601 local time of the conversion; empty for legacy rows
    pub timestamp: String,
    pub char_count: u64,
}

impl HistoryEntry {
    /// Entry recording a successful conversion of `row` at `timestamp`
    pub fn from_row(row: &InputRow, timestamp: impl Into<String>) -> Self {
        Self {
            sequence: row.sequence.clone(),
            filename: row.filename.clone(),
            text: row.text.clone(),
            timestamp: timestamp.into(),
            char_count: row.char_count(),
        }
    }

    /// Fields in file column order
    pub fn to_record(&self) -> [String; 5] {
        [
            self.sequence.clone(),
            self.filename.clone(),
            self.text.clone(),
            self.timestamp.clone(),
            self.char_count.to_string(),
        ]
    }
}
