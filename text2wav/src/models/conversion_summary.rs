//! Run results
//!
//! Counts per outcome plus the list of rows that failed. Printed at the end
//! of every run; the character total is what the service bills for.

/// Details of a row whose conversion failed
#[derive(Debug, Clone)]
pub struct RowFailure {
    pub line: u64,
    pub sequence: String,
    pub filename: String,
    /// Error code (e.g., "NETWORK_ERROR", "IO_ERROR")
    pub error_code: String,
    pub error_message: String,
}

/// Outcome counts for one run
#[derive(Debug, Clone, Default)]
pub struct ConversionSummary {
    /// Rows synthesized (or that would be, in a dry run)
    pub converted: usize,
    /// Rows skipped because nothing changed
    pub skipped: usize,
    /// Records with fewer than three fields
    pub invalid: usize,
    /// Rows whose synthesis or write failed
    pub failed: usize,
    /// Characters sent to the service (or that would be, in a dry run)
    pub converted_chars: u64,
    pub dry_run: bool,
    pub failures: Vec<RowFailure>,
}

impl ConversionSummary {
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Default::default()
        }
    }

    /// Total records seen, valid or not
    pub fn total(&self) -> usize {
        self.converted + self.skipped + self.invalid + self.failed
    }

    /// Whether any row failed and will be retried next run
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}
