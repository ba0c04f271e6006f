//! Input rows from the source CSV

/// One data row: `sequence,filename,text`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputRow {
    /// 1-based line number in the source file
    pub line: u64,
    /// Opaque key identifying the row across runs
    pub sequence: String,
    /// Output file stem (prefix and extension are added later)
    pub filename: String,
    /// Text to synthesize
    pub text: String,
}

impl InputRow {
    pub fn new(
        line: u64,
        sequence: impl Into<String>,
        filename: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            line,
            sequence: sequence.into(),
            filename: filename.into(),
            text: text.into(),
        }
    }

    /// Number of characters billed for this row (Unicode scalar values)
    pub fn char_count(&self) -> u64 {
        self.text.chars().count() as u64
    }
}

/// A record from the input file, classified
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputLine {
    /// Record with at least three fields
    Row(InputRow),
    /// Record with fewer than three fields; skipped
    Invalid { line: u64, fields: Vec<String> },
}
