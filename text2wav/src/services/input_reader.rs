//! Source CSV reader
//!
//! The input file has no header row. Each record is `sequence,filename,text`
//! with standard CSV quoting; extra fields are ignored and records with fewer
//! than three fields are reported as [`InputLine::Invalid`].
//!
//! Blank lines are reported as invalid records with no fields. Line numbers
//! are physical line numbers in the file, counting blank lines and newlines
//! inside quoted fields.

use std::collections::VecDeque;
use std::fs::File;
use std::io::{Cursor, Read};
use std::path::Path;
use std::sync::Arc;

use text2wav_common::{Error, Result};

use crate::models::{InputLine, InputRow};

/// Streaming reader over the input CSV, in file order
///
/// The file is buffered in memory so record offsets can be mapped back to
/// physical lines.
pub struct InputReader {
    data: Arc<[u8]>,
    records: csv::StringRecordsIntoIter<Cursor<Arc<[u8]>>>,
    lines: LineCounter,
    /// Physical line the previous record ended on (0 before the first)
    last_line: u64,
    pending: VecDeque<InputLine>,
    finished: bool,
}

impl InputReader {
    /// Open an input file
    ///
    /// A missing file is a configuration problem, reported as `InvalidInput`.
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::InvalidInput(format!(
                "Input file not found: {}",
                path.display()
            )));
        }
        Self::from_reader(File::open(path)?)
    }

    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut buffer = Vec::new();
        reader.read_to_end(&mut buffer)?;
        let data: Arc<[u8]> = Arc::from(buffer);

        let records = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(Cursor::new(Arc::clone(&data)))
            .into_records();

        Ok(Self {
            data,
            records,
            lines: LineCounter::default(),
            last_line: 0,
            pending: VecDeque::new(),
            finished: false,
        })
    }

    fn queue_record(&mut self, record: &csv::StringRecord) {
        // The reported position may precede skipped blank lines
        let reported = record.position().map_or(0, |p| p.byte() as usize);
        let start = skip_terminators(&self.data, reported);
        let line = self.lines.line_at(&self.data, start);

        self.queue_blank_lines(line);
        self.pending.push_back(classify(line, record));

        let end = self.records.reader().position().byte() as usize;
        let content_end = trim_terminators(&self.data, end, start);
        let last_byte = content_end.saturating_sub(1).max(start);
        self.last_line = self.lines.line_at(&self.data, last_byte);
    }

    fn queue_trailing_blank_lines(&mut self) {
        let counted = self.lines.line_at(&self.data, self.data.len());
        let final_line = match self.data.last() {
            None => 0,
            Some(b'\n') => counted - 1,
            Some(_) => counted,
        };
        self.queue_blank_lines(final_line + 1);
    }

    /// Queue every line between the previous record and `next_line`
    fn queue_blank_lines(&mut self, next_line: u64) {
        for line in (self.last_line + 1)..next_line {
            self.pending.push_back(InputLine::Invalid {
                line,
                fields: Vec::new(),
            });
        }
    }
}

/// Monotonic byte offset to 1-based line number mapping
#[derive(Debug, Default)]
struct LineCounter {
    offset: usize,
    newlines: u64,
}

impl LineCounter {
    fn line_at(&mut self, data: &[u8], offset: usize) -> u64 {
        let offset = offset.min(data.len());
        if offset > self.offset {
            self.newlines += data[self.offset..offset]
                .iter()
                .filter(|&&b| b == b'\n')
                .count() as u64;
            self.offset = offset;
        }
        self.newlines + 1
    }
}

fn is_terminator(byte: u8) -> bool {
    byte == b'\n' || byte == b'\r'
}

fn skip_terminators(data: &[u8], mut offset: usize) -> usize {
    while offset < data.len() && is_terminator(data[offset]) {
        offset += 1;
    }
    offset
}

fn trim_terminators(data: &[u8], mut end: usize, start: usize) -> usize {
    end = end.min(data.len());
    while end > start && is_terminator(data[end - 1]) {
        end -= 1;
    }
    end
}

fn classify(line: u64, record: &csv::StringRecord) -> InputLine {
    match (record.get(0), record.get(1), record.get(2)) {
        (Some(sequence), Some(filename), Some(text)) => {
            InputLine::Row(InputRow::new(line, sequence, filename, text))
        }
        _ => InputLine::Invalid {
            line,
            fields: record.iter().map(str::to_string).collect(),
        },
    }
}

impl Iterator for InputReader {
    type Item = Result<InputLine>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(line) = self.pending.pop_front() {
                return Some(Ok(line));
            }
            if self.finished {
                return None;
            }
            match self.records.next() {
                Some(Ok(record)) => self.queue_record(&record),
                Some(Err(e)) => return Some(Err(Error::from(e))),
                None => {
                    self.finished = true;
                    self.queue_trailing_blank_lines();
                }
            }
        }
    }
}
