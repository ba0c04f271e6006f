//! Data models for text2wav
//!
//! - Input rows read from the source CSV
//! - History entries persisted after each conversion
//! - Run summary returned by the converter

pub mod conversion_summary;
pub mod history_entry;
pub mod input_row;

pub use conversion_summary::{ConversionSummary, RowFailure};
pub use history_entry::HistoryEntry;
pub use input_row::{InputLine, InputRow};
