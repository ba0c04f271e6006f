//! Conversion pipeline services
//!
//! - `input_reader`: source CSV → classified rows
//! - `history_store`: history CSV load, change detection, append
//! - `output_writer`: output path construction and audio file writes
//! - `converter`: drives the pipeline row by row

pub mod converter;
pub mod history_store;
pub mod input_reader;
pub mod output_writer;

pub use converter::{Converter, ConverterOptions};
pub use history_store::{ConversionDecision, ConvertReason, HistoryStore, SkipReason, HISTORY_HEADER};
pub use input_reader::InputReader;
pub use output_writer::{output_path, write_audio};
