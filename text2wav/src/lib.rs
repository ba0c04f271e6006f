//! text2wav library interface
//!
//! Converts (sequence, filename, text) rows from a CSV file into speech audio
//! files through a cloud text-to-speech service, skipping rows already
//! converted according to a local history log.
//!
//! Pipeline: CSV reader → history lookup → conditional API call → file writer
//! → history append.

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod tts;

pub use crate::error::{ConvertError, ConvertResult};
