//! Error types for text2wav
//!
//! Per-row failures are reported as [`ConvertError`] and never abort a run.
//! Setup failures surface as `text2wav_common::Error`.

use thiserror::Error;

use crate::tts::TtsError;

/// Failure converting a single row
#[derive(Debug, Error)]
pub enum ConvertError {
    /// Synthesis request failed
    #[error("Synthesis failed: {0}")]
    Tts(#[from] TtsError),

    /// Audio file could not be written
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConvertError {
    /// Short machine-readable code for summaries
    pub fn code(&self) -> &'static str {
        match self {
            ConvertError::Tts(TtsError::Network(_)) => "NETWORK_ERROR",
            ConvertError::Tts(TtsError::Auth(_)) => "AUTH_ERROR",
            ConvertError::Tts(TtsError::Api(_, _)) => "API_ERROR",
            ConvertError::Tts(TtsError::Parse(_)) => "PARSE_ERROR",
            ConvertError::Tts(TtsError::EmptyAudio) => "EMPTY_AUDIO",
            ConvertError::Tts(TtsError::Credentials(_)) => "CREDENTIALS_ERROR",
            ConvertError::Io(_) => "IO_ERROR",
        }
    }
}

/// Result type for per-row conversion
pub type ConvertResult<T> = Result<T, ConvertError>;
