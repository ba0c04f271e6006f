//! In-memory synthesizer

use std::sync::Mutex;

use async_trait::async_trait;
use text2wav::tts::{Synthesizer, TtsError};

use super::audio::wav_bytes;

/// Returns a fixed WAV payload and records every requested text
///
/// Texts containing the fail marker produce an API error instead.
pub struct FakeSynthesizer {
    calls: Mutex<Vec<String>>,
    fail_marker: Option<String>,
    audio: Vec<u8>,
}

impl FakeSynthesizer {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_marker: None,
            audio: wav_bytes(80),
        }
    }

    pub fn failing_on(marker: &str) -> Self {
        Self {
            fail_marker: Some(marker.to_string()),
            ..Self::new()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn audio(&self) -> &[u8] {
        &self.audio
    }
}

#[async_trait]
impl Synthesizer for FakeSynthesizer {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, TtsError> {
        self.calls.lock().unwrap().push(text.to_string());

        if let Some(marker) = &self.fail_marker {
            if text.contains(marker.as_str()) {
                return Err(TtsError::Api(500, "synthetic failure".to_string()));
            }
        }
        Ok(self.audio.clone())
    }
}
