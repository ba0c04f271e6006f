//! Test Helper Utilities
//!
//! Shared utilities for testing text2wav

#![allow(dead_code)]

pub mod audio;
pub mod fake_synthesizer;
pub mod mock_tts_server;

// Re-export commonly used items
pub use audio::{read_wav_samples, wav_bytes};
pub use fake_synthesizer::FakeSynthesizer;
pub use mock_tts_server::{spawn_mock_tts, MockConfig, MockTtsServer, RecordedRequest};
