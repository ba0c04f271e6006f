//! Text-to-speech synthesis
//!
//! [`Synthesizer`] is the seam between the conversion loop and the cloud
//! service. [`GoogleTtsClient`] implements it against the Google Cloud
//! Text-to-Speech REST API.

pub mod credentials;
pub mod google_client;

pub use credentials::Credentials;
pub use google_client::GoogleTtsClient;

use async_trait::async_trait;
use thiserror::Error;

/// Synthesis client errors
#[derive(Debug, Error)]
pub enum TtsError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Service returned no audio")]
    EmptyAudio,

    #[error("Credential discovery failed: {0}")]
    Credentials(String),
}

/// Turns text into encoded audio bytes
#[async_trait]
pub trait Synthesizer: Send + Sync {
    /// Synthesize `text`, returning the complete audio file contents
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, TtsError>;
}
