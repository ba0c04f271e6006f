//! Google Cloud Text-to-Speech REST client
//!
//! POST `{endpoint}/v1/text:synthesize` with the voice and audio settings,
//! receive base64-encoded audio in `audioContent`. LINEAR16, MULAW and ALAW
//! responses already carry a WAV header, so the decoded bytes are written
//! to disk as-is.

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use serde::{Deserialize, Serialize};
use text2wav_common::config::{AudioEncoding, AudioSettings};

use super::{Credentials, Synthesizer, TtsError};

const USER_AGENT: &str = concat!("text2wav/", env!("CARGO_PKG_VERSION"));
const SYNTHESIZE_PATH: &str = "/v1/text:synthesize";
const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeRequest<'a> {
    input: SynthesisInput<'a>,
    voice: VoiceSelectionParams<'a>,
    audio_config: AudioConfigParams,
}

#[derive(Debug, Serialize)]
struct SynthesisInput<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceSelectionParams<'a> {
    language_code: &'a str,
    name: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AudioConfigParams {
    audio_encoding: AudioEncoding,
    sample_rate_hertz: u32,
    speaking_rate: f64,
    pitch: f64,
    volume_gain_db: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeResponse {
    #[serde(default)]
    audio_content: Option<String>,
}

/// Google error envelope: `{"error": {"code": 400, "message": "...", "status": "..."}}`
#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
    #[serde(default)]
    status: Option<String>,
}

/// Google Cloud Text-to-Speech client
pub struct GoogleTtsClient {
    http_client: reqwest::Client,
    synthesize_url: String,
    audio: AudioSettings,
    credentials: Credentials,
}

impl GoogleTtsClient {
    pub fn new(
        endpoint: &str,
        audio: AudioSettings,
        credentials: Credentials,
    ) -> Result<Self, TtsError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| TtsError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            synthesize_url: format!("{}{}", endpoint.trim_end_matches('/'), SYNTHESIZE_PATH),
            audio,
            credentials,
        })
    }

    pub fn synthesize_url(&self) -> &str {
        &self.synthesize_url
    }

    fn request_body<'a>(&'a self, text: &'a str) -> SynthesizeRequest<'a> {
        SynthesizeRequest {
            input: SynthesisInput { text },
            voice: VoiceSelectionParams {
                language_code: &self.audio.language_code,
                name: &self.audio.voice_name,
            },
            audio_config: AudioConfigParams {
                audio_encoding: self.audio.audio_encoding,
                sample_rate_hertz: self.audio.sample_rate_hertz,
                speaking_rate: self.audio.speaking_rate,
                pitch: self.audio.pitch,
                volume_gain_db: self.audio.volume_gain_db,
            },
        }
    }
}

/// Pull a readable message out of an error response body
fn error_message(body: &str) -> String {
    match serde_json::from_str::<ApiErrorEnvelope>(body) {
        Ok(envelope) => match envelope.error.status {
            Some(status) => format!("{} ({})", envelope.error.message, status),
            None => envelope.error.message,
        },
        Err(_) => body.trim().to_string(),
    }
}

#[async_trait]
impl Synthesizer for GoogleTtsClient {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, TtsError> {
        tracing::debug!(
            chars = text.chars().count(),
            voice = %self.audio.voice_name,
            "Requesting speech synthesis"
        );

        let request = self
            .http_client
            .post(&self.synthesize_url)
            .json(&self.request_body(text));
        let request = self.credentials.authorize(request).await?;

        let response = request
            .send()
            .await
            .map_err(|e| TtsError::Network(e.to_string()))?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = error_message(&body);
            if status == 401 || status == 403 {
                return Err(TtsError::Auth(message));
            }
            return Err(TtsError::Api(status.as_u16(), message));
        }

        let payload: SynthesizeResponse = response
            .json()
            .await
            .map_err(|e| TtsError::Parse(e.to_string()))?;

        let encoded = payload.audio_content.ok_or(TtsError::EmptyAudio)?;
        let audio = base64::engine::general_purpose::STANDARD
            .decode(encoded.as_bytes())
            .map_err(|e| TtsError::Parse(format!("invalid base64 audio: {}", e)))?;

        if audio.is_empty() {
            return Err(TtsError::EmptyAudio);
        }

        tracing::debug!(bytes = audio.len(), "Synthesis complete");
        Ok(audio)
    }
}
