//! Credential selection for the synthesis API
//!
//! An API key is used when one is configured. Otherwise an OAuth token is
//! obtained through ambient discovery (`GOOGLE_APPLICATION_CREDENTIALS`,
//! gcloud user credentials, or the GCE metadata server).

use std::fmt;
use std::sync::Arc;

use gcp_auth::TokenProvider;

use super::TtsError;

/// OAuth scope required by the Text-to-Speech API
pub const CLOUD_PLATFORM_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";

/// How requests are authorized
#[derive(Clone)]
pub enum Credentials {
    /// Sent as the `key` query parameter
    ApiKey(String),
    /// Bearer token from the discovered provider, refreshed on demand
    Ambient(Arc<dyn TokenProvider>),
}

impl Credentials {
    /// Pick credentials: a usable API key wins, else ambient discovery
    pub async fn discover(api_key: Option<String>) -> Result<Self, TtsError> {
        if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
            tracing::info!("Using API key authentication");
            return Ok(Credentials::ApiKey(key));
        }

        let provider = gcp_auth::provider()
            .await
            .map_err(|e| TtsError::Credentials(e.to_string()))?;

        tracing::info!("Using ambient Google credentials");
        Ok(Credentials::Ambient(provider))
    }

    /// Attach authorization to an outgoing request
    pub async fn authorize(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::RequestBuilder, TtsError> {
        match self {
            Credentials::ApiKey(key) => Ok(request.query(&[("key", key.as_str())])),
            Credentials::Ambient(provider) => {
                let token = provider
                    .token(&[CLOUD_PLATFORM_SCOPE])
                    .await
                    .map_err(|e| TtsError::Auth(e.to_string()))?;
                Ok(request.bearer_auth(token.as_str()))
            }
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Credentials::ApiKey(_) => "api_key",
            Credentials::Ambient(_) => "ambient",
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::ApiKey(key) => f
                .debug_tuple("ApiKey")
                .field(&format!("<redacted, {} chars>", key.len()))
                .finish(),
            Credentials::Ambient(_) => f.write_str("Ambient"),
        }
    }
}
