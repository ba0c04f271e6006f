//! Configuration resolution for text2wav
//!
//! Provides multi-tier resolution with Command line/ENV → TOML → compiled
//! default priority. Command line and environment share a tier because clap
//! reads the `TEXT2WAV_*` variables into the same arguments.

use std::path::PathBuf;

use text2wav_common::config::{AudioEncoding, AudioSettings, CompiledDefaults, TomlConfig};
use text2wav_common::Result;
use tracing::{info, warn};

/// Values supplied on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub output_prefix: Option<String>,
    pub history_file: Option<PathBuf>,
    pub api_key: Option<String>,
    pub endpoint: Option<String>,
    pub voice_name: Option<String>,
    pub language_code: Option<String>,
    pub audio_encoding: Option<AudioEncoding>,
    pub sample_rate_hertz: Option<u32>,
    pub speaking_rate: Option<f64>,
    pub pitch: Option<f64>,
    pub volume_gain_db: Option<f64>,
}

/// Fully resolved run settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub output_prefix: String,
    pub history_file: PathBuf,
    /// None means ambient credentials
    pub api_key: Option<String>,
    pub endpoint: String,
    pub audio: AudioSettings,
}

impl Settings {
    /// Merge overrides, TOML and compiled defaults, then validate
    pub fn resolve(overrides: &CliOverrides, toml_config: &TomlConfig) -> Result<Self> {
        let defaults = CompiledDefaults::default();

        let output_prefix = overrides
            .output_prefix
            .clone()
            .or_else(|| toml_config.output_prefix.clone())
            .unwrap_or(defaults.output_prefix);

        let history_file = overrides
            .history_file
            .clone()
            .or_else(|| toml_config.history_file.clone())
            .unwrap_or(defaults.history_file);

        let endpoint = overrides
            .endpoint
            .clone()
            .or_else(|| toml_config.endpoint.clone())
            .unwrap_or(defaults.endpoint);

        let api_key = resolve_api_key(overrides.api_key.as_deref(), toml_config.api_key.as_deref());

        let mut audio = toml_config.audio.clone();
        if let Some(v) = &overrides.voice_name {
            audio.voice_name = v.clone();
        }
        if let Some(v) = &overrides.language_code {
            audio.language_code = v.clone();
        }
        if let Some(v) = overrides.audio_encoding {
            audio.audio_encoding = v;
        }
        if let Some(v) = overrides.sample_rate_hertz {
            audio.sample_rate_hertz = v;
        }
        if let Some(v) = overrides.speaking_rate {
            audio.speaking_rate = v;
        }
        if let Some(v) = overrides.pitch {
            audio.pitch = v;
        }
        if let Some(v) = overrides.volume_gain_db {
            audio.volume_gain_db = v;
        }
        audio.validate()?;

        Ok(Self {
            output_prefix,
            history_file,
            api_key,
            endpoint,
            audio,
        })
    }
}

/// Resolve the API key
///
/// **Priority:** Command line/ENV → TOML. Returns None when neither holds a
/// valid key, which selects ambient credentials.
pub fn resolve_api_key(cli_key: Option<&str>, toml_key: Option<&str>) -> Option<String> {
    let cli_key = cli_key.filter(|k| is_valid_key(k));
    let toml_key = toml_key.filter(|k| is_valid_key(k));

    if cli_key.is_some() && toml_key.is_some() {
        warn!("API key found in multiple sources: command line/environment, TOML. Using command line/environment.");
    }

    if let Some(key) = cli_key {
        info!("API key loaded from command line/environment");
        return Some(key.to_string());
    }

    if let Some(key) = toml_key {
        info!("API key loaded from TOML config");
        return Some(key.to_string());
    }

    None
}

/// Validate API key (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}
