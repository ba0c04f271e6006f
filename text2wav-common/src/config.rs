//! Bootstrap configuration loading and config file discovery
//!
//! Settings are layered: command line → environment → TOML file → compiled
//! defaults. This module owns the TOML layer and the compiled defaults; the
//! command line and environment layers are merged by the binary.
//!
//! A missing config file is never fatal. The default location
//! (`~/.config/text2wav/config.toml` on Linux) is probed and silently skipped
//! when absent; an explicitly named file must exist and parse.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info, warn};

/// Directory name under the platform config dir
pub const CONFIG_DIR_NAME: &str = "text2wav";

/// Config file name inside [`CONFIG_DIR_NAME`]
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Compiled-in fallback values
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub output_prefix: String,
    pub history_file: PathBuf,
    pub endpoint: String,
    pub log_level: String,
}

impl Default for CompiledDefaults {
    fn default() -> Self {
        Self {
            output_prefix: "ja/".to_string(),
            history_file: PathBuf::from("history.csv"),
            endpoint: "https://texttospeech.googleapis.com".to_string(),
            log_level: default_log_level(),
        }
    }
}

/// Bootstrap configuration loaded from TOML file
///
/// Every field is optional. Missing fields fall back to [`CompiledDefaults`].
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TomlConfig {
    /// Prefix prepended to every output filename (string concatenation)
    #[serde(default)]
    pub output_prefix: Option<String>,

    /// History CSV location
    #[serde(default)]
    pub history_file: Option<PathBuf>,

    /// Google API key. When absent, ambient credentials are used.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Text-to-Speech service base URL
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Voice and audio output configuration (optional)
    #[serde(default)]
    pub audio: AudioSettings,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Audio encodings accepted by the synthesis API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub enum AudioEncoding {
    /// 16-bit signed little-endian PCM with WAV header
    #[default]
    #[serde(rename = "LINEAR16")]
    Linear16,
    #[serde(rename = "MP3")]
    Mp3,
    #[serde(rename = "OGG_OPUS")]
    OggOpus,
    /// 8-bit G.711 mu-law with WAV header
    #[serde(rename = "MULAW")]
    Mulaw,
    /// 8-bit G.711 A-law with WAV header
    #[serde(rename = "ALAW")]
    Alaw,
}

impl AudioEncoding {
    /// Name used on the wire
    pub fn as_api_str(&self) -> &'static str {
        match self {
            AudioEncoding::Linear16 => "LINEAR16",
            AudioEncoding::Mp3 => "MP3",
            AudioEncoding::OggOpus => "OGG_OPUS",
            AudioEncoding::Mulaw => "MULAW",
            AudioEncoding::Alaw => "ALAW",
        }
    }

    /// File extension for audio produced with this encoding
    pub fn file_extension(&self) -> &'static str {
        match self {
            AudioEncoding::Linear16 | AudioEncoding::Mulaw | AudioEncoding::Alaw => "wav",
            AudioEncoding::Mp3 => "mp3",
            AudioEncoding::OggOpus => "ogg",
        }
    }
}

impl fmt::Display for AudioEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_api_str())
    }
}

impl FromStr for AudioEncoding {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().replace('-', "_").as_str() {
            "LINEAR16" => Ok(AudioEncoding::Linear16),
            "MP3" => Ok(AudioEncoding::Mp3),
            "OGG_OPUS" => Ok(AudioEncoding::OggOpus),
            "MULAW" => Ok(AudioEncoding::Mulaw),
            "ALAW" => Ok(AudioEncoding::Alaw),
            other => Err(Error::InvalidInput(format!(
                "Unknown audio encoding '{}' (expected LINEAR16, MP3, OGG_OPUS, MULAW or ALAW)",
                other
            ))),
        }
    }
}

/// Voice selection and audio output settings
///
/// Changing the voice does not invalidate history; delete the history file
/// to force a full re-conversion.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AudioSettings {
    pub audio_encoding: AudioEncoding,
    pub sample_rate_hertz: u32,
    /// 1.0 is normal speed
    pub speaking_rate: f64,
    /// Semitones
    pub pitch: f64,
    /// Decibels relative to normal amplitude
    pub volume_gain_db: f64,
    pub language_code: String,
    pub voice_name: String,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            audio_encoding: AudioEncoding::Linear16,
            sample_rate_hertz: 8000,
            speaking_rate: 1.0,
            pitch: 0.0,
            volume_gain_db: 0.0,
            language_code: "ja-JP".to_string(),
            voice_name: "ja-JP-Standard-A".to_string(),
        }
    }
}

impl AudioSettings {
    pub const SPEAKING_RATE_RANGE: (f64, f64) = (0.25, 4.0);
    pub const PITCH_RANGE: (f64, f64) = (-20.0, 20.0);
    pub const VOLUME_GAIN_DB_RANGE: (f64, f64) = (-96.0, 16.0);

    /// Reject values the synthesis API would refuse
    pub fn validate(&self) -> Result<()> {
        check_range("speaking_rate", self.speaking_rate, Self::SPEAKING_RATE_RANGE)?;
        check_range("pitch", self.pitch, Self::PITCH_RANGE)?;
        check_range("volume_gain_db", self.volume_gain_db, Self::VOLUME_GAIN_DB_RANGE)?;

        if self.sample_rate_hertz == 0 {
            return Err(Error::Config("sample_rate_hertz must be positive".to_string()));
        }
        if self.language_code.trim().is_empty() {
            return Err(Error::Config("language_code must not be empty".to_string()));
        }
        if self.voice_name.trim().is_empty() {
            return Err(Error::Config("voice_name must not be empty".to_string()));
        }
        Ok(())
    }
}

fn check_range(name: &str, value: f64, (min, max): (f64, f64)) -> Result<()> {
    if !(min..=max).contains(&value) {
        return Err(Error::Config(format!(
            "{} = {} is out of range [{}, {}]",
            name, value, min, max
        )));
    }
    Ok(())
}

/// Default config file location for the platform, if one can be determined
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Read and parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Failed to read config file {}: {}", path.display(), e)))?;

    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Failed to parse config file {}: {}", path.display(), e)))
}

/// Config plus the file it came from (None when running on defaults)
#[derive(Debug, Clone, Default)]
pub struct LoadedConfig {
    pub config: TomlConfig,
    pub source: Option<PathBuf>,
}

/// Locate and load the bootstrap config
///
/// - `explicit`: path given on the command line; must exist
/// - otherwise the platform default path is tried; absence means defaults
pub fn load_config(explicit: Option<&Path>) -> Result<LoadedConfig> {
    if let Some(path) = explicit {
        if !path.exists() {
            return Err(Error::Config(format!("Config file not found: {}", path.display())));
        }
        let config = load_toml_config(path)?;
        info!("Loaded configuration from {}", path.display());
        return Ok(LoadedConfig {
            config,
            source: Some(path.to_path_buf()),
        });
    }

    match default_config_path() {
        Some(path) if path.exists() => {
            let config = load_toml_config(&path)?;
            info!("Loaded configuration from {}", path.display());
            Ok(LoadedConfig {
                config,
                source: Some(path),
            })
        }
        Some(path) => {
            debug!("No config file at {}, using defaults", path.display());
            Ok(LoadedConfig::default())
        }
        None => {
            warn!("Could not determine config directory, using defaults");
            Ok(LoadedConfig::default())
        }
    }
}
