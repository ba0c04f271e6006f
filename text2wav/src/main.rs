//! text2wav - CSV to speech audio converter
//!
//! Reads `sequence,filename,text` rows from a CSV file and synthesizes one
//! audio file per row through Google Cloud Text-to-Speech. Rows whose text
//! is unchanged since the last run (per the history file) and whose output
//! still exists are skipped.
//!
//! Exit status is non-zero for setup failures (missing input, bad config,
//! credential discovery) and for malformed input CSV. Per-row synthesis
//! failures are logged and do not change the exit status.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use text2wav::config::{CliOverrides, Settings};
use text2wav::models::ConversionSummary;
use text2wav::services::{Converter, ConverterOptions, HistoryStore, InputReader};
use text2wav::tts::{Credentials, GoogleTtsClient};
use text2wav_common::config::{load_config, AudioEncoding, LoadedConfig};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Command-line arguments for text2wav
#[derive(Parser, Debug)]
#[command(name = "text2wav")]
#[command(about = "Convert CSV rows to speech audio files via Google Cloud Text-to-Speech")]
#[command(version)]
struct Args {
    /// Input CSV: sequence,filename,text (no header row)
    input_csv: PathBuf,

    /// TOML config file (default: ~/.config/text2wav/config.toml if present)
    #[arg(short, long, env = "TEXT2WAV_CONFIG")]
    config: Option<PathBuf>,

    /// Prefix prepended to every output filename
    #[arg(short, long, env = "TEXT2WAV_OUTPUT_PREFIX")]
    output_prefix: Option<String>,

    /// History CSV location
    #[arg(long, env = "TEXT2WAV_HISTORY_FILE")]
    history_file: Option<PathBuf>,

    /// Google API key (ambient credentials are used when absent)
    #[arg(long, env = "TEXT2WAV_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Text-to-Speech service base URL
    #[arg(long, env = "TEXT2WAV_ENDPOINT")]
    endpoint: Option<String>,

    /// Voice name, e.g. ja-JP-Standard-A
    #[arg(long)]
    voice: Option<String>,

    /// Language code, e.g. ja-JP
    #[arg(long)]
    language: Option<String>,

    /// Audio encoding: LINEAR16, MP3, OGG_OPUS, MULAW, ALAW
    #[arg(long, value_parser = parse_encoding)]
    encoding: Option<AudioEncoding>,

    /// Output sample rate in Hz
    #[arg(long)]
    sample_rate: Option<u32>,

    /// Speaking rate, 0.25 to 4.0
    #[arg(long)]
    speaking_rate: Option<f64>,

    /// Pitch in semitones, -20.0 to 20.0
    #[arg(long, allow_hyphen_values = true)]
    pitch: Option<f64>,

    /// Volume gain in dB, -96.0 to 16.0
    #[arg(long, allow_hyphen_values = true)]
    volume_gain_db: Option<f64>,

    /// Report what would be converted without calling the service
    #[arg(long)]
    dry_run: bool,

    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long)]
    log_level: Option<String>,
}

impl Args {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            output_prefix: self.output_prefix.clone(),
            history_file: self.history_file.clone(),
            api_key: self.api_key.clone(),
            endpoint: self.endpoint.clone(),
            voice_name: self.voice.clone(),
            language_code: self.language.clone(),
            audio_encoding: self.encoding,
            sample_rate_hertz: self.sample_rate,
            speaking_rate: self.speaking_rate,
            pitch: self.pitch,
            volume_gain_db: self.volume_gain_db,
        }
    }
}

fn parse_encoding(s: &str) -> std::result::Result<AudioEncoding, String> {
    s.parse::<AudioEncoding>().map_err(|e| e.to_string())
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Config is loaded before logging so its [logging] level can apply
    let loaded = load_config(args.config.as_deref());
    let level = args
        .log_level
        .clone()
        .or_else(|| loaded.as_ref().ok().map(|l| l.config.logging.level.clone()))
        .unwrap_or_else(|| "info".to_string());
    init_tracing(&level);

    info!(
        "Starting text2wav v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let result = match loaded.context("Failed to load configuration") {
        Ok(loaded) => run(&args, loaded).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(summary) => {
            report_failures(&summary);
            if summary.dry_run {
                println!("Characters that would be converted: {}", summary.converted_chars);
            } else {
                println!("Total characters converted: {}", summary.converted_chars);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn report_failures(summary: &ConversionSummary) {
    if !summary.has_failures() {
        return;
    }
    warn!(
        failed = summary.failed,
        "Some rows failed; they have no history record and will be retried on the next run"
    );
    for failure in &summary.failures {
        warn!(
            line = failure.line,
            sequence = %failure.sequence,
            code = %failure.error_code,
            "Failed row {}: {}",
            failure.filename,
            failure.error_message
        );
    }
}

async fn run(args: &Args, loaded: LoadedConfig) -> Result<ConversionSummary> {
    if let Some(source) = &loaded.source {
        info!("Configuration: {}", source.display());
    }

    if !args.input_csv.exists() {
        anyhow::bail!("Input file not found: {}", args.input_csv.display());
    }

    let settings = Settings::resolve(&args.overrides(), &loaded.config)
        .context("Invalid configuration")?;
    info!(
        voice = %settings.audio.voice_name,
        encoding = %settings.audio.audio_encoding,
        sample_rate = settings.audio.sample_rate_hertz,
        output_prefix = %settings.output_prefix,
        history = %settings.history_file.display(),
        "Settings resolved"
    );

    let history = HistoryStore::load(&settings.history_file)
        .with_context(|| format!("Failed to read history file {}", settings.history_file.display()))?;

    let options = ConverterOptions {
        output_prefix: settings.output_prefix.clone(),
        encoding: settings.audio.audio_encoding,
    };

    let input = InputReader::open(&args.input_csv)
        .with_context(|| format!("Failed to open input file {}", args.input_csv.display()))?;

    if args.dry_run {
        info!("Dry run: no audio will be synthesized");
        let mut converter = Converter::dry_run(history, options);
        return converter
            .run(input)
            .await
            .context("Error while processing the CSV file");
    }

    history
        .ensure_header()
        .with_context(|| format!("Failed to create history file {}", settings.history_file.display()))?;

    let credentials = Credentials::discover(settings.api_key.clone())
        .await
        .context("Failed to initialize Text-to-Speech client")?;
    let client = GoogleTtsClient::new(&settings.endpoint, settings.audio.clone(), credentials)
        .context("Failed to initialize Text-to-Speech client")?;
    info!(url = %client.synthesize_url(), "Text-to-Speech client ready");

    let mut converter = Converter::new(history, options, &client);
    converter
        .run(input)
        .await
        .context("Error while processing the CSV file")
}
