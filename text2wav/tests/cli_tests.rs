//! End-to-end tests of the text2wav binary
//!
//! Covers exit status for setup failures, dry runs, and a full run against
//! the mock Text-to-Speech endpoint.

mod helpers;

use std::path::Path;
use std::process::Output;

use helpers::{spawn_mock_tts, wav_bytes, MockConfig};
use tempfile::TempDir;
use tokio::process::Command;

/// Run the binary inside `dir` with an isolated config home
async fn run_text2wav(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_text2wav"))
        .args(args)
        .current_dir(dir)
        .env("XDG_CONFIG_HOME", dir.join("config-home"))
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .env_remove("TEXT2WAV_CONFIG")
        .env_remove("TEXT2WAV_OUTPUT_PREFIX")
        .env_remove("TEXT2WAV_HISTORY_FILE")
        .env_remove("TEXT2WAV_API_KEY")
        .env_remove("TEXT2WAV_ENDPOINT")
        .output()
        .await
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

#[tokio::test]
async fn test_missing_input_file_fails() {
    let temp_dir = TempDir::new().unwrap();
    let output = run_text2wav(temp_dir.path(), &["missing.csv", "--dry-run"]).await;

    assert!(!output.status.success());
    assert!(
        stdout(&output).contains("Input file not found"),
        "stdout was: {}",
        stdout(&output)
    );
}

#[tokio::test]
async fn test_missing_argument_is_usage_error() {
    let temp_dir = TempDir::new().unwrap();
    let output = run_text2wav(temp_dir.path(), &[]).await;
    assert!(!output.status.success());
}

#[tokio::test]
async fn test_invalid_setting_fails() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join("in.csv"), "1,a,x\n").unwrap();

    let output = run_text2wav(
        temp_dir.path(),
        &["in.csv", "--dry-run", "--speaking-rate", "9.0"],
    )
    .await;

    assert!(!output.status.success());
    assert!(stdout(&output).contains("speaking_rate"));
}

#[tokio::test]
async fn test_dry_run_reports_characters_and_writes_nothing() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join("in.csv"), "1,a,あいう\n2,b,えお\n").unwrap();

    let output = run_text2wav(temp_dir.path(), &["in.csv", "--dry-run"]).await;

    assert!(output.status.success(), "stdout: {}", stdout(&output));
    assert!(stdout(&output).contains("Characters that would be converted: 5"));
    assert!(!temp_dir.path().join("history.csv").exists());
    assert!(!temp_dir.path().join("ja").exists());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_full_run_then_skip() {
    let server = spawn_mock_tts(MockConfig {
        audio: wav_bytes(64),
        ..Default::default()
    })
    .await;

    let temp_dir = TempDir::new().unwrap();
    std::fs::write(
        temp_dir.path().join("in.csv"),
        "1,greeting,こんにちは\n2,menu/press1,一番を押してください\n",
    )
    .unwrap();

    let args = [
        "in.csv",
        "--endpoint",
        server.base_url.as_str(),
        "--api-key",
        "cli-key",
    ];

    let output = run_text2wav(temp_dir.path(), &args).await;
    assert!(output.status.success(), "stdout: {}", stdout(&output));
    assert!(stdout(&output).contains("Total characters converted: 15"));

    assert!(temp_dir.path().join("ja/greeting.wav").exists());
    assert!(temp_dir.path().join("ja/menu/press1.wav").exists());
    let history = std::fs::read_to_string(temp_dir.path().join("history.csv")).unwrap();
    assert!(history.starts_with("Sequence,Filename,Text,Timestamp,CharCount\n"));
    assert_eq!(history.lines().count(), 3);
    assert_eq!(server.requests().len(), 2);
    assert_eq!(server.requests()[0].query.as_deref(), Some("key=cli-key"));

    // Nothing changed: no requests, zero characters
    let output = run_text2wav(temp_dir.path(), &args).await;
    assert!(output.status.success());
    assert!(stdout(&output).contains("Total characters converted: 0"));
    assert_eq!(server.requests().len(), 2);
}

#[tokio::test]
async fn test_config_file_sets_prefix_and_history() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join("in.csv"), "1,a,abc\n").unwrap();
    std::fs::write(
        temp_dir.path().join("custom.toml"),
        "output_prefix = \"en/\"\nhistory_file = \"logs/h.csv\"\n\n[audio]\nlanguage_code = \"en-US\"\nvoice_name = \"en-US-Standard-B\"\n",
    )
    .unwrap();

    let output = run_text2wav(
        temp_dir.path(),
        &["in.csv", "--config", "custom.toml", "--dry-run"],
    )
    .await;

    assert!(output.status.success(), "stdout: {}", stdout(&output));
    let out = stdout(&output);
    assert!(out.contains("en/a.wav"), "stdout: {}", out);
    assert!(out.contains("en-US-Standard-B"), "stdout: {}", out);
}

#[tokio::test]
async fn test_missing_explicit_config_fails() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join("in.csv"), "1,a,abc\n").unwrap();

    let output = run_text2wav(temp_dir.path(), &["in.csv", "--config", "nope.toml"]).await;
    assert!(!output.status.success());
    assert!(stdout(&output).contains("Config file not found"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_failed_rows_are_listed_and_exit_succeeds() {
    let server = spawn_mock_tts(MockConfig {
        audio: wav_bytes(32),
        fail_marker: Some("BROKEN".to_string()),
        ..Default::default()
    })
    .await;

    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join("in.csv"), "1,ok,fine\n2,bad,BROKEN row\n").unwrap();

    let output = run_text2wav(
        temp_dir.path(),
        &["in.csv", "--endpoint", server.base_url.as_str(), "--api-key", "k"],
    )
    .await;

    let out = stdout(&output);
    assert!(output.status.success(), "stdout: {}", out);
    assert!(out.contains("Some rows failed"), "stdout: {}", out);
    assert!(out.contains("Failed row bad:"), "stdout: {}", out);
    assert!(out.contains("Total characters converted: 4"), "stdout: {}", out);
}
