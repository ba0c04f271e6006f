//! Output file paths and audio writes

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use text2wav_common::config::AudioEncoding;

/// Build the output path for a row
///
/// The prefix is concatenated, not joined: `"ja/"` + `"greeting"` gives
/// `ja/greeting.wav`, while `"take1_"` + `"greeting"` gives `take1_greeting.wav`.
pub fn output_path(prefix: &str, filename: &str, encoding: AudioEncoding) -> PathBuf {
    PathBuf::from(format!("{}{}.{}", prefix, filename, encoding.file_extension()))
}

/// Create the parent directory of `path` if needed
pub fn ensure_parent_dir(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent),
        _ => Ok(()),
    }
}

/// Write audio bytes to `path`
///
/// Bytes go to a `.part` sibling first and are renamed into place, so an
/// interrupted write never leaves a file that looks complete.
pub fn write_audio(path: &Path, audio: &[u8]) -> io::Result<()> {
    ensure_parent_dir(path)?;

    let mut partial = path.as_os_str().to_owned();
    partial.push(".part");
    let partial = PathBuf::from(partial);

    fs::write(&partial, audio)?;
    if let Err(e) = fs::rename(&partial, path) {
        let _ = fs::remove_file(&partial);
        return Err(e);
    }

    tracing::debug!(path = %path.display(), bytes = audio.len(), "Wrote audio file");
    Ok(())
}
