//! WAV payloads for tests

use std::io::Cursor;
use std::path::Path;

/// Mono 16-bit 8 kHz WAV containing a short ramp
pub fn wav_bytes(samples: usize) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 8000,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
        for i in 0..samples {
            writer.write_sample((i % 128) as i16 * 64).unwrap();
        }
        writer.finalize().unwrap();
    }
    cursor.into_inner()
}

/// Read back a WAV file, returning its spec and sample count
pub fn read_wav_samples(path: &Path) -> (hound::WavSpec, usize) {
    let reader = hound::WavReader::open(path).unwrap();
    let spec = reader.spec();
    let count = reader.len() as usize;
    (spec, count)
}
