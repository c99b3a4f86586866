//! WAV encoding

use super::sample_buffer::{SampleBuffer, SampleData, SampleFormat};
use crate::error::ExtractError;
use hound::{WavSpec, WavWriter};
use std::path::Path;

/// Write a buffer as WAV, reproducing its channel layout, rate and encoding
///
/// # Errors
///
/// Returns `ExtractError::EncodingError` if the file cannot be created or written
pub fn encode_wav(path: &Path, buffer: &SampleBuffer) -> Result<(), ExtractError> {
    let enc_err = |e: hound::Error| {
        ExtractError::EncodingError(format!("Failed to write '{}': {}", path.display(), e))
    };

    let spec = WavSpec {
        channels: buffer.channels,
        sample_rate: buffer.sample_rate,
        bits_per_sample: buffer.bits_per_sample,
        sample_format: match buffer.format {
            SampleFormat::Int => hound::SampleFormat::Int,
            SampleFormat::Float => hound::SampleFormat::Float,
        },
    };

    let mut writer = WavWriter::create(path, spec).map_err(enc_err)?;
    match &buffer.data {
        SampleData::I16(samples) => {
            for &s in samples {
                writer.write_sample(s).map_err(enc_err)?;
            }
        }
        SampleData::I32(samples) => {
            for &s in samples {
                writer.write_sample(s).map_err(enc_err)?;
            }
        }
        SampleData::F32(samples) => {
            for &s in samples {
                writer.write_sample(s).map_err(enc_err)?;
            }
        }
    }
    writer.finalize().map_err(enc_err)?;

    log::debug!(
        "Wrote {} frames to '{}'",
        buffer.frames(),
        path.display()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_readable_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mono.wav");
        let buffer = SampleBuffer::mono_i16(vec![1, -2, 3, -4], 16000).unwrap();

        encode_wav(&path, &buffer).unwrap();

        let reader = hound::WavReader::open(&path).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.sample_rate, 16000);
        assert_eq!(spec.bits_per_sample, 16);
        assert_eq!(reader.len(), 4);
    }

    #[test]
    fn test_unwritable_path_is_encoding_error() {
        let buffer = SampleBuffer::mono_i16(vec![0; 4], 16000).unwrap();
        let result = encode_wav(Path::new("/nonexistent/dir/out.wav"), &buffer);
        assert!(matches!(result, Err(ExtractError::EncodingError(_))));
    }
}
