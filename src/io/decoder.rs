//! Audio decoding
//!
//! WAV files are read with hound in their native encoding, so an extracted
//! section can be written back without any sample conversion. Other
//! containers go through Symphonia and come out as interleaved `f32`.

use super::sample_buffer::{SampleBuffer, SampleData};
use crate::error::ExtractError;
use hound::WavReader;
use std::fs::File;
use std::path::Path;
use symphonia::core::audio::SampleBuffer as InterleavedBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// Decode an audio file into a [`SampleBuffer`]
///
/// Dispatches on the file extension: `.wav` (any case) is decoded
/// bit-exactly, everything else is probed by Symphonia.
///
/// # Errors
///
/// Returns `ExtractError::DecodingError` if the file cannot be opened or
/// decoded, `ExtractError::InvalidInput` if the decoded stream is malformed
pub fn decode_audio(path: &Path) -> Result<SampleBuffer, ExtractError> {
    log::debug!("Decoding audio file: {}", path.display());

    if is_wav(path) {
        decode_wav(path)
    } else {
        decode_with_symphonia(path)
    }
}

/// `true` if the path has a `.wav` extension
pub fn is_wav(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("wav"))
        .unwrap_or(false)
}

/// Decode a WAV file, keeping the native sample encoding
pub fn decode_wav(path: &Path) -> Result<SampleBuffer, ExtractError> {
    let mut reader = WavReader::open(path).map_err(|e| {
        ExtractError::DecodingError(format!("Failed to decode '{}' as a WAV: {}", path.display(), e))
    })?;
    let spec = reader.spec();
    let read_err = |e: hound::Error| {
        ExtractError::DecodingError(format!("Failed to read samples from '{}': {}", path.display(), e))
    };

    let data = match (spec.sample_format, spec.bits_per_sample) {
        (hound::SampleFormat::Float, 32) => SampleData::F32(
            reader
                .samples::<f32>()
                .collect::<Result<Vec<_>, _>>()
                .map_err(read_err)?,
        ),
        (hound::SampleFormat::Int, 16) => SampleData::I16(
            reader
                .samples::<i16>()
                .collect::<Result<Vec<_>, _>>()
                .map_err(read_err)?,
        ),
        (hound::SampleFormat::Int, 8 | 24 | 32) => SampleData::I32(
            reader
                .samples::<i32>()
                .collect::<Result<Vec<_>, _>>()
                .map_err(read_err)?,
        ),
        (format, bits) => {
            return Err(ExtractError::DecodingError(format!(
                "Unsupported WAV encoding in '{}': {:?} {}-bit",
                path.display(),
                format,
                bits
            )))
        }
    };

    log::debug!(
        "WAV spec: {} channels, {} Hz, {}-bit {:?}, {} samples",
        spec.channels,
        spec.sample_rate,
        spec.bits_per_sample,
        spec.sample_format,
        data.len()
    );

    SampleBuffer::new(data, spec.channels, spec.sample_rate, spec.bits_per_sample)
}

/// Decode any container Symphonia can probe into interleaved `f32`
pub fn decode_with_symphonia(path: &Path) -> Result<SampleBuffer, ExtractError> {
    let decode_err = |e: SymphoniaError| {
        ExtractError::DecodingError(format!("Failed to decode '{}': {}", path.display(), e))
    };

    let src = File::open(path).map_err(|e| {
        ExtractError::DecodingError(format!("Failed to open '{}': {}", path.display(), e))
    })?;
    let mss = MediaSourceStream::new(Box::new(src), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let meta_opts: MetadataOptions = Default::default();
    let fmt_opts: FormatOptions = Default::default();

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &fmt_opts, &meta_opts)
        .map_err(decode_err)?;
    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| {
            ExtractError::DecodingError(format!(
                "No supported audio tracks found in '{}'",
                path.display()
            ))
        })?;

    let track_id = track.id;
    let codec_params = track.codec_params.clone();
    let mut decoder = symphonia::default::get_codecs()
        .make(&codec_params, &DecoderOptions::default())
        .map_err(decode_err)?;

    let mut sample_rate = codec_params.sample_rate;
    let mut channels = codec_params.channels.map(|c| c.count());
    let mut samples: Vec<f32> = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(e) if is_end_of_stream(&e) => break,
            Err(e) => return Err(decode_err(e)),
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                let spec = *decoded.spec();
                sample_rate.get_or_insert(spec.rate);
                channels.get_or_insert(spec.channels.count());

                let mut buf = InterleavedBuffer::<f32>::new(decoded.capacity() as u64, spec);
                buf.copy_interleaved_ref(decoded);
                samples.extend_from_slice(buf.samples());
            }
            Err(SymphoniaError::DecodeError(e)) => {
                // Corrupted packets are skipped
                log::warn!("Skipping undecodable packet in '{}': {}", path.display(), e);
                continue;
            }
            Err(e) => return Err(decode_err(e)),
        }
    }

    let sample_rate = sample_rate.ok_or_else(|| {
        ExtractError::DecodingError(format!("Unknown sample rate in '{}'", path.display()))
    })?;
    let channels = channels.unwrap_or(1);
    let channels = u16::try_from(channels).map_err(|_| {
        ExtractError::DecodingError(format!("Too many channels in '{}': {}", path.display(), channels))
    })?;

    log::debug!(
        "Decoded '{}': {} channels, {} Hz, {} samples",
        path.display(),
        channels,
        sample_rate,
        samples.len()
    );

    SampleBuffer::new(SampleData::F32(samples), channels, sample_rate, 32)
}

/// Symphonia reports the end of a stream as an unexpected-EOF I/O error
fn is_end_of_stream(err: &SymphoniaError) -> bool {
    matches!(err, SymphoniaError::IoError(e) if e.kind() == std::io::ErrorKind::UnexpectedEof)
}
