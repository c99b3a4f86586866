//! # Loudest Section
//!
//! Extracts the loudest fixed-length section of a PCM recording. Typical use
//! is trimming silence-padded recordings of a single spoken word down to the
//! region that actually contains speech.
//!
//! ## Features
//!
//! - **Energy profile**: sliding-window sum of squares in O(n), exact for integer PCM
//! - **Loudest window**: maximum search with a minimum-volume gate
//! - **Multi-channel**: explicit channel policy (sum, mono downmix, reference channel)
//! - **Batch**: glob input, parallel per-file processing, aggregated report
//!
//! ## Quick Start
//!
//! ```no_run
//! use loudest_section::{extract_loudest_section, Extraction, ExtractConfig};
//! use loudest_section::io::{decode_audio, encode_wav};
//! use std::path::Path;
//!
//! let buffer = decode_audio(Path::new("yes_0001.wav"))?;
//!
//! match extract_loudest_section(&buffer, &ExtractConfig::default())? {
//!     Extraction::Selected(section) => encode_wav(Path::new("out/yes_0001.wav"), &section.segment)?,
//!     Extraction::Skipped { peak, .. } => println!("too quiet ({:.1})", peak),
//! }
//! # Ok::<(), loudest_section::ExtractError>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Decode → Energy Profile → Loudest Window (+ gate) → Slice → Encode
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod batch;
pub mod config;
pub mod energy;
pub mod error;
pub mod io;
pub mod preprocessing;

// Re-export main types
pub use batch::{run_batch, BatchReport, FileOutcome};
pub use config::{BatchConfig, ExtractConfig, ShortInputPolicy, Threshold};
pub use energy::{compute_energy_profile, select_loudest_window, Selection};
pub use error::ExtractError;
pub use io::{SampleBuffer, SampleData};
pub use preprocessing::ChannelPolicy;

use energy::sample::{Energy, EnergySample};
use energy::{compute_frame_energy_profile, find_peak};

/// The loudest section of a recording
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    /// Start frame of the section in the source recording
    pub offset: usize,
    /// Section length in frames
    pub window_length: usize,
    /// Energy of the section
    pub peak: f64,
    /// Energy threshold it was gated against
    pub threshold: f64,
    /// Extracted frames, same layout and encoding as the source
    pub segment: SampleBuffer,
}

impl Section {
    /// Start of the section in seconds
    pub fn start_seconds(&self) -> f64 {
        self.offset as f64 / self.segment.sample_rate as f64
    }
}

/// Outcome of extracting one recording
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    /// Loudest window met the threshold
    Selected(Section),
    /// Loudest window was below the threshold; nothing to write
    Skipped {
        /// Energy of the loudest window
        peak: f64,
        /// Energy threshold it was gated against
        threshold: f64,
    },
}

/// Window length in samples for a duration: `round(sample_rate * duration_ms / 1000)`
///
/// # Example
///
/// ```
/// use loudest_section::window_length_for;
///
/// assert_eq!(window_length_for(16000, 1000), 16000);
/// assert_eq!(window_length_for(44100, 10), 441);
/// assert_eq!(window_length_for(22050, 1), 22); // 22.05 rounds down
/// ```
pub fn window_length_for(sample_rate: u32, duration_ms: u32) -> usize {
    ((sample_rate as u64 * duration_ms as u64 + 500) / 1000) as usize
}

/// Extract the loudest section of a decoded recording
///
/// # Arguments
///
/// * `buffer` - Decoded recording (any channel count, native encoding)
/// * `config` - Section length, threshold, channel and short-input policies
///
/// # Returns
///
/// `Extraction::Selected` with the section, or `Extraction::Skipped` when the
/// loudest window is below the threshold
///
/// # Errors
///
/// Returns `ExtractError::InvalidInput` for an empty recording, a float
/// recording containing NaN or infinite samples, or invalid configuration,
/// `ExtractError::InvalidWindow` when the window rounds to zero samples or
/// (with `ShortInputPolicy::Reject`) exceeds the recording
///
/// # Example
///
/// ```
/// use loudest_section::{extract_loudest_section, Extraction, ExtractConfig, SampleBuffer, SampleData, Threshold};
///
/// // 7 samples at 1 kHz, 3 ms window
/// let buffer = SampleBuffer::mono_i16(vec![0, 0, 5, 5, 5, 0, 0], 1000)?;
/// let config = ExtractConfig {
///     desired_length_ms: 3,
///     threshold: Threshold::Energy(50.0),
///     ..ExtractConfig::default()
/// };
///
/// match extract_loudest_section(&buffer, &config)? {
///     Extraction::Selected(section) => {
///         assert_eq!(section.offset, 2);
///         assert_eq!(section.peak, 75.0);
///         assert_eq!(section.segment.data, SampleData::I16(vec![5, 5, 5]));
///     }
///     Extraction::Skipped { .. } => unreachable!(),
/// }
/// # Ok::<(), loudest_section::ExtractError>(())
/// ```
pub fn extract_loudest_section(
    buffer: &SampleBuffer,
    config: &ExtractConfig,
) -> Result<Extraction, ExtractError> {
    config.validate()?;

    if buffer.data.is_empty() {
        return Err(ExtractError::InvalidInput("Empty audio samples".to_string()));
    }

    // A NaN window compares neither above nor below anything
    if let SampleData::F32(samples) = &buffer.data {
        if let Some(index) = samples.iter().position(|s| !s.is_finite()) {
            return Err(ExtractError::InvalidInput(format!(
                "Non-finite sample {} at index {}",
                samples[index], index
            )));
        }
    }

    let frames = buffer.frames();
    let requested = window_length_for(buffer.sample_rate, config.desired_length_ms);

    let window_length = if requested > frames {
        match config.short_input {
            ShortInputPolicy::WholeBuffer => {
                log::debug!(
                    "Recording has {} frames, shorter than the {}-frame window; using all of it",
                    frames,
                    requested
                );
                frames
            }
            ShortInputPolicy::Reject => {
                return Err(ExtractError::InvalidWindow {
                    window_length: requested,
                    sample_count: frames,
                })
            }
        }
    } else {
        requested
    };

    let channels = buffer.channels as usize;
    let policy = config.channel_policy;
    let threshold = config
        .threshold
        .to_energy(window_length, buffer.full_scale(), channels, policy);

    log::debug!(
        "Extracting {} of {} frames ({} ch, {} Hz), threshold={:.3}, channels={}",
        window_length,
        frames,
        buffer.channels,
        buffer.sample_rate,
        threshold,
        config.channel_policy
    );

    let located = match &buffer.data {
        SampleData::I16(s) => locate(s, channels, policy, window_length, threshold)?,
        SampleData::I32(s) => locate(s, channels, policy, window_length, threshold)?,
        SampleData::F32(s) => locate(s, channels, policy, window_length, threshold)?,
    };

    match located {
        Located::Loud(selection) => Ok(Extraction::Selected(Section {
            offset: selection.offset,
            window_length,
            peak: selection.peak,
            threshold,
            segment: buffer.slice_frames(selection.offset, window_length)?,
        })),
        Located::Quiet(peak) => Ok(Extraction::Skipped { peak, threshold }),
    }
}

enum Located {
    Loud(Selection<f64>),
    Quiet(f64),
}

fn locate<S: EnergySample>(
    samples: &[S],
    channels: usize,
    policy: ChannelPolicy,
    window_length: usize,
    threshold: f64,
) -> Result<Located, ExtractError> {
    let profile = compute_frame_energy_profile(samples, channels, policy, window_length)?;
    let min_volume = S::Energy::from_threshold(threshold);

    match select_loudest_window(&profile, min_volume)? {
        Some(selection) => Ok(Located::Loud(Selection {
            offset: selection.offset,
            peak: selection.peak.to_f64(),
        })),
        None => Ok(Located::Quiet(find_peak(&profile)?.peak.to_f64())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(length_ms: u32, min_energy: f64) -> ExtractConfig {
        ExtractConfig {
            desired_length_ms: length_ms,
            threshold: Threshold::Energy(min_energy),
            ..ExtractConfig::default()
        }
    }

    #[test]
    fn test_window_length_rounds() {
        assert_eq!(window_length_for(16000, 1000), 16000);
        assert_eq!(window_length_for(8000, 1), 8);
        assert_eq!(window_length_for(44100, 1), 44); // 44.1
        assert_eq!(window_length_for(11025, 2), 22); // 22.05
        assert_eq!(window_length_for(1500, 1), 2); // 1.5 rounds half up
        assert_eq!(window_length_for(100, 1), 0);
    }

    #[test]
    fn test_selects_loud_burst() {
        let buffer = SampleBuffer::mono_i16(vec![0, 0, 5, 5, 5, 0, 0], 1000).unwrap();
        match extract_loudest_section(&buffer, &config(3, 50.0)).unwrap() {
            Extraction::Selected(section) => {
                assert_eq!(section.offset, 2);
                assert_eq!(section.window_length, 3);
                assert_eq!(section.peak, 75.0);
                assert_eq!(section.segment.data, SampleData::I16(vec![5, 5, 5]));
                assert!((section.start_seconds() - 0.002).abs() < 1e-12);
            }
            other => panic!("expected selection, got {:?}", other),
        }
    }

    #[test]
    fn test_skips_quiet_recording() {
        let buffer = SampleBuffer::mono_i16(vec![0, 0, 5, 5, 5, 0, 0], 1000).unwrap();
        let result = extract_loudest_section(&buffer, &config(3, 100.0)).unwrap();
        assert_eq!(
            result,
            Extraction::Skipped {
                peak: 75.0,
                threshold: 100.0
            }
        );
    }

    #[test]
    fn test_fractional_threshold_on_integer_pcm() {
        let buffer = SampleBuffer::mono_i16(vec![0, 0, 5, 5, 5, 0, 0], 1000).unwrap();
        assert!(matches!(
            extract_loudest_section(&buffer, &config(3, 75.0)).unwrap(),
            Extraction::Selected(_)
        ));
        assert!(matches!(
            extract_loudest_section(&buffer, &config(3, 75.01)).unwrap(),
            Extraction::Skipped { .. }
        ));
    }

    #[test]
    fn test_short_recording_is_used_whole() {
        let buffer = SampleBuffer::mono_i16(vec![1, 2, 3], 1000).unwrap();
        match extract_loudest_section(&buffer, &config(10, 0.0)).unwrap() {
            Extraction::Selected(section) => {
                assert_eq!(section.offset, 0);
                assert_eq!(section.window_length, 3);
                assert_eq!(section.segment, buffer);
            }
            other => panic!("expected selection, got {:?}", other),
        }
    }

    #[test]
    fn test_short_recording_rejected_when_configured() {
        let buffer = SampleBuffer::mono_i16(vec![1, 2, 3], 1000).unwrap();
        let config = ExtractConfig {
            short_input: ShortInputPolicy::Reject,
            ..config(10, 0.0)
        };
        assert_eq!(
            extract_loudest_section(&buffer, &config),
            Err(ExtractError::InvalidWindow {
                window_length: 10,
                sample_count: 3
            })
        );
    }

    #[test]
    fn test_zero_length_window_is_error() {
        // 1 ms at 100 Hz rounds to zero samples
        let buffer = SampleBuffer::mono_i16(vec![1; 50], 100).unwrap();
        assert!(matches!(
            extract_loudest_section(&buffer, &config(1, 0.0)),
            Err(ExtractError::InvalidWindow { window_length: 0, .. })
        ));
    }

    #[test]
    fn test_empty_recording_is_error() {
        let buffer = SampleBuffer::mono_i16(vec![], 16000).unwrap();
        assert!(matches!(
            extract_loudest_section(&buffer, &ExtractConfig::default()),
            Err(ExtractError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_stereo_segment_keeps_all_channels() {
        // Burst only on the right channel of frames 3..5
        let mut samples = vec![0i16; 16];
        samples[7] = 1000;
        samples[9] = 1000;
        let buffer = SampleBuffer::new(SampleData::I16(samples), 2, 1000, 16).unwrap();

        match extract_loudest_section(&buffer, &config(2, 1.0)).unwrap() {
            Extraction::Selected(section) => {
                assert_eq!(section.offset, 3);
                assert_eq!(section.segment.channels, 2);
                assert_eq!(section.segment.data, SampleData::I16(vec![0, 1000, 0, 1000]));
            }
            other => panic!("expected selection, got {:?}", other),
        }

        // The left reference channel is silent
        let left_only = ExtractConfig {
            channel_policy: ChannelPolicy::Reference(0),
            ..config(2, 1.0)
        };
        assert!(matches!(
            extract_loudest_section(&buffer, &left_only).unwrap(),
            Extraction::Skipped { peak, .. } if peak == 0.0
        ));
    }

    #[test]
    fn test_rms_threshold_on_float_pcm() {
        let mut samples = vec![0.0f32; 1000];
        for s in samples.iter_mut().skip(400).take(100) {
            *s = 0.01;
        }
        let buffer = SampleBuffer::new(SampleData::F32(samples), 1, 1000, 32).unwrap();

        // Loudest 100 ms window has RMS 0.01
        let gate = |rms: f64| ExtractConfig {
            desired_length_ms: 100,
            threshold: Threshold::Rms(rms),
            ..ExtractConfig::default()
        };
        assert!(matches!(
            extract_loudest_section(&buffer, &gate(0.009)).unwrap(),
            Extraction::Selected(Section { offset: 400, .. })
        ));
        assert!(matches!(
            extract_loudest_section(&buffer, &gate(0.011)).unwrap(),
            Extraction::Skipped { .. }
        ));
    }

    #[test]
    fn test_rms_gate_is_the_same_for_mono_and_stereo() {
        // Constant level on every channel, 100 ms window at 1 kHz
        let constant = |channels: u16, level: f32| {
            let data = SampleData::F32(vec![level; 1000 * channels as usize]);
            SampleBuffer::new(data, channels, 1000, 32).unwrap()
        };
        let config = ExtractConfig {
            desired_length_ms: 100,
            ..ExtractConfig::default()
        };

        // 0.003 is below the default 0.004 gate however many channels carry it
        for channels in [1, 2, 6] {
            assert!(
                matches!(
                    extract_loudest_section(&constant(channels, 0.003), &config).unwrap(),
                    Extraction::Skipped { .. }
                ),
                "{} channels at 0.003 should be skipped",
                channels
            );
            assert!(
                matches!(
                    extract_loudest_section(&constant(channels, 0.005), &config).unwrap(),
                    Extraction::Selected(_)
                ),
                "{} channels at 0.005 should be selected",
                channels
            );
        }
    }

    #[test]
    fn test_non_finite_float_samples_are_rejected() {
        let mut samples = vec![0.0f32; 100];
        for s in samples.iter_mut().skip(50).take(10) {
            *s = 0.9;
        }

        for bad in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY] {
            let mut samples = samples.clone();
            samples[0] = bad;
            let buffer = SampleBuffer::new(SampleData::F32(samples), 1, 1000, 32).unwrap();
            assert!(matches!(
                extract_loudest_section(&buffer, &config(10, 1.0)),
                Err(ExtractError::InvalidInput(_))
            ));
        }

        let buffer = SampleBuffer::new(SampleData::F32(samples), 1, 1000, 32).unwrap();
        assert!(matches!(
            extract_loudest_section(&buffer, &config(10, 1.0)).unwrap(),
            Extraction::Selected(Section { offset: 50, .. })
        ));
    }
}
