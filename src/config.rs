//! Configuration parameters for loudest-section extraction

use crate::error::ExtractError;
use crate::preprocessing::channel_mixer::ChannelPolicy;
use serde::{Deserialize, Serialize};

/// Minimum-volume gate applied to the loudest window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Threshold {
    /// Raw energy: sum of squares in the native sample units of the file
    Energy(f64),
    /// RMS relative to full scale (0.0-1.0), converted to energy per file
    ///
    /// Converts to `window_length * (rms * full_scale)^2` per measured
    /// channel, so the same value gates mono and stereo, 16-bit, 24-bit and
    /// float recordings alike.
    Rms(f64),
}

impl Threshold {
    /// Threshold as raw energy for a window of `window_length` frames
    ///
    /// `ChannelPolicy::Sum` adds the energy of every channel, so an RMS gate
    /// scales with `channels` there. `Mean` and `Reference` measure a single
    /// signal.
    pub fn to_energy(
        &self,
        window_length: usize,
        full_scale: f64,
        channels: usize,
        policy: ChannelPolicy,
    ) -> f64 {
        match *self {
            Threshold::Energy(energy) => energy,
            Threshold::Rms(rms) => {
                let amplitude = rms * full_scale;
                let measured = match policy {
                    ChannelPolicy::Sum => channels as f64,
                    ChannelPolicy::Mean | ChannelPolicy::Reference(_) => 1.0,
                };
                measured * window_length as f64 * amplitude * amplitude
            }
        }
    }
}

/// What to do when a recording is shorter than the requested window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShortInputPolicy {
    /// The whole recording is the only candidate window
    #[default]
    WholeBuffer,
    /// Fail with `ExtractError::InvalidWindow`
    Reject,
}

/// Extraction configuration parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// Length of the extracted section in milliseconds (default: 1000)
    pub desired_length_ms: u32,

    /// Minimum volume of the loudest window (default: RMS 0.004 of full scale)
    /// Recordings whose loudest window falls below it are skipped
    pub threshold: Threshold,

    /// How channels combine into one energy per frame (default: Sum)
    pub channel_policy: ChannelPolicy,

    /// Handling of recordings shorter than the window (default: WholeBuffer)
    pub short_input: ShortInputPolicy,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            desired_length_ms: 1000,
            threshold: Threshold::Rms(0.004),
            channel_policy: ChannelPolicy::Sum,
            short_input: ShortInputPolicy::WholeBuffer,
        }
    }
}

impl ExtractConfig {
    /// Validate configuration once, before any file is processed
    ///
    /// # Errors
    ///
    /// Returns `ExtractError::InvalidInput` for a zero length or a threshold
    /// that is not a finite, non-negative number
    pub fn validate(&self) -> Result<(), ExtractError> {
        if self.desired_length_ms == 0 {
            return Err(ExtractError::InvalidInput(
                "Desired length must be > 0 ms".to_string(),
            ));
        }

        let (name, value) = match self.threshold {
            Threshold::Energy(v) => ("Minimum energy", v),
            Threshold::Rms(v) => ("Minimum RMS", v),
        };
        if !value.is_finite() || value < 0.0 {
            return Err(ExtractError::InvalidInput(format!(
                "{} must be a finite non-negative number, got {}",
                name, value
            )));
        }

        Ok(())
    }
}

/// Batch processing configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Per-file extraction parameters
    pub extract: ExtractConfig,

    /// Parallel workers (default: available CPU threads - 1, at least 1)
    pub jobs: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            extract: ExtractConfig::default(),
            jobs: default_jobs(),
        }
    }
}

impl BatchConfig {
    /// Validate configuration once, before any file is processed
    pub fn validate(&self) -> Result<(), ExtractError> {
        if self.jobs == 0 {
            return Err(ExtractError::InvalidInput("Jobs must be > 0".to_string()));
        }
        self.extract.validate()
    }
}

/// Available CPU threads minus one, keeping a core free for the system
pub fn default_jobs() -> usize {
    let n = std::thread::available_parallelism()
        .map(|v| v.get())
        .unwrap_or(1);
    std::cmp::max(1, n.saturating_sub(1))
}
