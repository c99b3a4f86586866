//! Sliding-window energy profile
//!
//! Computes the sum of squares over every window start offset of a buffer.
//!
//! Algorithm:
//! 1. Sum the squares of the first `window_length` samples (profile element 0)
//! 2. For each following offset, subtract the square of the sample leaving the
//!    window and add the square of the sample entering it
//!
//! This is O(n) in the buffer length, independent of the window length.
//! Float accumulators are recomputed exactly every [`RESYNC_INTERVAL`] offsets
//! to bound rounding drift; integer accumulators are exact and never resync.
//!
//! # Example
//!
//! ```
//! use loudest_section::energy::profile::compute_energy_profile;
//!
//! let samples = [0i16, 0, 5, 5, 5, 0, 0];
//! let profile = compute_energy_profile(&samples, 3)?;
//! assert_eq!(profile, vec![25, 50, 75, 50, 25]);
//! # Ok::<(), loudest_section::ExtractError>(())
//! ```

use super::sample::{Energy, EnergySample};
use crate::error::ExtractError;
use crate::preprocessing::channel_mixer::ChannelPolicy;

/// Offsets between exact recomputations for float accumulators
pub const RESYNC_INTERVAL: usize = 4096;

/// Compute the energy profile of a mono sample buffer
///
/// # Arguments
///
/// * `samples` - Mono samples in their native encoding
/// * `window_length` - Window length in samples (must be in `1..=samples.len()`)
///
/// # Returns
///
/// One energy per window start offset: `samples.len() - window_length + 1` values
///
/// # Errors
///
/// Returns `ExtractError::InvalidWindow` if the window is zero or longer than the buffer
pub fn compute_energy_profile<S: EnergySample>(
    samples: &[S],
    window_length: usize,
) -> Result<Vec<S::Energy>, ExtractError> {
    rolling_energy(samples.len(), window_length, |i| samples[i].square())
}

/// Compute the energy profile of interleaved multi-channel frames
///
/// The energy of one frame is defined by `policy`. With a single channel
/// every policy reduces to [`compute_energy_profile`].
///
/// # Arguments
///
/// * `frames` - Interleaved samples (`channels` samples per frame)
/// * `channels` - Number of interleaved channels
/// * `policy` - How channels combine into one frame energy
/// * `window_length` - Window length in frames
///
/// # Errors
///
/// Returns `ExtractError::InvalidInput` for a zero channel count, a buffer that
/// is not a whole number of frames, or a policy that does not fit the layout;
/// `ExtractError::InvalidWindow` as for [`compute_energy_profile`].
pub fn compute_frame_energy_profile<S: EnergySample>(
    frames: &[S],
    channels: usize,
    policy: ChannelPolicy,
    window_length: usize,
) -> Result<Vec<S::Energy>, ExtractError> {
    if channels == 0 {
        return Err(ExtractError::InvalidInput(
            "Channel count must be > 0".to_string(),
        ));
    }

    if frames.len() % channels != 0 {
        return Err(ExtractError::InvalidInput(format!(
            "{} samples is not a whole number of {}-channel frames",
            frames.len(),
            channels
        )));
    }

    policy.validate(channels)?;

    let frame_count = frames.len() / channels;
    rolling_energy(frame_count, window_length, |i| {
        policy.frame_energy(&frames[i * channels..(i + 1) * channels])
    })
}

fn rolling_energy<E, F>(len: usize, window_length: usize, energy_at: F) -> Result<Vec<E>, ExtractError>
where
    E: Energy,
    F: Fn(usize) -> E,
{
    if window_length == 0 || window_length > len {
        return Err(ExtractError::InvalidWindow {
            window_length,
            sample_count: len,
        });
    }

    let count = len - window_length + 1;
    let window_sum = |start: usize| {
        (start..start + window_length).fold(E::ZERO, |acc, i| acc + energy_at(i))
    };

    let mut profile = Vec::with_capacity(count);
    let mut running = window_sum(0);
    profile.push(running);

    for i in 1..count {
        if !E::EXACT && i % RESYNC_INTERVAL == 0 {
            running = window_sum(i);
        } else {
            running = running - energy_at(i - 1) + energy_at(i + window_length - 1);
            // Float cancellation can dip just below zero
            if running < E::ZERO {
                running = E::ZERO;
            }
        }
        profile.push(running);
    }

    log::debug!(
        "Energy profile: {} samples, window={}, {} offsets",
        len,
        window_length,
        count
    );

    Ok(profile)
}
