//! Channel combination for multi-channel energy

use crate::energy::sample::{Energy, EnergySample};
use crate::error::ExtractError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the channels of one frame combine into a single energy value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelPolicy {
    /// Sum of per-channel squares: every channel contributes
    #[default]
    Sum,
    /// Square of the channel mean: energy of the mono downmix
    ///
    /// Integer encodings floor-divide the squared sum by `channels²`.
    Mean,
    /// Energy of one reference channel only
    Reference(usize),
}

impl ChannelPolicy {
    /// Check that the policy fits a channel layout
    pub fn validate(&self, channels: usize) -> Result<(), ExtractError> {
        match *self {
            ChannelPolicy::Reference(ch) if ch >= channels => Err(ExtractError::InvalidInput(
                format!("Reference channel {} out of range for {} channels", ch, channels),
            )),
            _ => Ok(()),
        }
    }

    /// Energy of a single interleaved frame
    ///
    /// `frame` must hold one sample per channel and satisfy [`Self::validate`].
    pub fn frame_energy<S: EnergySample>(&self, frame: &[S]) -> S::Energy {
        match *self {
            ChannelPolicy::Sum => frame
                .iter()
                .fold(S::Energy::ZERO, |acc, &s| acc + s.square()),
            ChannelPolicy::Mean => {
                let sum = frame.iter().fold(S::Energy::ZERO, |acc, &s| acc + s.widen());
                let n = S::Energy::from_count(frame.len());
                (sum * sum).div_by(n * n)
            }
            ChannelPolicy::Reference(ch) => frame[ch].square(),
        }
    }
}

impl fmt::Display for ChannelPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelPolicy::Sum => write!(f, "sum"),
            ChannelPolicy::Mean => write!(f, "mean"),
            ChannelPolicy::Reference(ch) => write!(f, "ref:{}", ch),
        }
    }
}

impl FromStr for ChannelPolicy {
    type Err = ExtractError;

    /// Parse `sum`, `mean` or `ref:N`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sum" => Ok(ChannelPolicy::Sum),
            "mean" => Ok(ChannelPolicy::Mean),
            _ => s
                .strip_prefix("ref:")
                .and_then(|ch| ch.parse::<usize>().ok())
                .map(ChannelPolicy::Reference)
                .ok_or_else(|| {
                    ExtractError::InvalidInput(format!(
                        "Unknown channel policy '{}' (expected sum, mean or ref:N)",
                        s
                    ))
                }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sum_policy() {
        assert_eq!(ChannelPolicy::Sum.frame_energy(&[3i16, -4]), 25);
    }

    #[test]
    fn test_mean_policy_is_downmix_energy() {
        assert_eq!(ChannelPolicy::Mean.frame_energy(&[0.5f32, -0.5]), 0.0);
        assert_eq!(ChannelPolicy::Mean.frame_energy(&[0.5f32, 0.25]), 0.140625);
        // (3 + 4)^2 / 4 = 12.25, floored
        assert_eq!(ChannelPolicy::Mean.frame_energy(&[3i16, 4]), 12);
    }

    #[test]
    fn test_reference_policy() {
        assert_eq!(ChannelPolicy::Reference(1).frame_energy(&[100i32, 2]), 4);
        assert!(ChannelPolicy::Reference(1).validate(2).is_ok());
        assert!(ChannelPolicy::Reference(2).validate(2).is_err());
    }

    #[test]
    fn test_parse_round_trips_display() {
        for policy in [ChannelPolicy::Sum, ChannelPolicy::Mean, ChannelPolicy::Reference(3)] {
            assert_eq!(policy.to_string().parse::<ChannelPolicy>().unwrap(), policy);
        }
        assert!("left".parse::<ChannelPolicy>().is_err());
        assert!("ref:x".parse::<ChannelPolicy>().is_err());
    }
}
