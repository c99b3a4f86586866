//! Audio preprocessing modules
//!
//! Utilities for preparing audio for energy analysis:
//! - Channel combination (sum, mono downmix, reference channel)

pub mod channel_mixer;

pub use channel_mixer::ChannelPolicy;
