//! Audio I/O modules
//!
//! WAV decoding/encoding with hound, other containers decoded with Symphonia,
//! and the interleaved sample buffer they exchange.

pub mod decoder;
pub mod encoder;
pub mod sample_buffer;

pub use decoder::decode_audio;
pub use encoder::encode_wav;
pub use sample_buffer::{SampleBuffer, SampleData, SampleFormat};
