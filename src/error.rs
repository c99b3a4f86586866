//! Error types for loudest-section extraction

use std::fmt;

/// Errors that can occur while extracting the loudest section of a recording
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractError {
    /// Window length is zero or longer than the sample buffer
    InvalidWindow {
        /// Requested window length in samples
        window_length: usize,
        /// Number of samples (or frames) available
        sample_count: usize,
    },

    /// Energy profile has no elements
    EmptyProfile,

    /// Invalid input parameters or configuration
    InvalidInput(String),

    /// Audio decoding error
    DecodingError(String),

    /// Audio encoding error
    EncodingError(String),

    /// Filesystem error
    Io(String),
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractError::InvalidWindow {
                window_length,
                sample_count,
            } => write!(
                f,
                "Invalid window: {} samples requested, {} available",
                window_length, sample_count
            ),
            ExtractError::EmptyProfile => write!(f, "Energy profile is empty"),
            ExtractError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            ExtractError::DecodingError(msg) => write!(f, "Decoding error: {}", msg),
            ExtractError::EncodingError(msg) => write!(f, "Encoding error: {}", msg),
            ExtractError::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for ExtractError {}

impl From<std::io::Error> for ExtractError {
    fn from(err: std::io::Error) -> Self {
        ExtractError::Io(err.to_string())
    }
}
