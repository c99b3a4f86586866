//! Interleaved PCM buffers in their native encoding

use crate::error::ExtractError;

/// Sample storage, kept in the encoding the file was read with
#[derive(Debug, Clone, PartialEq)]
pub enum SampleData {
    /// 16-bit integer PCM
    I16(Vec<i16>),
    /// 8/24/32-bit integer PCM widened to `i32`
    I32(Vec<i32>),
    /// 32-bit float PCM
    F32(Vec<f32>),
}

impl SampleData {
    /// Total number of samples across all channels
    pub fn len(&self) -> usize {
        match self {
            SampleData::I16(v) => v.len(),
            SampleData::I32(v) => v.len(),
            SampleData::F32(v) => v.len(),
        }
    }

    /// `true` if no samples are stored
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of samples `[start, end)`
    fn slice(&self, start: usize, end: usize) -> SampleData {
        match self {
            SampleData::I16(v) => SampleData::I16(v[start..end].to_vec()),
            SampleData::I32(v) => SampleData::I32(v[start..end].to_vec()),
            SampleData::F32(v) => SampleData::F32(v[start..end].to_vec()),
        }
    }
}

/// Sample encoding, used to reproduce the input format on output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleFormat {
    /// Signed integer PCM
    Int,
    /// IEEE float PCM
    Float,
}

/// A decoded recording: interleaved samples plus stream parameters
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    /// Interleaved samples
    pub data: SampleData,
    /// Channel count (≥ 1)
    pub channels: u16,
    /// Sample rate in Hz (> 0)
    pub sample_rate: u32,
    /// Bits per sample of the source encoding
    pub bits_per_sample: u16,
    /// Source sample format
    pub format: SampleFormat,
}

impl SampleBuffer {
    /// Create a buffer, checking that the layout is consistent
    ///
    /// # Errors
    ///
    /// Returns `ExtractError::InvalidInput` for zero channels, a zero sample
    /// rate, a bit depth that does not fit the storage, or a sample count
    /// that is not a whole number of frames
    pub fn new(
        data: SampleData,
        channels: u16,
        sample_rate: u32,
        bits_per_sample: u16,
    ) -> Result<Self, ExtractError> {
        if channels == 0 {
            return Err(ExtractError::InvalidInput(
                "Channel count must be > 0".to_string(),
            ));
        }

        if sample_rate == 0 {
            return Err(ExtractError::InvalidInput(
                "Invalid sample rate".to_string(),
            ));
        }

        let format = match (&data, bits_per_sample) {
            (SampleData::I16(_), 16) => SampleFormat::Int,
            (SampleData::I32(_), 8 | 24 | 32) => SampleFormat::Int,
            (SampleData::F32(_), 32) => SampleFormat::Float,
            _ => {
                return Err(ExtractError::InvalidInput(format!(
                    "{} bits per sample does not match sample storage",
                    bits_per_sample
                )))
            }
        };

        if data.len() % channels as usize != 0 {
            return Err(ExtractError::InvalidInput(format!(
                "{} samples is not a whole number of {}-channel frames",
                data.len(),
                channels
            )));
        }

        Ok(Self {
            data,
            channels,
            sample_rate,
            bits_per_sample,
            format,
        })
    }

    /// Mono 16-bit buffer
    pub fn mono_i16(samples: Vec<i16>, sample_rate: u32) -> Result<Self, ExtractError> {
        Self::new(SampleData::I16(samples), 1, sample_rate, 16)
    }

    /// Number of frames (samples per channel)
    pub fn frames(&self) -> usize {
        self.data.len() / self.channels as usize
    }

    /// Duration in seconds
    pub fn duration_seconds(&self) -> f64 {
        self.frames() as f64 / self.sample_rate as f64
    }

    /// Magnitude of a full-scale sample in this encoding
    ///
    /// `2^(bits - 1)` for integer PCM, `1.0` for float PCM.
    pub fn full_scale(&self) -> f64 {
        match self.format {
            SampleFormat::Int => (1u64 << (self.bits_per_sample - 1)) as f64,
            SampleFormat::Float => 1.0,
        }
    }

    /// Copy of frames `[start, start + len)` with the same stream parameters
    ///
    /// # Errors
    ///
    /// Returns `ExtractError::InvalidInput` if the range exceeds the buffer
    pub fn slice_frames(&self, start: usize, len: usize) -> Result<SampleBuffer, ExtractError> {
        let end = start
            .checked_add(len)
            .filter(|&end| end <= self.frames())
            .ok_or_else(|| {
                ExtractError::InvalidInput(format!(
                    "Frame range {}..+{} exceeds {} frames",
                    start,
                    len,
                    self.frames()
                ))
            })?;

        let ch = self.channels as usize;
        Ok(SampleBuffer {
            data: self.data.slice(start * ch, end * ch),
            channels: self.channels,
            sample_rate: self.sample_rate,
            bits_per_sample: self.bits_per_sample,
            format: self.format,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frames_and_duration() {
        let buffer = SampleBuffer::new(SampleData::F32(vec![0.0; 32000]), 2, 16000, 32).unwrap();
        assert_eq!(buffer.frames(), 16000);
        assert!((buffer.duration_seconds() - 1.0).abs() < 1e-12);
        assert_eq!(buffer.format, SampleFormat::Float);
    }

    #[test]
    fn test_slice_frames_keeps_layout() {
        let data = SampleData::I16(vec![0, 1, 2, 3, 4, 5, 6, 7]);
        let buffer = SampleBuffer::new(data, 2, 8000, 16).unwrap();

        let slice = buffer.slice_frames(1, 2).unwrap();
        assert_eq!(slice.data, SampleData::I16(vec![2, 3, 4, 5]));
        assert_eq!(slice.channels, 2);
        assert_eq!(slice.sample_rate, 8000);
        assert_eq!(slice.bits_per_sample, 16);

        assert!(buffer.slice_frames(3, 2).is_err());
        assert!(buffer.slice_frames(usize::MAX, 2).is_err());
    }

    #[test]
    fn test_full_scale() {
        let int24 = SampleBuffer::new(SampleData::I32(vec![0]), 1, 48000, 24).unwrap();
        assert_eq!(int24.full_scale(), 8_388_608.0);
        let int16 = SampleBuffer::mono_i16(vec![0], 48000).unwrap();
        assert_eq!(int16.full_scale(), 32_768.0);
    }

    #[test]
    fn test_rejects_inconsistent_layout() {
        assert!(SampleBuffer::new(SampleData::I16(vec![0; 3]), 2, 8000, 16).is_err());
        assert!(SampleBuffer::new(SampleData::I16(vec![0; 2]), 0, 8000, 16).is_err());
        assert!(SampleBuffer::new(SampleData::I16(vec![0; 2]), 1, 0, 16).is_err());
        assert!(SampleBuffer::new(SampleData::I16(vec![0; 2]), 1, 8000, 24).is_err());
    }
}
