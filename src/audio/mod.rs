// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Audio for the final mix.
//!
//! This module provides:
//! - PCM buffers with WAV decode/encode
//! - The timeline combiner that lays sounds out on the bar grid
//! - The drum sample bank

pub mod buffer;
pub mod combiner;
pub mod kit;

pub use buffer::AudioBuffer;
pub use combiner::AudioCombiner;
pub use kit::DrumKit;

use std::path::PathBuf;

use thiserror::Error;

/// Audio error types
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("WAV error in '{path}': {source}")]
    Wav {
        path: PathBuf,
        #[source]
        source: hound::Error,
    },

    #[error("invalid audio format: {0}")]
    InvalidFormat(String),
}

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Wav,
}

impl AudioFormat {
    /// Format for a file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "wav" | "wave" => Some(AudioFormat::Wav),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            AudioFormat::Wav => "wav",
        }
    }
}

/// Write `buffer` to `path` in `format`
pub fn export(buffer: &AudioBuffer, path: &std::path::Path, format: AudioFormat) -> Result<(), AudioError> {
    match format {
        AudioFormat::Wav => buffer.export_wav(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(AudioFormat::from_extension("wav"), Some(AudioFormat::Wav));
        assert_eq!(AudioFormat::from_extension("WAV"), Some(AudioFormat::Wav));
        assert_eq!(AudioFormat::from_extension("mp3"), None);
        assert_eq!(AudioFormat::Wav.extension(), "wav");
    }

    #[test]
    fn test_error_display() {
        let err = AudioError::InvalidFormat("0 Hz".to_string());
        assert_eq!(err.to_string(), "invalid audio format: 0 Hz");
    }
}
