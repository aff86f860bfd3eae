// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! In-memory PCM buffers.
//!
//! Samples are interleaved `f32` in [-1.0, 1.0]. Positions are given in
//! milliseconds and converted to frames with the buffer's sample rate.

use std::path::Path;

use super::AudioError;

/// Interleaved audio with its sample rate and channel count
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    sample_rate: u32,
    channels: u16,
    samples: Vec<f32>,
}

impl AudioBuffer {
    /// Zero-length buffer
    pub fn empty(sample_rate: u32, channels: u16) -> Self {
        Self {
            sample_rate: sample_rate.max(1),
            channels: channels.max(1),
            samples: Vec::new(),
        }
    }

    /// Silence lasting `duration_ms`
    pub fn silent(duration_ms: u64, sample_rate: u32, channels: u16) -> Self {
        let mut buffer = Self::empty(sample_rate, channels);
        buffer.append_silence(duration_ms);
        buffer
    }

    pub fn from_samples(sample_rate: u32, channels: u16, samples: Vec<f32>) -> Result<Self, AudioError> {
        if sample_rate == 0 || channels == 0 {
            return Err(AudioError::InvalidFormat(format!(
                "{} Hz with {} channels",
                sample_rate, channels
            )));
        }
        if samples.len() % channels as usize != 0 {
            return Err(AudioError::InvalidFormat(format!(
                "{} samples do not divide into {} channels",
                samples.len(),
                channels
            )));
        }
        Ok(Self {
            sample_rate,
            channels,
            samples,
        })
    }

    /// Decode a WAV file (integer or float PCM)
    pub fn load(path: &Path) -> Result<Self, AudioError> {
        let wav_error = |source| AudioError::Wav {
            path: path.to_path_buf(),
            source,
        };

        let reader = hound::WavReader::open(path).map_err(wav_error)?;
        let spec = reader.spec();

        let samples: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Float => reader
                .into_samples::<f32>()
                .collect::<Result<_, _>>()
                .map_err(wav_error)?,
            hound::SampleFormat::Int => {
                let max_val = (1_i64 << (spec.bits_per_sample - 1)) as f32;
                reader
                    .into_samples::<i32>()
                    .map(|s| s.map(|v| v as f32 / max_val))
                    .collect::<Result<_, _>>()
                    .map_err(wav_error)?
            }
        };

        Self::from_samples(spec.sample_rate, spec.channels, samples)
    }

    /// Write as 16-bit PCM WAV, clipping to full scale
    pub fn export_wav(&self, path: &Path) -> Result<(), AudioError> {
        let wav_error = |source| AudioError::Wav {
            path: path.to_path_buf(),
            source,
        };

        let spec = hound::WavSpec {
            channels: self.channels,
            sample_rate: self.sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };

        let mut writer = hound::WavWriter::create(path, spec).map_err(wav_error)?;
        for &sample in &self.samples {
            let value = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
            writer.write_sample(value).map_err(wav_error)?;
        }
        writer.finalize().map_err(wav_error)
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels as usize
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_ms(&self) -> u64 {
        self.frames() as u64 * 1000 / self.sample_rate as u64
    }

    pub fn ms_to_frames(&self, ms: u64) -> usize {
        (ms * self.sample_rate as u64 / 1000) as usize
    }

    /// Peak absolute sample value
    pub fn peak(&self) -> f32 {
        self.samples.iter().fold(0.0f32, |peak, s| peak.max(s.abs()))
    }

    pub fn append_silence(&mut self, duration_ms: u64) {
        let frames = self.ms_to_frames(duration_ms);
        self.samples
            .resize(self.samples.len() + frames * self.channels as usize, 0.0);
    }

    /// Copy with gain applied in decibels
    pub fn with_gain_db(&self, gain_db: f32) -> Self {
        let factor = 10f32.powf(gain_db / 20.0);
        Self {
            sample_rate: self.sample_rate,
            channels: self.channels,
            samples: self.samples.iter().map(|s| s * factor).collect(),
        }
    }

    /// Mix `other` in starting at `offset_ms`, growing this buffer as needed.
    ///
    /// `other` must share this buffer's format (see [`AudioBuffer::converted_to`]).
    pub fn overlay(&mut self, other: &AudioBuffer, offset_ms: u64) -> Result<(), AudioError> {
        if other.sample_rate != self.sample_rate || other.channels != self.channels {
            return Err(AudioError::InvalidFormat(format!(
                "cannot overlay {} Hz/{} ch onto {} Hz/{} ch",
                other.sample_rate, other.channels, self.sample_rate, self.channels
            )));
        }

        let start = self.ms_to_frames(offset_ms) * self.channels as usize;
        let end = start + other.samples.len();
        if end > self.samples.len() {
            self.samples.resize(end, 0.0);
        }
        for (dst, src) in self.samples[start..end].iter_mut().zip(&other.samples) {
            *dst += src;
        }
        Ok(())
    }

    /// Section between two millisecond positions
    pub fn slice(&self, start_ms: u64, end_ms: u64) -> Self {
        let channels = self.channels as usize;
        let start = (self.ms_to_frames(start_ms) * channels).min(self.samples.len());
        let end = (self.ms_to_frames(end_ms) * channels).clamp(start, self.samples.len());
        Self {
            sample_rate: self.sample_rate,
            channels: self.channels,
            samples: self.samples[start..end].to_vec(),
        }
    }

    /// Same audio in another channel layout and sample rate.
    ///
    /// Channels are averaged down to mono and then spread to the target
    /// count unless the counts already match; resampling is linear.
    pub fn converted_to(&self, sample_rate: u32, channels: u16) -> Self {
        let channels = channels.max(1);
        let sample_rate = sample_rate.max(1);
        if self.sample_rate == sample_rate && self.channels == channels {
            return self.clone();
        }

        let source_channels = self.channels as usize;
        let planar: Vec<Vec<f32>> = if self.channels == channels {
            (0..source_channels)
                .map(|c| self.samples.iter().skip(c).step_by(source_channels).copied().collect())
                .collect()
        } else {
            let mono: Vec<f32> = self
                .samples
                .chunks(source_channels)
                .map(|frame| frame.iter().sum::<f32>() / source_channels as f32)
                .collect();
            vec![mono; channels as usize]
        };

        let resampled: Vec<Vec<f32>> = planar
            .iter()
            .map(|channel| resample_linear(channel, self.sample_rate, sample_rate))
            .collect();

        let frames = resampled.first().map_or(0, Vec::len);
        let mut samples = Vec::with_capacity(frames * channels as usize);
        for frame in 0..frames {
            for channel in &resampled {
                samples.push(channel[frame]);
            }
        }

        Self {
            sample_rate,
            channels,
            samples,
        }
    }
}

fn resample_linear(data: &[f32], from_rate: u32, to_rate: u32) -> Vec<f32> {
    if from_rate == to_rate {
        return data.to_vec();
    }

    let ratio = from_rate as f64 / to_rate as f64;
    let out_len = (data.len() as f64 / ratio).ceil() as usize;
    let mut out = Vec::with_capacity(out_len);

    for i in 0..out_len {
        let src_pos = i as f64 * ratio;
        let idx = src_pos as usize;
        let frac = (src_pos - idx as f64) as f32;

        let s0 = data.get(idx).copied().unwrap_or(0.0);
        let s1 = data.get(idx + 1).copied().unwrap_or(s0);
        out.push(s0 + frac * (s1 - s0));
    }

    out
}
