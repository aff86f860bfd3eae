// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Timeline combiner.
//!
//! Lays sound files onto one master buffer at bar/quarter positions.
//! Each file is decoded once per combiner; the gain it is first placed
//! with sticks for later placements.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{export, AudioBuffer, AudioError, AudioFormat};
use crate::generators::{DrumHit, GeneratorContext};

/// Mixes sounds onto a growing master buffer
#[derive(Debug)]
pub struct AudioCombiner {
    quarters_per_bar: u32,
    quarter_ms: f64,
    master: AudioBuffer,
    cache: HashMap<PathBuf, AudioBuffer>,
}

impl AudioCombiner {
    pub fn new(tempo: f64, quarters_per_bar: u32, sample_rate: u32, channels: u16) -> Self {
        Self {
            quarters_per_bar,
            quarter_ms: 60_000.0 / tempo,
            master: AudioBuffer::empty(sample_rate, channels),
            cache: HashMap::new(),
        }
    }

    pub fn from_context(context: &GeneratorContext, sample_rate: u32, channels: u16) -> Self {
        Self::new(context.tempo, context.quarters_per_bar, sample_rate, channels)
    }

    pub fn quarter_duration_ms(&self) -> f64 {
        self.quarter_ms
    }

    /// Start of a grid position in milliseconds
    pub fn offset_ms(&self, measure: u32, quarter: f64, subdivision: u32, subdivisions: u32) -> u64 {
        let beats = (measure * self.quarters_per_bar) as f64 + quarter;
        let mut start = (beats * self.quarter_ms) as u64;
        if subdivision > 0 && subdivisions > 0 {
            start += (self.quarter_ms * subdivision as f64 / subdivisions as f64) as u64;
        }
        start
    }

    /// Seed the cache with an already decoded sound
    pub fn preload(&mut self, path: &Path, buffer: AudioBuffer) {
        let converted = buffer.converted_to(self.master.sample_rate(), self.master.channels());
        self.cache.insert(path.to_path_buf(), converted);
    }

    fn load_cached(&mut self, path: &Path, gain_db: f32) -> Result<(), AudioError> {
        if self.cache.contains_key(path) {
            return Ok(());
        }
        let sound = AudioBuffer::load(path)?
            .converted_to(self.master.sample_rate(), self.master.channels())
            .with_gain_db(gain_db);
        debug!(path = %path.display(), gain_db, ms = sound.duration_ms(), "sound loaded");
        self.cache.insert(path.to_path_buf(), sound);
        Ok(())
    }

    /// Mix the sound at `path` in at a grid position
    pub fn place_at(
        &mut self,
        path: &Path,
        measure: u32,
        quarter: f64,
        subdivision: u32,
        subdivisions: u32,
        gain_db: f32,
    ) -> Result<(), AudioError> {
        self.load_cached(path, gain_db)?;
        let start = self.offset_ms(measure, quarter, subdivision, subdivisions);

        let Some(sound) = self.cache.get(path) else {
            return Ok(());
        };

        let end = start + sound.duration_ms();
        let current = self.master.duration_ms();
        if end > current {
            self.master.append_silence(end - current);
        }
        self.master.overlay(sound, start)
    }

    pub fn place_hit(&mut self, hit: &DrumHit, path: &Path, gain_db: f32) -> Result<(), AudioError> {
        self.place_at(
            path,
            hit.measure,
            hit.quarter,
            hit.subdivision,
            hit.subdivisions,
            gain_db,
        )
    }

    pub fn master(&self) -> &AudioBuffer {
        &self.master
    }

    pub fn into_master(self) -> AudioBuffer {
        self.master
    }

    pub fn duration_ms(&self) -> u64 {
        self.master.duration_ms()
    }

    /// Number of distinct sounds decoded so far
    pub fn cached_sounds(&self) -> usize {
        self.cache.len()
    }

    pub fn export(&self, path: &Path) -> Result<(), AudioError> {
        export(&self.master, path, AudioFormat::Wav)
    }
}
