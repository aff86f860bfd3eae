// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Generative engines for the accompaniment parts.
//!
//! Each generator reads the expanded progression and produces one part:
//! a walking bass line, piano comping voicings, or a drum pattern. All
//! randomness comes from the caller's RNG, so a seeded `StdRng` makes a
//! part reproducible.

pub mod bass;
pub mod comping;
pub mod drums;

use std::collections::HashMap;

use rand::Rng;

use crate::error::GenerationError;
use crate::music::Chord;
use crate::progression::ProgressionItem;

pub use bass::{BassConfig, BassLineGenerator};
pub use comping::{CompingGenerator, Voicing};
pub use drums::{DrumGenerator, DrumHit, DrumSound};

/// Shared timing parameters for generators
#[derive(Debug, Clone)]
pub struct GeneratorContext {
    /// Tempo in BPM
    pub tempo: f64,
    /// Quarters per bar (time signature numerator over 4)
    pub quarters_per_bar: u32,
    /// Position of the off-beat eighth within a quarter (0.5 = straight)
    pub swing: f64,
}

impl Default for GeneratorContext {
    fn default() -> Self {
        Self {
            tempo: 120.0,
            quarters_per_bar: 4,
            swing: drums::SWING_FACTOR,
        }
    }
}

impl GeneratorContext {
    /// Duration of one quarter in milliseconds
    pub fn quarter_duration_ms(&self) -> f64 {
        60_000.0 / self.tempo
    }

    /// Duration of one bar in milliseconds
    pub fn bar_duration_ms(&self) -> f64 {
        self.quarter_duration_ms() * self.quarters_per_bar as f64
    }
}

/// Trait for all generator implementations
pub trait Generator {
    /// What one run produces
    type Output;

    /// Generate a part for the expanded progression
    fn generate<R: Rng + ?Sized>(
        &self,
        items: &[ProgressionItem],
        context: &GeneratorContext,
        rng: &mut R,
    ) -> Result<Self::Output, GenerationError>;

    /// Set a parameter by name; unknown names are ignored
    fn set_param(&mut self, name: &str, value: f64);

    /// Get a parameter by name
    fn get_param(&self, name: &str) -> Option<f64>;

    /// Get the generator type name
    fn name(&self) -> &'static str;

    /// Get a list of available parameters with their current values
    fn params(&self) -> HashMap<String, f64>;
}

/// Chords that sound, with their durations, in order
pub fn playable_chords(items: &[ProgressionItem]) -> Vec<(&Chord, u32)> {
    items
        .iter()
        .filter(|item| item.is_playable())
        .filter_map(|item| item.as_chord().map(|chord| (chord, item.duration())))
        .collect()
}
