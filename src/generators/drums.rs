// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Swing drum pattern generator.
//!
//! Walks the bars eighth by eighth. Each eighth has a role within its
//! two-beat group:
//!
//! | role | slot                 | hits                                   |
//! |------|----------------------|----------------------------------------|
//! | 0    | odd beat             | ride (kick on the downbeat)            |
//! | 1    | first syncopation    | snare p=0.2, random doubles            |
//! | 2    | even beat            | ride, hi-hat                           |
//! | 3    | second syncopation   | ride p=0.9, snare p=0.2, random doubles|
//!
//! Syncopated eighths are pushed late by the swing factor.

use std::collections::HashMap;
use std::fmt;

use rand::Rng;
use tracing::debug;

use super::{Generator, GeneratorContext};
use crate::error::GenerationError;
use crate::progression::{chord_quarters, ProgressionItem};

/// Position of the swung eighth within its quarter
pub const SWING_FACTOR: f64 = 0.67;

/// Chance of a ride on the second syncopation
pub const RIDE_PROBABILITY: f64 = 0.9;

/// Chance of a snare on a syncopation
pub const SNARE_PROBABILITY: f64 = 0.2;

/// Below this draw a syncopation also gets a snare on the following beat
pub const DOUBLE_SNARE_PROBABILITY: f64 = 0.05;

/// Draws inside this window add one more snare
pub const EXTRA_SNARE_WINDOW: (f64, f64) = (0.20, 0.30);

/// Subdivision count attached to every hit
pub const SUBDIVISIONS: u32 = 3;

/// Bars used when the progression has no chords
pub const DEFAULT_BARS: u32 = 4;

/// Drum kit pieces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrumSound {
    Kick,
    Ride,
    HiHat,
    Snare,
}

impl DrumSound {
    pub const ALL: [DrumSound; 4] = [DrumSound::Kick, DrumSound::Ride, DrumSound::HiHat, DrumSound::Snare];

    pub fn name(self) -> &'static str {
        match self {
            DrumSound::Kick => "kick",
            DrumSound::Ride => "ride",
            DrumSound::HiHat => "hihat",
            DrumSound::Snare => "snare",
        }
    }
}

impl fmt::Display for DrumSound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Role of an eighth within a two-beat group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SlotRole {
    OddBeat,
    FirstSyncopation,
    EvenBeat,
    SecondSyncopation,
}

impl SlotRole {
    fn from_value(v: u32) -> Self {
        match v % 4 {
            0 => SlotRole::OddBeat,
            1 => SlotRole::FirstSyncopation,
            2 => SlotRole::EvenBeat,
            _ => SlotRole::SecondSyncopation,
        }
    }

    fn is_syncopation(self) -> bool {
        matches!(self, SlotRole::FirstSyncopation | SlotRole::SecondSyncopation)
    }
}

/// A drum hit placed on the bar grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrumHit {
    pub sound: DrumSound,
    /// Bar index, from 0
    pub measure: u32,
    /// Position within the bar in quarters
    pub quarter: f64,
    pub subdivision: u32,
    pub subdivisions: u32,
}

impl DrumHit {
    fn new(sound: DrumSound, measure: u32, quarter: f64) -> Self {
        Self {
            sound,
            measure,
            quarter,
            subdivision: 0,
            subdivisions: SUBDIVISIONS,
        }
    }
}

/// Drum pattern generator
#[derive(Debug, Clone)]
pub struct DrumGenerator {
    default_bars: u32,
}

impl Default for DrumGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl DrumGenerator {
    pub fn new() -> Self {
        Self {
            default_bars: DEFAULT_BARS,
        }
    }

    pub fn with_default_bars(mut self, bars: u32) -> Self {
        self.default_bars = bars.max(1);
        self
    }

    /// Bars needed to cover the chords of `items`
    pub fn bars_for(&self, items: &[ProgressionItem], context: &GeneratorContext) -> u32 {
        let quarters = chord_quarters(items);
        if quarters == 0 {
            return self.default_bars;
        }
        quarters.div_ceil(context.quarters_per_bar.max(1))
    }

    /// Pattern of `bars` bars.
    ///
    /// Random draws per eighth, in order: the ride draw (second
    /// syncopation only), the snare draw (syncopations only), then one
    /// draw for doubled snares on every eighth.
    pub fn pattern<R: Rng + ?Sized>(&self, bars: u32, context: &GeneratorContext, rng: &mut R) -> Vec<DrumHit> {
        let eighths_per_bar = context.quarters_per_bar.max(1) * 2;
        let push = context.swing - 0.5;
        let mut hits = Vec::new();

        for slot in 0..bars * eighths_per_bar {
            let measure = slot / eighths_per_bar;
            let position = slot % eighths_per_bar;
            let role = SlotRole::from_value(position);

            let mut quarter = (position / 2) as f64;
            if role.is_syncopation() {
                quarter += 0.5 + push;
            }

            if position == 0 {
                hits.push(DrumHit::new(DrumSound::Kick, measure, quarter));
            }

            match role {
                SlotRole::OddBeat => hits.push(DrumHit::new(DrumSound::Ride, measure, quarter)),
                SlotRole::EvenBeat => {
                    hits.push(DrumHit::new(DrumSound::Ride, measure, quarter));
                    hits.push(DrumHit::new(DrumSound::HiHat, measure, quarter));
                }
                SlotRole::SecondSyncopation => {
                    if rng.gen::<f64>() < RIDE_PROBABILITY {
                        hits.push(DrumHit::new(DrumSound::Ride, measure, quarter));
                    }
                }
                SlotRole::FirstSyncopation => {}
            }

            if role.is_syncopation() && rng.gen::<f64>() < SNARE_PROBABILITY {
                hits.push(DrumHit::new(DrumSound::Snare, measure, quarter));
            }

            let draw: f64 = rng.gen();
            if role.is_syncopation() {
                if draw < DOUBLE_SNARE_PROBABILITY {
                    hits.push(DrumHit::new(DrumSound::Snare, measure, quarter));
                    hits.push(DrumHit::new(DrumSound::Snare, measure, quarter.ceil()));
                } else if (EXTRA_SNARE_WINDOW.0..=EXTRA_SNARE_WINDOW.1).contains(&draw) {
                    hits.push(DrumHit::new(DrumSound::Snare, measure, quarter));
                }
            }
        }

        debug!(bars, hits = hits.len(), "drum pattern");
        hits
    }
}

impl Generator for DrumGenerator {
    type Output = Vec<DrumHit>;

    fn generate<R: Rng + ?Sized>(
        &self,
        items: &[ProgressionItem],
        context: &GeneratorContext,
        rng: &mut R,
    ) -> Result<Self::Output, GenerationError> {
        Ok(self.pattern(self.bars_for(items, context), context, rng))
    }

    fn set_param(&mut self, name: &str, value: f64) {
        if name == "default_bars" {
            self.default_bars = (value as u32).max(1);
        }
    }

    fn get_param(&self, name: &str) -> Option<f64> {
        match name {
            "default_bars" => Some(self.default_bars as f64),
            _ => None,
        }
    }

    fn name(&self) -> &'static str {
        "drums"
    }

    fn params(&self) -> HashMap<String, f64> {
        let mut params = HashMap::new();
        params.insert("default_bars".to_string(), self.default_bars as f64);
        params
    }
}
