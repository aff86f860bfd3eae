// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Walking bass generator.
//!
//! Each chord span is a random scale-wise walk from the previous span's
//! last note. Its last two notes lead into the next chord: a tone that
//! gravitates toward it, then its root. Consecutive spans share a note,
//! which is played once.

use std::collections::HashMap;

use rand::Rng;
use tracing::{debug, warn};

use super::{playable_chords, Generator, GeneratorContext};
use crate::error::GenerationError;
use crate::music::{chord_to_scale, gravitating_tones, Chord, NoteEvent, PitchClass, PitchRange};
use crate::progression::ProgressionItem;

/// Lowest allowed bass pitch (F#1)
pub const LOWER_BOUND: i32 = 30;

/// Highest allowed bass pitch (G3)
pub const UPPER_BOUND: i32 = 55;

/// Octave of the very first root
pub const START_OCTAVE: i32 = 2;

/// Largest random step, in scale positions
pub const MAX_STEP: i32 = 2;

/// Narrowest allowed range, in semitones
pub const MIN_SPAN: i32 = 12;

/// Draws per walk step before giving up
const MAX_WALK_ATTEMPTS: usize = 64;

/// Range and starting register of the line
#[derive(Debug, Clone, PartialEq)]
pub struct BassConfig {
    pub range: PitchRange,
    pub start_octave: i32,
}

impl Default for BassConfig {
    fn default() -> Self {
        Self {
            range: PitchRange::new(LOWER_BOUND, UPPER_BOUND),
            start_octave: START_OCTAVE,
        }
    }
}

impl BassConfig {
    /// The range must hold at least an octave so every pitch class fits
    pub fn validate(&self) -> Result<(), GenerationError> {
        if self.range.span() < MIN_SPAN {
            return Err(GenerationError::InvalidRange {
                lower: self.range.lower,
                upper: self.range.upper,
            });
        }
        Ok(())
    }
}

/// Walking bass line generator
#[derive(Debug, Clone, Default)]
pub struct BassLineGenerator {
    config: BassConfig,
}

impl BassLineGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: BassConfig) -> Result<Self, GenerationError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &BassConfig {
        &self.config
    }

    /// Root of the first chord at the start octave, moved by octaves into range
    fn start_note(&self, root: PitchClass) -> NoteEvent {
        let range = self.config.range;
        let mut note = NoteEvent::new(root, self.config.start_octave);
        while !note.is_in_upper_bound(range.upper) {
            note.octave -= 1;
        }
        while !note.is_in_lower_bound(range.lower) {
            note.octave += 1;
        }
        note
    }

    /// One random step through `scale`, forced back into range.
    ///
    /// Steps that repeat the current pitch or land outside the range are
    /// drawn again, up to [`MAX_WALK_ATTEMPTS`] times.
    fn walk_step<R: Rng + ?Sized>(
        &self,
        chord: &Chord,
        current: NoteEvent,
        scale: &[PitchClass],
        rng: &mut R,
    ) -> Result<NoteEvent, GenerationError> {
        let range = self.config.range;
        for _ in 0..MAX_WALK_ATTEMPTS {
            let mut next = current.go_in_scale(scale, rng.gen_range(-MAX_STEP..=MAX_STEP));
            while !next.is_in_upper_bound(range.upper) {
                next = next.go_in_scale(scale, -1);
            }
            while !next.is_in_lower_bound(range.lower) {
                next = next.go_in_scale(scale, 1);
            }
            if !next.same_pitch(&current) && next.is_in_range(range) {
                return Ok(next);
            }
        }
        Err(GenerationError::WalkStuck {
            chord: chord.to_string(),
            from: current.to_string(),
        })
    }

    /// Notes for one chord span of `quarters` quarters.
    ///
    /// Starts at `carry_in` (or the chord root at the start octave, folded
    /// into range) and holds `quarters + 1` notes: the walk, a gravitating tone of `next`,
    /// then the root of `next`.
    pub fn generate_span<R: Rng + ?Sized>(
        &self,
        quarters: u32,
        chord: &Chord,
        next: &Chord,
        carry_in: Option<NoteEvent>,
        rng: &mut R,
    ) -> Result<Vec<NoteEvent>, GenerationError> {
        let range = self.config.range;
        let scale = chord_to_scale(chord);
        let start = carry_in.unwrap_or_else(|| self.start_note(chord.root()));

        let walk_length = quarters.saturating_sub(1) as usize;
        let mut notes = vec![start];
        let mut last = start;
        while notes.len() < walk_length {
            last = self.walk_step(chord, last, scale.tones(), rng)?;
            notes.push(last);
        }

        let resolution = last
            .closest_note(&gravitating_tones(next), Some(range))
            .ok_or_else(|| GenerationError::NoResolutionTone {
                chord: chord.to_string(),
                next: next.to_string(),
                from: last.to_string(),
            })?;

        let root = [next.root()];
        let arrival = resolution
            .closest_note(&root, Some(range))
            .or_else(|| resolution.closest_note(&root, None))
            .unwrap_or_else(|| NoteEvent::new(next.root(), resolution.octave));

        notes.push(resolution);
        notes.push(arrival);

        debug!(
            chord = %chord,
            next = %next,
            notes = ?notes.iter().map(|n| n.to_string()).collect::<Vec<_>>(),
            "bass span"
        );
        Ok(notes)
    }

    /// Full line for an expanded progression.
    ///
    /// Each span after the first starts on the previous span's last note,
    /// which is played once.
    pub fn generate_line<R: Rng + ?Sized>(
        &self,
        items: &[ProgressionItem],
        rng: &mut R,
    ) -> Result<Vec<NoteEvent>, GenerationError> {
        self.config.validate()?;
        let chords = playable_chords(items);
        let mut line: Vec<NoteEvent> = Vec::new();

        for (index, &(chord, quarters)) in chords.iter().enumerate() {
            // wraps to the first chord at the end
            let next = chords
                .get(index + 1)
                .or_else(|| chords.first())
                .map(|&(c, _)| c)
                .unwrap_or(chord);

            let carry_in = line.last().copied();
            let span = self.generate_span(quarters, chord, next, carry_in, rng)?;

            let shared = usize::from(carry_in.is_some());
            line.extend_from_slice(&span[shared..]);
        }

        Ok(line)
    }
}

impl Generator for BassLineGenerator {
    type Output = Vec<NoteEvent>;

    fn generate<R: Rng + ?Sized>(
        &self,
        items: &[ProgressionItem],
        _context: &GeneratorContext,
        rng: &mut R,
    ) -> Result<Self::Output, GenerationError> {
        self.generate_line(items, rng)
    }

    fn set_param(&mut self, name: &str, value: f64) {
        let mut config = self.config.clone();
        match name {
            "lower_bound" => config.range.lower = value as i32,
            "upper_bound" => config.range.upper = value as i32,
            "start_octave" => config.start_octave = value as i32,
            _ => return,
        }
        match config.validate() {
            Ok(()) => self.config = config,
            Err(e) => warn!(param = name, value, "ignoring bass parameter: {}", e),
        }
    }

    fn get_param(&self, name: &str) -> Option<f64> {
        match name {
            "lower_bound" => Some(self.config.range.lower as f64),
            "upper_bound" => Some(self.config.range.upper as f64),
            "start_octave" => Some(self.config.start_octave as f64),
            _ => None,
        }
    }

    fn name(&self) -> &'static str {
        "bass"
    }

    fn params(&self) -> HashMap<String, f64> {
        ["lower_bound", "upper_bound", "start_octave"]
            .iter()
            .filter_map(|&name| self.get_param(name).map(|v| (name.to_string(), v)))
            .collect()
    }
}
