// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Piano comping generator.
//!
//! Voices each chord as a close position stack above the base octave and
//! plays it on a fixed rhythm determined by the chord's duration.

use std::collections::HashMap;

use rand::Rng;
use tracing::debug;

use super::{Generator, GeneratorContext};
use crate::error::GenerationError;
use crate::music::{Chord, MidiNote, NoteEvent, PitchClass, QualityKind};
use crate::progression::ProgressionItem;

/// Octave of the chord root
pub const DEFAULT_BASE_OCTAVE: i32 = 3;

/// One comping hit: a chord (or silence) and its length in quarters
#[derive(Debug, Clone, PartialEq)]
pub struct Voicing {
    pub notes: Vec<NoteEvent>,
    pub duration: f64,
}

impl Voicing {
    pub fn rest(duration: f64) -> Self {
        Self {
            notes: Vec::new(),
            duration,
        }
    }

    pub fn is_rest(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn midi_notes(&self) -> Vec<MidiNote> {
        self.notes.iter().map(NoteEvent::to_midi).collect()
    }
}

/// Hit lengths for a chord lasting `duration` quarters
pub fn rhythm_for(duration: u32) -> Vec<f64> {
    match duration {
        4 => vec![2.5, 1.5],
        3 => vec![2.0, 1.0],
        2 => vec![1.0, 1.0],
        d => vec![d as f64],
    }
}

/// Voicing under construction
struct Stack {
    tones: Vec<NoteEvent>,
    previous: u8,
    top: i32,
    length: f64,
}

impl Stack {
    /// Highest octave so far, or one above when `pitch` is lower than the last tone
    fn octave_above(&self, pitch: PitchClass) -> i32 {
        if pitch.value() < self.previous {
            self.top + 1
        } else {
            self.top
        }
    }

    fn place(&mut self, pitch: PitchClass, octave: i32) {
        self.tones.push(NoteEvent::new(pitch, octave).with_length(self.length));
        self.previous = pitch.value();
        self.top = self.top.max(octave);
    }
}

/// Comping generator
#[derive(Debug, Clone)]
pub struct CompingGenerator {
    base_octave: i32,
}

impl Default for CompingGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl CompingGenerator {
    pub fn new() -> Self {
        Self {
            base_octave: DEFAULT_BASE_OCTAVE,
        }
    }

    pub fn with_base_octave(base_octave: i32) -> Self {
        Self { base_octave }
    }

    pub fn base_octave(&self) -> i32 {
        self.base_octave
    }

    /// Root, third, fifth, and seventh stacked upward from the base octave.
    ///
    /// Each tone starts at the highest octave used so far and moves up an
    /// octave when it would sit below the previous tone.
    pub fn chord_tones(&self, chord: &Chord, length: f64) -> Vec<NoteEvent> {
        let base = self.base_octave;
        let root = chord.root();
        let suspended = chord.quality().kind() == QualityKind::Suspended;

        let mut stack = Stack {
            tones: vec![NoteEvent::new(root, base).with_length(length)],
            previous: root.value(),
            top: base,
            length,
        };

        if !suspended {
            if let Some(third) = chord.third() {
                let octave = stack.octave_above(third);
                stack.place(third, octave);
            }
        }

        let fifth = chord.fifth();
        let mut octave = stack.octave_above(fifth);
        if suspended && fifth.value() < root.value() {
            octave = base + 1;
        }
        stack.place(fifth, octave);

        if let Some(seventh) = chord.seventh() {
            let mut octave = stack.octave_above(seventh);
            if octave == base {
                octave = base + 1;
            }
            stack.place(seventh, octave);
        }

        stack.tones
    }

    /// Voicings for every chord and rest in an expanded progression
    pub fn generate_voicings(&self, items: &[ProgressionItem]) -> Vec<Voicing> {
        let mut voicings = Vec::new();

        for item in items {
            match item {
                ProgressionItem::Chord { chord, duration } if *duration > 0 => {
                    let tones = self.chord_tones(chord, *duration as f64);
                    for length in rhythm_for(*duration) {
                        voicings.push(Voicing {
                            notes: tones.iter().map(|n| n.with_length(length)).collect(),
                            duration: length,
                        });
                    }
                    debug!(chord = %chord, tones = tones.len(), "comping voicing");
                }
                ProgressionItem::Rest { duration } if *duration > 0 => {
                    voicings.push(Voicing::rest(*duration as f64));
                }
                _ => {}
            }
        }

        voicings
    }
}

impl Generator for CompingGenerator {
    type Output = Vec<Voicing>;

    fn generate<R: Rng + ?Sized>(
        &self,
        items: &[ProgressionItem],
        _context: &GeneratorContext,
        _rng: &mut R,
    ) -> Result<Self::Output, GenerationError> {
        Ok(self.generate_voicings(items))
    }

    fn set_param(&mut self, name: &str, value: f64) {
        if name == "base_octave" {
            self.base_octave = value as i32;
        }
    }

    fn get_param(&self, name: &str) -> Option<f64> {
        match name {
            "base_octave" => Some(self.base_octave as f64),
            _ => None,
        }
    }

    fn name(&self) -> &'static str {
        "comping"
    }

    fn params(&self) -> HashMap<String, f64> {
        let mut params = HashMap::new();
        params.insert("base_octave".to_string(), self.base_octave as f64);
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progression::Progression;

    fn voiced(symbol: &str) -> Vec<String> {
        let chord = Chord::parse(symbol).unwrap();
        CompingGenerator::new()
            .chord_tones(&chord, 1.0)
            .iter()
            .map(|n| n.to_string())
            .collect()
    }

    #[test]
    fn test_dominant_voicing() {
        assert_eq!(voiced("F7"), vec!["F3", "A3", "C4", "Eb4"]);
        assert_eq!(voiced("Bb7"), vec!["Bb3", "D4", "F4", "Ab4"]);
    }

    #[test]
    fn test_triad_has_no_seventh() {
        assert_eq!(voiced("C"), vec!["C3", "E3", "G3"]);
    }

    #[test]
    fn test_seventh_in_base_octave_moves_up() {
        // G and B both sit above C, so only the seventh rule lifts B
        assert_eq!(voiced("Cmaj7"), vec!["C3", "E3", "G3", "B4"]);
    }

    #[test]
    fn test_suspended_voicing() {
        assert_eq!(voiced("Gsus4"), vec!["G3", "D4"]);
        assert_eq!(voiced("C7sus4"), vec!["C3", "G3", "Bb4"]);
    }

    #[test]
    fn test_diminished_fifth() {
        assert_eq!(voiced("Bdim7"), vec!["B3", "D4", "F4", "Ab4"]);
        assert_eq!(voiced("Dm7b5"), vec!["D3", "F3", "Ab3", "C4"]);
    }

    #[test]
    fn test_rhythm_for() {
        assert_eq!(rhythm_for(4), vec![2.5, 1.5]);
        assert_eq!(rhythm_for(3), vec![2.0, 1.0]);
        assert_eq!(rhythm_for(2), vec![1.0, 1.0]);
        assert_eq!(rhythm_for(1), vec![1.0]);
        assert_eq!(rhythm_for(8), vec![8.0]);
    }

    #[test]
    fn test_three_quarter_span() {
        let progression = Progression::parse_with_bar_length("F7", 3);
        let voicings = CompingGenerator::new().generate_voicings(progression.items());
        assert_eq!(voicings.len(), 2);
        assert_eq!(voicings[0].duration, 2.0);
        assert_eq!(voicings[1].duration, 1.0);
        assert_eq!(voicings[0].midi_notes(), voicings[1].midi_notes());
        assert!(voicings[1].notes.iter().all(|n| n.length == 1.0));
    }

    #[test]
    fn test_rests_keep_timeline_aligned() {
        let progression = Progression::parse("F7 xyz");
        let voicings = CompingGenerator::new().generate_voicings(progression.items());
        assert_eq!(voicings.len(), 3);
        assert!(voicings[2].is_rest());
        let total: f64 = voicings.iter().map(|v| v.duration).sum();
        assert_eq!(total, 4.0);
    }

    #[test]
    fn test_events_produce_nothing() {
        let progression = Progression::parse("# title\n*a");
        assert!(CompingGenerator::new()
            .generate_voicings(progression.items())
            .is_empty());
    }

    #[test]
    fn test_base_octave_param() {
        let mut gen = CompingGenerator::new();
        gen.set_param("base_octave", 4.0);
        assert_eq!(gen.base_octave(), 4);
        assert_eq!(gen.get_param("base_octave"), Some(4.0));
        assert_eq!(gen.name(), "comping");
    }
}
