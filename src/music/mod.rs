// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Music theory for jazzgen.
//!
//! Spelled pitches, chord symbols, and the chord-to-scale mapping the
//! generators walk through.

pub mod chord;
pub mod pitch;
pub mod scale;

pub use chord::{Alteration, Chord, ChordParseError, ChordShape, Quality, QualityKind};
pub use pitch::{Letter, MidiNote, NoteEvent, PitchClass, PitchRange, Semitones};
pub use scale::{chord_to_scale, gravitating_tones, Scale, ScaleType};
