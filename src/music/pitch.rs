// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Pitch classes and octave-placed notes.
//!
//! Provides letter/accidental spelling, absolute pitch numbers
//! (middle C = C4 = 60), navigation within a scale, and the
//! nearest-pitch search used for voice leading.

use std::fmt;

/// Absolute pitch number (C4 = 60)
pub type MidiNote = i32;

/// Semitone offset type
pub type Semitones = i32;

/// Lowest octave that maps onto the 0-127 pitch range
pub const MIN_OCTAVE: i32 = -1;

/// Highest octave that maps onto the 0-127 pitch range
pub const MAX_OCTAVE: i32 = 9;

/// Default note length in quarters
pub const DEFAULT_LENGTH: f64 = 1.0;

/// Note letters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Letter {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl Letter {
    /// All letters in ascending order from C
    pub const ALL: [Letter; 7] = [
        Letter::C,
        Letter::D,
        Letter::E,
        Letter::F,
        Letter::G,
        Letter::A,
        Letter::B,
    ];

    /// Semitone value of the unaltered letter (C = 0)
    pub fn natural_value(self) -> u8 {
        match self {
            Letter::C => 0,
            Letter::D => 2,
            Letter::E => 4,
            Letter::F => 5,
            Letter::G => 7,
            Letter::A => 9,
            Letter::B => 11,
        }
    }

    /// Letter `steps` names above this one, wrapping from B to C
    pub fn up(self, steps: usize) -> Self {
        let index = Self::ALL.iter().position(|&l| l == self).unwrap_or(0);
        Self::ALL[(index + steps) % Self::ALL.len()]
    }

    /// Parse a letter, case-insensitive
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'C' => Some(Letter::C),
            'D' => Some(Letter::D),
            'E' => Some(Letter::E),
            'F' => Some(Letter::F),
            'G' => Some(Letter::G),
            'A' => Some(Letter::A),
            'B' => Some(Letter::B),
            _ => None,
        }
    }
}

impl fmt::Display for Letter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            Letter::C => 'C',
            Letter::D => 'D',
            Letter::E => 'E',
            Letter::F => 'F',
            Letter::G => 'G',
            Letter::A => 'A',
            Letter::B => 'B',
        };
        write!(f, "{}", c)
    }
}

/// Spellings used when a pitch value has to be named from scratch
const FLAT_SPELLINGS: [(Letter, i8); 12] = [
    (Letter::C, 0),
    (Letter::D, -1),
    (Letter::D, 0),
    (Letter::E, -1),
    (Letter::E, 0),
    (Letter::F, 0),
    (Letter::G, -1),
    (Letter::G, 0),
    (Letter::A, -1),
    (Letter::A, 0),
    (Letter::B, -1),
    (Letter::B, 0),
];

const SHARP_SPELLINGS: [(Letter, i8); 12] = [
    (Letter::C, 0),
    (Letter::C, 1),
    (Letter::D, 0),
    (Letter::D, 1),
    (Letter::E, 0),
    (Letter::F, 0),
    (Letter::F, 1),
    (Letter::G, 0),
    (Letter::G, 1),
    (Letter::A, 0),
    (Letter::A, 1),
    (Letter::B, 0),
];

/// A spelled pitch class: a letter plus an accidental offset in semitones.
///
/// `==` compares spelling (`Bb != A#`); use [`PitchClass::is_enharmonic`]
/// when only the sounding pitch matters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PitchClass {
    letter: Letter,
    accidental: i8,
}

impl PitchClass {
    /// Create a pitch class from a letter and accidental offset
    pub const fn new(letter: Letter, accidental: i8) -> Self {
        Self { letter, accidental }
    }

    /// Create an unaltered pitch class
    pub const fn natural(letter: Letter) -> Self {
        Self::new(letter, 0)
    }

    /// Name a pitch value (0-11) using flats for the black keys
    pub fn from_value_flat(value: u8) -> Self {
        let (letter, accidental) = FLAT_SPELLINGS[(value % 12) as usize];
        Self::new(letter, accidental)
    }

    /// Name a pitch value (0-11) using sharps for the black keys
    pub fn from_value_sharp(value: u8) -> Self {
        let (letter, accidental) = SHARP_SPELLINGS[(value % 12) as usize];
        Self::new(letter, accidental)
    }

    /// Parse a pitch class (e.g., "C", "Bb", "F#", "E♭")
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        let mut chars = s.chars();
        let letter = Letter::from_char(chars.next()?)?;
        let mut accidental = 0i8;
        for c in chars {
            match c {
                '#' | '♯' => accidental += 1,
                'b' | '♭' => accidental -= 1,
                _ => return None,
            }
        }
        Some(Self::new(letter, accidental))
    }

    pub fn letter(self) -> Letter {
        self.letter
    }

    pub fn accidental(self) -> i8 {
        self.accidental
    }

    /// Pitch value in 0-11 (C = 0)
    pub fn value(self) -> u8 {
        (self.letter.natural_value() as i16 + self.accidental as i16).rem_euclid(12) as u8
    }

    /// Same sounding pitch, regardless of spelling
    pub fn is_enharmonic(self, other: PitchClass) -> bool {
        self.value() == other.value()
    }

    /// Transpose by semitones.
    ///
    /// Natural letters are preferred; black keys are spelled with sharps
    /// when this pitch is spelled with a sharp, otherwise with flats.
    pub fn transpose(self, semitones: Semitones) -> Self {
        let target = (self.value() as i32 + semitones).rem_euclid(12) as u8;
        if self.accidental > 0 {
            Self::from_value_sharp(target)
        } else {
            Self::from_value_flat(target)
        }
    }

    /// Spell pitch `value` (0-11) on `letter`, with the smallest accidental
    pub fn spelled(letter: Letter, value: u8) -> Self {
        let offset = (value as i16 - letter.natural_value() as i16 + 6).rem_euclid(12) - 6;
        Self::new(letter, offset as i8)
    }

    /// Tone `letters` letter names and `semitones` semitones above this one.
    ///
    /// The letter follows the degree, so the third of D is F# and the
    /// seventh of B diminished is Ab.
    pub fn degree(self, letters: usize, semitones: Semitones) -> Self {
        let target = (self.value() as i32 + semitones).rem_euclid(12) as u8;
        Self::spelled(self.letter.up(letters), target)
    }

    /// Ascending interval in semitones to another pitch class
    pub fn interval_to(self, other: PitchClass) -> u8 {
        (other.value() as i16 - self.value() as i16).rem_euclid(12) as u8
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter)?;
        let symbol = if self.accidental > 0 { "#" } else { "b" };
        for _ in 0..self.accidental.unsigned_abs() {
            f.write_str(symbol)?;
        }
        Ok(())
    }
}

/// Inclusive band of absolute pitches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PitchRange {
    pub lower: MidiNote,
    pub upper: MidiNote,
}

impl PitchRange {
    pub const fn new(lower: MidiNote, upper: MidiNote) -> Self {
        Self { lower, upper }
    }

    pub fn contains(&self, pitch: MidiNote) -> bool {
        self.lower <= pitch && pitch <= self.upper
    }

    /// Width of the band in semitones
    pub fn span(&self) -> i32 {
        self.upper - self.lower
    }
}

/// A pitch class placed in an octave, with a length in quarters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoteEvent {
    pub pitch: PitchClass,
    pub octave: i32,
    pub length: f64,
}

impl NoteEvent {
    /// Create a note with the default length of one quarter
    pub fn new(pitch: PitchClass, octave: i32) -> Self {
        Self {
            pitch,
            octave,
            length: DEFAULT_LENGTH,
        }
    }

    /// Same note with a different length
    pub fn with_length(mut self, length: f64) -> Self {
        self.length = length;
        self
    }

    /// Absolute pitch number; octave 4 holds middle C (60)
    pub fn to_midi(&self) -> MidiNote {
        self.pitch.value() as MidiNote + 12 * (self.octave + 1)
    }

    /// Note for an absolute pitch number, spelled with flats
    pub fn from_midi(midi: MidiNote) -> Self {
        let value = midi.rem_euclid(12) as u8;
        Self::new(PitchClass::from_value_flat(value), midi.div_euclid(12) - 1)
    }

    /// Transpose by semitones, keeping the length
    pub fn transpose(&self, semitones: Semitones) -> Self {
        Self::from_midi(self.to_midi() + semitones).with_length(self.length)
    }

    /// Same absolute pitch, regardless of spelling and length
    pub fn same_pitch(&self, other: &NoteEvent) -> bool {
        self.to_midi() == other.to_midi()
    }

    pub fn is_in_upper_bound(&self, upper: MidiNote) -> bool {
        self.to_midi() <= upper
    }

    pub fn is_in_lower_bound(&self, lower: MidiNote) -> bool {
        self.to_midi() >= lower
    }

    pub fn is_in_range(&self, range: PitchRange) -> bool {
        range.contains(self.to_midi())
    }

    /// Move by `steps` positions through `scale`.
    ///
    /// The scale is ordered by pitch value so that wrapping past B crosses
    /// into the next octave. A note outside the scale starts from the
    /// nearest scale tone.
    pub fn go_in_scale(&self, scale: &[PitchClass], steps: i32) -> Self {
        if scale.is_empty() {
            return *self;
        }

        let mut ordered = scale.to_vec();
        ordered.sort_by_key(|pc| pc.value());

        let current = ordered
            .iter()
            .position(|pc| pc.is_enharmonic(self.pitch))
            .unwrap_or_else(|| nearest_position(&ordered, self.pitch));

        let len = ordered.len() as i32;
        let target = current as i32 + steps;

        Self {
            pitch: ordered[target.rem_euclid(len) as usize],
            octave: self.octave + target.div_euclid(len),
            length: self.length,
        }
    }

    /// Nearest placement of `other` in this octave or a neighbouring one.
    ///
    /// Candidates are probed in the order same octave, one below, one above;
    /// ties keep that order. With a range, the nearest in-range candidate
    /// wins when one exists.
    pub fn nearest_octave_of(&self, other: PitchClass, range: Option<PitchRange>) -> NoteEvent {
        let current = self.to_midi();
        let mut candidates = self.octave_placements(other);
        candidates.sort_by_key(|n| (n.to_midi() - current).abs());

        let closest = candidates[0];
        match range {
            Some(range) => candidates
                .into_iter()
                .find(|n| n.is_in_range(range))
                .unwrap_or(closest),
            None => closest,
        }
    }

    /// Signed distance in semitones to the nearest placement of `other`
    pub fn semitone_distance(&self, other: PitchClass, range: Option<PitchRange>) -> Semitones {
        self.nearest_octave_of(other, range).to_midi() - self.to_midi()
    }

    /// Closest note among `candidates`, never this same pitch.
    ///
    /// Every candidate is placed in this octave and both neighbours, in
    /// that order. Placements on this pitch or outside `range` are dropped
    /// and ties keep candidate then placement order. Returns `None` when
    /// nothing is left.
    pub fn closest_note(&self, candidates: &[PitchClass], range: Option<PitchRange>) -> Option<NoteEvent> {
        let current = self.to_midi();
        let mut found: Vec<(NoteEvent, Semitones)> = candidates
            .iter()
            .flat_map(|&pc| self.octave_placements(pc))
            .map(|note| (note.with_length(self.length), note.to_midi() - current))
            .filter(|&(_, distance)| distance != 0)
            .filter(|(note, _)| range.map_or(true, |range| note.is_in_range(range)))
            .collect();
        found.sort_by_key(|&(_, distance)| distance.abs());
        found.into_iter().next().map(|(note, _)| note)
    }

    /// `other` in this octave, the one below, then the one above
    fn octave_placements(&self, other: PitchClass) -> Vec<NoteEvent> {
        let mut placements = vec![NoteEvent::new(other, self.octave)];
        if self.octave > 0 {
            placements.push(NoteEvent::new(other, self.octave - 1));
        }
        if self.octave < 10 {
            placements.push(NoteEvent::new(other, self.octave + 1));
        }
        placements
    }
}

impl fmt::Display for NoteEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.pitch, self.octave)
    }
}

/// Position of the scale tone closest to `pitch` (circular distance)
fn nearest_position(ordered: &[PitchClass], pitch: PitchClass) -> usize {
    let pc = pitch.value() as i8;
    let mut min_dist = 12i8;
    let mut nearest = 0usize;

    for (i, tone) in ordered.iter().enumerate() {
        let diff = (pc - tone.value() as i8).abs();
        let dist = diff.min(12 - diff);
        if dist < min_dist {
            min_dist = dist;
            nearest = i;
        }
    }

    nearest
}
