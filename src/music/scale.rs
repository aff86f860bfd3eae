// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Chord-scale derivation.
//!
//! Maps a chord onto the scale a walking line moves through, and onto the
//! set of tones that lead most strongly into it.

use std::fmt;

use super::chord::{Chord, Quality, QualityKind};
use super::pitch::{PitchClass, Semitones};

/// Semitones of degrees 1-7 of the natural major scale
const MAJOR_DEGREES: [Semitones; 7] = [0, 2, 4, 5, 7, 9, 11];

/// Scale families a chord can map onto
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScaleType {
    /// Seven-degree major baseline with the chord's alterations applied
    Major,
    /// Major baseline without a third (degrees 1, 2, 4, 5, 6, 7)
    Suspended,
    /// Octatonic whole-half scale
    DiminishedWH,
    /// Scale built from explicit intervals
    Custom,
}

impl ScaleType {
    /// Scale degrees (1-based) drawn from the major baseline
    pub fn degrees(self) -> &'static [u8] {
        match self {
            ScaleType::Major => &[1, 2, 3, 4, 5, 6, 7],
            ScaleType::Suspended => &[1, 2, 4, 5, 6, 7],
            ScaleType::DiminishedWH | ScaleType::Custom => &[],
        }
    }

    /// Fixed intervals for symmetric scales
    pub fn fixed_intervals(self) -> Option<&'static [Semitones]> {
        match self {
            ScaleType::DiminishedWH => Some(&[0, 2, 3, 5, 6, 8, 9, 11]),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ScaleType::Major => "Major",
            ScaleType::Suspended => "Suspended",
            ScaleType::DiminishedWH => "Diminished (W-H)",
            ScaleType::Custom => "Custom",
        }
    }
}

impl fmt::Display for ScaleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A scale with root, family, and spelled tones
#[derive(Debug, Clone, PartialEq)]
pub struct Scale {
    root: PitchClass,
    scale_type: ScaleType,
    intervals: Vec<Semitones>,
    tones: Vec<PitchClass>,
}

impl Scale {
    /// Create a scale of a symmetric family (or the plain major baseline)
    pub fn new(root: PitchClass, scale_type: ScaleType) -> Self {
        let intervals = match scale_type.fixed_intervals() {
            Some(fixed) => fixed.to_vec(),
            None => scale_type
                .degrees()
                .iter()
                .map(|&d| MAJOR_DEGREES[(d - 1) as usize])
                .collect(),
        };
        Self::with_intervals(root, scale_type, intervals)
    }

    /// Create a custom scale from root and intervals
    pub fn custom(root: PitchClass, intervals: Vec<Semitones>) -> Self {
        Self::with_intervals(root, ScaleType::Custom, intervals)
    }

    /// Degree-based families take their letters from the degrees; the
    /// others are spelled by transposition.
    fn with_intervals(root: PitchClass, scale_type: ScaleType, intervals: Vec<Semitones>) -> Self {
        let degrees = scale_type.degrees();
        let tones = if degrees.len() == intervals.len() {
            degrees
                .iter()
                .zip(&intervals)
                .map(|(&d, &i)| root.degree((d - 1) as usize, i))
                .collect()
        } else {
            intervals.iter().map(|&i| root.transpose(i)).collect()
        };
        Self {
            root,
            scale_type,
            intervals,
            tones,
        }
    }

    pub fn root(&self) -> PitchClass {
        self.root
    }

    pub fn scale_type(&self) -> ScaleType {
        self.scale_type
    }

    /// Intervals in semitones from the root
    pub fn intervals(&self) -> &[Semitones] {
        &self.intervals
    }

    /// Spelled tones, in degree order
    pub fn tones(&self) -> &[PitchClass] {
        &self.tones
    }

    pub fn len(&self) -> usize {
        self.tones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tones.is_empty()
    }

    /// Membership by sounding pitch
    pub fn contains(&self, pitch: PitchClass) -> bool {
        self.tones.iter().any(|t| t.is_enharmonic(pitch))
    }

    /// Position (1-based) of a tone, if it's in the scale
    pub fn degree_of(&self, pitch: PitchClass) -> Option<usize> {
        self.tones
            .iter()
            .position(|t| t.is_enharmonic(pitch))
            .map(|i| i + 1)
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.root, self.scale_type)
    }
}

/// Extension degrees fold onto the first octave (9 -> 2, 11 -> 4, 13 -> 6)
fn fold_degree(degree: u8) -> u8 {
    if degree > 7 {
        degree % 7
    } else {
        degree
    }
}

/// Semitones above the root for a degree of the major baseline,
/// after the quality's alteration of that degree
pub fn degree_semitones(quality: &Quality, degree: u8) -> Semitones {
    let base = MAJOR_DEGREES[(degree.clamp(1, 7) - 1) as usize];
    let offset = quality
        .alterations()
        .iter()
        .filter(|(&d, _)| fold_degree(d) == degree)
        .last()
        .map(|(_, alteration)| alteration.offset())
        .unwrap_or(0);
    base + offset
}

/// Scale a walking line uses over `chord`
pub fn chord_to_scale(chord: &Chord) -> Scale {
    let quality = chord.quality();
    let scale_type = match quality.kind() {
        QualityKind::Diminished => return Scale::new(chord.root(), ScaleType::DiminishedWH),
        QualityKind::Suspended => ScaleType::Suspended,
        _ => ScaleType::Major,
    };

    let intervals = scale_type
        .degrees()
        .iter()
        .map(|&d| degree_semitones(quality, d))
        .collect();
    Scale::with_intervals(chord.root(), scale_type, intervals)
}

/// Tones with a strong pull toward `chord`'s root, without enharmonic duplicates
pub fn gravitating_tones(chord: &Chord) -> Vec<PitchClass> {
    let quality = chord.quality();
    let dominant = quality.is_dominant();
    let major_seventh = quality.is_major_seventh();
    let minor_seventh = quality.is_minor_seventh();

    let mut offsets: Vec<Semitones> = Vec::new();
    if dominant || major_seventh || minor_seventh {
        // leading tone, fifth above
        offsets.extend([-1, 7]);
    }
    if dominant {
        offsets.push(1);
    }
    if major_seventh {
        offsets.extend([2, 4]);
    }
    if minor_seventh {
        offsets.push(-2);
    }
    if offsets.is_empty() {
        // leading tone
        offsets.push(-1);
    }

    let mut tones: Vec<PitchClass> = Vec::with_capacity(offsets.len());
    for tone in offsets.into_iter().map(|o| chord.root().transpose(o)) {
        if !tones.iter().any(|t| t.is_enharmonic(tone)) {
            tones.push(tone);
        }
    }
    tones
}
