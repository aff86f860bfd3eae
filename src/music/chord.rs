// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Chord symbols and their qualities.
//!
//! A symbol such as `Bb7b9` parses into a root, a [`Quality`] (kind,
//! extension, altered degrees), and any explicit fifth the alterations imply.
//! Interval content comes from a decision table on [`QualityKind`].

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use super::pitch::{Letter, PitchClass, Semitones};

/// Errors from parsing a chord symbol
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ChordParseError {
    #[error("empty chord symbol")]
    Empty,

    #[error("invalid root in chord symbol '{0}'")]
    InvalidRoot(String),

    #[error("unknown chord quality '{quality}' in '{symbol}'")]
    UnknownQuality { symbol: String, quality: String },

    #[error("invalid alteration '{alteration}' in '{symbol}'")]
    InvalidAlteration { symbol: String, alteration: String },
}

/// Base chord families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QualityKind {
    Major,
    Minor,
    Dominant,
    HalfDiminished,
    Diminished,
    Suspended,
}

/// Alteration applied to a scale degree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Alteration {
    Flat,
    Sharp,
    Natural,
}

impl Alteration {
    /// Semitone offset from the unaltered degree
    pub fn offset(self) -> Semitones {
        match self {
            Alteration::Flat => -1,
            Alteration::Sharp => 1,
            Alteration::Natural => 0,
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            Alteration::Flat => "b",
            Alteration::Sharp => "#",
            Alteration::Natural => "nat",
        }
    }
}

/// Interval content implied by a quality (semitones above the root)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChordShape {
    pub third: Option<Semitones>,
    pub fifth: Semitones,
    pub seventh: Option<Semitones>,
}

/// Chord quality: kind, optional extension, altered degrees
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quality {
    kind: QualityKind,
    extension: Option<u8>,
    alterations: BTreeMap<u8, Alteration>,
}

impl Quality {
    /// Create a quality; half-diminished always records its flat fifth
    pub fn new(kind: QualityKind, extension: Option<u8>) -> Self {
        let mut alterations = BTreeMap::new();
        if kind == QualityKind::HalfDiminished {
            alterations.insert(5, Alteration::Flat);
        }
        Self {
            kind,
            extension,
            alterations,
        }
    }

    /// Record an altered degree (2-13); a later alteration of the same degree wins
    pub fn with_alteration(mut self, degree: u8, alteration: Alteration) -> Self {
        self.alterations.insert(degree, alteration);
        self
    }

    pub fn kind(&self) -> QualityKind {
        self.kind
    }

    pub fn extension(&self) -> Option<u8> {
        self.extension
    }

    pub fn alterations(&self) -> &BTreeMap<u8, Alteration> {
        &self.alterations
    }

    pub fn alteration(&self, degree: u8) -> Option<Alteration> {
        self.alterations.get(&degree).copied()
    }

    pub fn has_seventh(&self) -> bool {
        self.extension.is_some()
    }

    pub fn is_dominant(&self) -> bool {
        self.kind == QualityKind::Dominant
    }

    pub fn is_major_seventh(&self) -> bool {
        self.kind == QualityKind::Major && self.has_seventh()
    }

    /// Minor seventh family, excluding half-diminished
    pub fn is_minor_seventh(&self) -> bool {
        self.kind == QualityKind::Minor && self.has_seventh()
    }

    /// Decision table from kind to interval content
    pub fn shape(&self) -> ChordShape {
        use QualityKind::*;

        let seventh = self.extension.map(|_| match self.kind {
            Major => 11,
            Diminished => 9,
            Minor | Dominant | HalfDiminished | Suspended => 10,
        });

        match self.kind {
            Major | Dominant => ChordShape {
                third: Some(4),
                fifth: 7,
                seventh,
            },
            Minor => ChordShape {
                third: Some(3),
                fifth: 7,
                seventh,
            },
            HalfDiminished | Diminished => ChordShape {
                third: Some(3),
                fifth: 6,
                seventh,
            },
            Suspended => ChordShape {
                third: None,
                fifth: 7,
                seventh,
            },
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ext = self.extension.map(|e| e.to_string()).unwrap_or_default();
        match self.kind {
            QualityKind::Major if self.extension.is_some() => write!(f, "maj{}", ext)?,
            QualityKind::Major => {}
            QualityKind::Minor => write!(f, "m{}", ext)?,
            QualityKind::Dominant => write!(f, "{}", ext)?,
            QualityKind::HalfDiminished => write!(f, "m7b5")?,
            QualityKind::Diminished => write!(f, "dim{}", ext)?,
            QualityKind::Suspended => write!(f, "{}sus", ext)?,
        }
        for (&degree, &alteration) in &self.alterations {
            if self.kind == QualityKind::HalfDiminished && degree == 5 && alteration == Alteration::Flat {
                continue;
            }
            write!(f, "{}{}", alteration.symbol(), degree)?;
        }
        Ok(())
    }
}

/// A chord: root, quality, and optional explicit chord tones
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chord {
    root: PitchClass,
    quality: Quality,
    third: Option<PitchClass>,
    fifth: Option<PitchClass>,
    seventh: Option<PitchClass>,
}

impl Chord {
    pub fn new(root: PitchClass, quality: Quality) -> Self {
        Self {
            root,
            quality,
            third: None,
            fifth: None,
            seventh: None,
        }
    }

    pub fn with_third(mut self, third: PitchClass) -> Self {
        self.third = Some(third);
        self
    }

    pub fn with_fifth(mut self, fifth: PitchClass) -> Self {
        self.fifth = Some(fifth);
        self
    }

    pub fn with_seventh(mut self, seventh: PitchClass) -> Self {
        self.seventh = Some(seventh);
        self
    }

    /// Parse a chord symbol (e.g., "F7", "Bbmaj7", "C#m7b5", "G7(b9,#11)")
    pub fn parse(symbol: &str) -> Result<Self, ChordParseError> {
        parse_symbol(symbol)
    }

    pub fn root(&self) -> PitchClass {
        self.root
    }

    pub fn quality(&self) -> &Quality {
        &self.quality
    }

    /// Third, unless the quality has none and no override is set
    pub fn third(&self) -> Option<PitchClass> {
        self.third
            .or_else(|| self.quality.shape().third.map(|i| self.root.degree(2, i)))
    }

    pub fn fifth(&self) -> PitchClass {
        self.fifth
            .unwrap_or_else(|| self.root.degree(4, self.quality.shape().fifth))
    }

    /// Seventh, when the quality implies one or an override is set
    pub fn seventh(&self) -> Option<PitchClass> {
        self.seventh
            .or_else(|| self.quality.shape().seventh.map(|i| self.root.degree(6, i)))
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.root, self.quality)
    }
}

impl FromStr for Chord {
    type Err = ChordParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Chord::parse(s)
    }
}

/// Quality tokens matched before the generic major/minor/dominant rules
const DIMINISHED_TOKENS: &[(&str, QualityKind, Option<u8>)] = &[
    ("min7b5", QualityKind::HalfDiminished, Some(7)),
    ("m7b5", QualityKind::HalfDiminished, Some(7)),
    ("-7b5", QualityKind::HalfDiminished, Some(7)),
    ("ø7", QualityKind::HalfDiminished, Some(7)),
    ("ø", QualityKind::HalfDiminished, Some(7)),
    ("dim7", QualityKind::Diminished, Some(7)),
    ("°7", QualityKind::Diminished, Some(7)),
    ("o7", QualityKind::Diminished, Some(7)),
    ("dim", QualityKind::Diminished, None),
    ("°", QualityKind::Diminished, None),
    ("o", QualityKind::Diminished, None),
];

const MAJOR_PREFIXES: &[&str] = &["maj", "M", "Δ"];
const MINOR_PREFIXES: &[&str] = &["min", "m", "-"];

fn parse_symbol(symbol: &str) -> Result<Chord, ChordParseError> {
    let symbol = symbol.trim();
    let first = symbol.chars().next().ok_or(ChordParseError::Empty)?;
    let letter = Letter::from_char(first)
        .filter(|_| first.is_ascii_uppercase())
        .ok_or_else(|| ChordParseError::InvalidRoot(symbol.to_string()))?;

    let mut rest = &symbol[first.len_utf8()..];
    let mut accidental = 0i8;
    loop {
        if let Some(r) = rest.strip_prefix('#').or_else(|| rest.strip_prefix('♯')) {
            accidental += 1;
            rest = r;
        } else if let Some(r) = rest.strip_prefix('b').or_else(|| rest.strip_prefix('♭')) {
            accidental -= 1;
            rest = r;
        } else {
            break;
        }
    }
    let root = PitchClass::new(letter, accidental);

    let (mut quality, rest) = parse_quality(symbol, rest)?;
    let alterations = parse_alterations(symbol, rest)?;

    let mut fifth = None;
    for (degree, alteration) in alterations {
        if degree == 5 {
            let natural = root.degree(4, 7);
            fifth = Some(PitchClass::new(
                natural.letter(),
                natural.accidental() + alteration.offset() as i8,
            ));
        }
        quality = quality.with_alteration(degree, alteration);
    }

    let mut chord = Chord::new(root, quality);
    if let Some(fifth) = fifth {
        chord = chord.with_fifth(fifth);
    }
    Ok(chord)
}

/// Split leading ASCII digits off `s`
fn leading_number(s: &str) -> (Option<u8>, &str) {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    if end == 0 {
        return (None, s);
    }
    (s[..end].parse().ok(), &s[end..])
}

/// Optional seventh-family extension
fn parse_extension<'a>(symbol: &str, s: &'a str) -> Result<(Option<u8>, &'a str), ChordParseError> {
    match leading_number(s) {
        (None, rest) if rest.len() == s.len() => Ok((None, s)),
        (Some(ext @ (7 | 9 | 11 | 13)), rest) => Ok((Some(ext), rest)),
        _ => Err(ChordParseError::UnknownQuality {
            symbol: symbol.to_string(),
            quality: s.to_string(),
        }),
    }
}

/// `sus`, `sus2`, or `sus4`
fn strip_sus(s: &str) -> Option<&str> {
    let rest = s.strip_prefix("sus")?;
    Some(
        rest.strip_prefix('4')
            .or_else(|| rest.strip_prefix('2'))
            .unwrap_or(rest),
    )
}

fn parse_quality<'a>(symbol: &str, s: &'a str) -> Result<(Quality, &'a str), ChordParseError> {
    for &(token, kind, extension) in DIMINISHED_TOKENS {
        if let Some(rest) = s.strip_prefix(token) {
            return Ok((Quality::new(kind, extension), rest));
        }
    }

    for prefix in MAJOR_PREFIXES {
        if let Some(rest) = s.strip_prefix(prefix) {
            let (extension, rest) = parse_extension(symbol, rest)?;
            // a bare triangle is a major seventh
            let extension = if *prefix == "Δ" { extension.or(Some(7)) } else { extension };
            return Ok((Quality::new(QualityKind::Major, extension), rest));
        }
    }

    for prefix in MINOR_PREFIXES {
        if let Some(rest) = s.strip_prefix(prefix) {
            let (extension, rest) = parse_extension(symbol, rest)?;
            return Ok((Quality::new(QualityKind::Minor, extension), rest));
        }
    }

    if let Some(rest) = strip_sus(s) {
        return Ok((Quality::new(QualityKind::Suspended, None), rest));
    }

    let (extension, rest) = parse_extension(symbol, s)?;
    match extension {
        Some(ext) => match strip_sus(rest) {
            Some(rest) => Ok((Quality::new(QualityKind::Suspended, Some(ext)), rest)),
            None => Ok((Quality::new(QualityKind::Dominant, Some(ext)), rest)),
        },
        None => Ok((Quality::new(QualityKind::Major, None), s)),
    }
}

fn parse_alterations(symbol: &str, s: &str) -> Result<Vec<(u8, Alteration)>, ChordParseError> {
    let invalid = |fragment: &str| ChordParseError::InvalidAlteration {
        symbol: symbol.to_string(),
        alteration: fragment.to_string(),
    };

    let mut alterations = Vec::new();
    let mut rest = s;
    while !rest.is_empty() {
        if let Some(r) = rest
            .strip_prefix('(')
            .or_else(|| rest.strip_prefix(')'))
            .or_else(|| rest.strip_prefix(','))
        {
            rest = r;
            continue;
        }

        let (alteration, after) = if let Some(r) = rest.strip_prefix("nat").or_else(|| rest.strip_prefix('♮')) {
            (Alteration::Natural, r)
        } else if let Some(r) = rest.strip_prefix('b').or_else(|| rest.strip_prefix('♭')) {
            (Alteration::Flat, r)
        } else if let Some(r) = rest.strip_prefix('#').or_else(|| rest.strip_prefix('♯')) {
            (Alteration::Sharp, r)
        } else {
            return Err(invalid(rest));
        };

        match leading_number(after) {
            (Some(degree @ 2..=13), r) => {
                alterations.push((degree, alteration));
                rest = r;
            }
            _ => return Err(invalid(rest)),
        }
    }
    Ok(alterations)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pc(s: &str) -> PitchClass {
        PitchClass::parse(s).unwrap()
    }

    #[test]
    fn test_parse_roots() {
        assert_eq!(Chord::parse("F7").unwrap().root(), pc("F"));
        assert_eq!(Chord::parse("Bb7").unwrap().root(), pc("Bb"));
        assert_eq!(Chord::parse("F#m7").unwrap().root(), pc("F#"));
        assert_eq!(Chord::parse("E♭maj7").unwrap().root(), pc("Eb"));
    }

    #[test]
    fn test_parse_qualities() {
        let cases = [
            ("C", QualityKind::Major, None),
            ("Cmaj", QualityKind::Major, None),
            ("Cmaj7", QualityKind::Major, Some(7)),
            ("CM7", QualityKind::Major, Some(7)),
            ("CΔ", QualityKind::Major, Some(7)),
            ("Cmaj9", QualityKind::Major, Some(9)),
            ("Cm", QualityKind::Minor, None),
            ("Cmin7", QualityKind::Minor, Some(7)),
            ("C-7", QualityKind::Minor, Some(7)),
            ("Cm11", QualityKind::Minor, Some(11)),
            ("C7", QualityKind::Dominant, Some(7)),
            ("C13", QualityKind::Dominant, Some(13)),
            ("Cm7b5", QualityKind::HalfDiminished, Some(7)),
            ("Cø", QualityKind::HalfDiminished, Some(7)),
            ("Cdim", QualityKind::Diminished, None),
            ("Cdim7", QualityKind::Diminished, Some(7)),
            ("C°7", QualityKind::Diminished, Some(7)),
            ("Csus4", QualityKind::Suspended, None),
            ("Csus2", QualityKind::Suspended, None),
            ("C7sus4", QualityKind::Suspended, Some(7)),
        ];

        for (symbol, kind, extension) in cases {
            let chord = Chord::parse(symbol).unwrap();
            assert_eq!(chord.quality().kind(), kind, "{symbol}");
            assert_eq!(chord.quality().extension(), extension, "{symbol}");
        }
    }

    #[test]
    fn test_parse_alterations() {
        let chord = Chord::parse("G7b9").unwrap();
        assert_eq!(chord.quality().alteration(9), Some(Alteration::Flat));

        let chord = Chord::parse("G7(b9,#11)").unwrap();
        assert_eq!(chord.quality().alteration(9), Some(Alteration::Flat));
        assert_eq!(chord.quality().alteration(11), Some(Alteration::Sharp));

        // Last one wins
        let chord = Chord::parse("G7b9#9").unwrap();
        assert_eq!(chord.quality().alteration(9), Some(Alteration::Sharp));
    }

    #[test]
    fn test_altered_fifth_sets_override() {
        let chord = Chord::parse("C7#5").unwrap();
        assert_eq!(chord.fifth(), pc("G#"));

        let chord = Chord::parse("C7b5").unwrap();
        assert_eq!(chord.fifth(), pc("Gb"));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(Chord::parse(""), Err(ChordParseError::Empty));
        assert!(matches!(Chord::parse("H7"), Err(ChordParseError::InvalidRoot(_))));
        assert!(matches!(Chord::parse("xyz"), Err(ChordParseError::InvalidRoot(_))));
        assert!(matches!(Chord::parse("C6"), Err(ChordParseError::UnknownQuality { .. })));
        assert!(matches!(Chord::parse("C7q"), Err(ChordParseError::InvalidAlteration { .. })));
        assert!(matches!(Chord::parse("C7b"), Err(ChordParseError::InvalidAlteration { .. })));
        assert!(matches!(Chord::parse("C7b14"), Err(ChordParseError::InvalidAlteration { .. })));
    }

    #[test]
    fn test_chord_tones() {
        let f7 = Chord::parse("F7").unwrap();
        assert_eq!(f7.third(), Some(pc("A")));
        assert_eq!(f7.fifth(), pc("C"));
        assert_eq!(f7.seventh(), Some(pc("Eb")));

        let cmaj7 = Chord::parse("Cmaj7").unwrap();
        assert_eq!(cmaj7.seventh(), Some(pc("B")));

        let bdim7 = Chord::parse("Bdim7").unwrap();
        assert_eq!(bdim7.third(), Some(pc("D")));
        assert_eq!(bdim7.fifth(), pc("F"));
        assert_eq!(bdim7.seventh(), Some(pc("Ab")));

        let triad = Chord::parse("C").unwrap();
        assert_eq!(triad.seventh(), None);

        let sus = Chord::parse("Gsus4").unwrap();
        assert_eq!(sus.third(), None);
    }

    #[test]
    fn test_chord_tones_spelled_by_degree() {
        let d7 = Chord::parse("D7").unwrap();
        assert_eq!(d7.third(), Some(pc("F#")));
        assert_eq!(d7.fifth(), pc("A"));
        assert_eq!(d7.seventh(), Some(pc("C")));

        let gmaj7 = Chord::parse("Gmaj7").unwrap();
        assert_eq!(gmaj7.seventh(), Some(pc("F#")));

        let db7 = Chord::parse("Db7").unwrap();
        assert_eq!(db7.third(), Some(pc("F")));
        assert_eq!(db7.seventh(), Some(pc("Cb")));

        let b7b5 = Chord::parse("B7b5").unwrap();
        assert_eq!(b7b5.third(), Some(pc("D#")));
        assert_eq!(b7b5.fifth(), pc("F"));
    }

    #[test]
    fn test_overrides_replace_defaults() {
        let chord = Chord::parse("C7").unwrap().with_seventh(pc("B"));
        assert_eq!(chord.seventh(), Some(pc("B")));

        let chord = Chord::parse("C").unwrap().with_third(pc("Eb"));
        assert_eq!(chord.third(), Some(pc("Eb")));
    }

    #[test]
    fn test_shape_table() {
        let shape = Quality::new(QualityKind::HalfDiminished, Some(7)).shape();
        assert_eq!(shape, ChordShape { third: Some(3), fifth: 6, seventh: Some(10) });

        let shape = Quality::new(QualityKind::Suspended, None).shape();
        assert_eq!(shape, ChordShape { third: None, fifth: 7, seventh: None });
    }

    #[test]
    fn test_quality_predicates() {
        assert!(Chord::parse("F7").unwrap().quality().is_dominant());
        assert!(Chord::parse("Fmaj7").unwrap().quality().is_major_seventh());
        assert!(!Chord::parse("F").unwrap().quality().is_major_seventh());
        assert!(Chord::parse("Fm7").unwrap().quality().is_minor_seventh());
        assert!(!Chord::parse("Fm7b5").unwrap().quality().is_minor_seventh());
    }

    #[test]
    fn test_display() {
        for symbol in ["F7", "Bbmaj7", "Cm7", "C#m7b5", "Bdim7", "G7b9", "C", "G7sus"] {
            assert_eq!(Chord::parse(symbol).unwrap().to_string(), symbol);
        }
    }

    #[test]
    fn test_from_str() {
        let chord: Chord = "Ab13".parse().unwrap();
        assert_eq!(chord.root(), pc("Ab"));
    }
}
