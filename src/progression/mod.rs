// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Chord progressions and their section structure.
//!
//! A [`Progression`] holds the raw items parsed from the line-oriented
//! text format, in source order. Section definitions (`*name`) and
//! references (`**name`) stay in the raw list as event items; calling
//! [`Progression::expand`] resolves references into a fresh flat sequence.

pub mod parser;

use std::fmt;

use thiserror::Error;
use tracing::warn;

use crate::music::Chord;

pub use parser::{parse, split_bar};

/// Bar length in quarters when none is configured
pub const DEFAULT_BAR_LENGTH: u32 = 4;

/// Maximum nesting of section references during expansion
pub const MAX_SECTION_DEPTH: usize = 16;

/// Prefix of a section definition event
pub const SECTION_DEFINITION: &str = "*";

/// Prefix of a section reference event
pub const SECTION_REFERENCE: &str = "**";

/// Structural progression errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProgressionError {
    #[error("progression item cannot be both a chord and an event")]
    BothChordAndEvent,

    #[error("progression item must be either a chord or an event")]
    NeitherChordNorEvent,

    #[error("section '{name}' nests deeper than {depth} references")]
    SectionRecursion { name: String, depth: usize },
}

/// One entry of a progression
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressionItem {
    /// A chord sounding for `duration` quarters
    Chord { chord: Chord, duration: u32 },
    /// A slot whose symbol could not be parsed
    Rest { duration: u32 },
    /// Annotation or section marker
    Event(String),
}

impl ProgressionItem {
    pub fn chord(chord: Chord, duration: u32) -> Self {
        ProgressionItem::Chord { chord, duration }
    }

    pub fn rest(duration: u32) -> Self {
        ProgressionItem::Rest { duration }
    }

    pub fn event(text: impl Into<String>) -> Self {
        ProgressionItem::Event(text.into())
    }

    /// Build an item from optional chord and event parts.
    ///
    /// Exactly one of the two must be present.
    pub fn from_parts(
        chord: Option<Chord>,
        duration: u32,
        event: Option<String>,
    ) -> Result<Self, ProgressionError> {
        match (chord, event) {
            (Some(_), Some(_)) => Err(ProgressionError::BothChordAndEvent),
            (None, None) => Err(ProgressionError::NeitherChordNorEvent),
            (Some(chord), None) => Ok(Self::chord(chord, duration)),
            (None, Some(text)) => Ok(Self::event(text)),
        }
    }

    /// Duration in quarters; events take no time
    pub fn duration(&self) -> u32 {
        match self {
            ProgressionItem::Chord { duration, .. } | ProgressionItem::Rest { duration } => *duration,
            ProgressionItem::Event(_) => 0,
        }
    }

    pub fn as_chord(&self) -> Option<&Chord> {
        match self {
            ProgressionItem::Chord { chord, .. } => Some(chord),
            _ => None,
        }
    }

    pub fn is_chord(&self) -> bool {
        matches!(self, ProgressionItem::Chord { .. })
    }

    pub fn is_event(&self) -> bool {
        matches!(self, ProgressionItem::Event(_))
    }

    /// Chord item that actually sounds (nonzero duration)
    pub fn is_playable(&self) -> bool {
        matches!(self, ProgressionItem::Chord { duration, .. } if *duration > 0)
    }

    pub fn event_text(&self) -> Option<&str> {
        match self {
            ProgressionItem::Event(text) => Some(text),
            _ => None,
        }
    }

    pub fn is_section_reference(&self) -> bool {
        self.event_text()
            .is_some_and(|t| t.starts_with(SECTION_REFERENCE))
    }

    pub fn is_section_definition(&self) -> bool {
        self.event_text()
            .is_some_and(|t| t.starts_with(SECTION_DEFINITION) && !t.starts_with(SECTION_REFERENCE))
    }

    /// Plain annotation (not a section marker)
    pub fn is_annotation(&self) -> bool {
        self.event_text()
            .is_some_and(|t| !t.starts_with(SECTION_DEFINITION))
    }

    /// Name of the section this item defines
    pub fn defined_section(&self) -> Option<&str> {
        if !self.is_section_definition() {
            return None;
        }
        self.event_text()
            .map(|t| t[SECTION_DEFINITION.len()..].trim())
    }

    /// Name of the section this item references
    pub fn referenced_section(&self) -> Option<&str> {
        if !self.is_section_reference() {
            return None;
        }
        self.event_text()
            .map(|t| t[SECTION_REFERENCE.len()..].trim())
    }
}

impl fmt::Display for ProgressionItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgressionItem::Chord { chord, duration } => write!(f, "{} ({})", chord, duration),
            ProgressionItem::Rest { duration } => write!(f, "rest ({})", duration),
            ProgressionItem::Event(text) => write!(f, "[{}]", text),
        }
    }
}

/// A symbol that could not be parsed as a chord
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseWarning {
    /// 1-based source line
    pub line: usize,
    pub symbol: String,
    pub message: String,
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: '{}': {}", self.line, self.symbol, self.message)
    }
}

/// Raw progression items plus the warnings collected while parsing
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Progression {
    items: Vec<ProgressionItem>,
    warnings: Vec<ParseWarning>,
}

impl Progression {
    pub fn new(items: Vec<ProgressionItem>) -> Self {
        Self {
            items,
            warnings: Vec::new(),
        }
    }

    pub(crate) fn with_warnings(items: Vec<ProgressionItem>, warnings: Vec<ParseWarning>) -> Self {
        Self { items, warnings }
    }

    /// Parse text with the default bar length
    pub fn parse(text: &str) -> Self {
        parser::parse(text, DEFAULT_BAR_LENGTH)
    }

    /// Parse text with a bar length in quarters (0 is treated as 1)
    pub fn parse_with_bar_length(text: &str, bar_length: u32) -> Self {
        parser::parse(text, bar_length)
    }

    /// Raw items, section markers included
    pub fn items(&self) -> &[ProgressionItem] {
        &self.items
    }

    pub fn push(&mut self, item: ProgressionItem) {
        self.items.push(item);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn warnings(&self) -> &[ParseWarning] {
        &self.warnings
    }

    /// Raw content of a section: the items after its first definition,
    /// up to the next definition of any section or the end
    pub fn section_content(&self, name: &str) -> Vec<ProgressionItem> {
        let start = match self
            .items
            .iter()
            .position(|item| item.defined_section() == Some(name))
        {
            Some(index) => index + 1,
            None => return Vec::new(),
        };

        self.items[start..]
            .iter()
            .take_while(|item| !item.is_section_definition())
            .cloned()
            .collect()
    }

    /// Flatten the progression, replacing each reference with its section
    /// content. Definition markers remain in place; the raw items are
    /// never modified.
    ///
    /// A reference to the section currently being expanded is kept as an
    /// inert marker. Longer reference cycles stop at [`MAX_SECTION_DEPTH`].
    pub fn expand(&self) -> Result<Vec<ProgressionItem>, ProgressionError> {
        let mut expanded = Vec::with_capacity(self.items.len());
        self.expand_into(&self.items, None, 0, &mut expanded)?;
        Ok(expanded)
    }

    fn expand_into(
        &self,
        items: &[ProgressionItem],
        current: Option<&str>,
        depth: usize,
        out: &mut Vec<ProgressionItem>,
    ) -> Result<(), ProgressionError> {
        for item in items {
            let name = match item.referenced_section() {
                Some(name) if Some(name) != current => name,
                _ => {
                    out.push(item.clone());
                    continue;
                }
            };

            if depth >= MAX_SECTION_DEPTH {
                return Err(ProgressionError::SectionRecursion {
                    name: name.to_string(),
                    depth: MAX_SECTION_DEPTH,
                });
            }

            let content = self.section_content(name);
            if content.is_empty() {
                warn!(section = name, "section is undefined or empty");
                continue;
            }
            self.expand_into(&content, Some(name), depth + 1, out)?;
        }
        Ok(())
    }
}

/// Total quarters of the chord items in `items`
pub fn chord_quarters(items: &[ProgressionItem]) -> u32 {
    items
        .iter()
        .filter(|item| item.is_chord())
        .map(ProgressionItem::duration)
        .sum()
}
