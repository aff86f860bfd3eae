// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Rendering boundary.
//!
//! Generated parts become a symbolic [`Score`], which is written as a
//! Standard MIDI File and handed to an external notation tool that
//! produces audio.

pub mod external;
pub mod smf;

pub use external::ExternalRenderer;
pub use smf::SmfWriter;

use std::path::{Path, PathBuf};
use std::process::ExitStatus;

use thiserror::Error;

use crate::generators::{GeneratorContext, Voicing};
use crate::music::NoteEvent;

/// Rendering error types
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("renderer '{program}' not found")]
    NotFound { program: String },

    #[error("renderer '{program}' failed with {status}: {stderr}")]
    Failed {
        program: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("renderer produced no output at {0}")]
    MissingOutput(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// General MIDI instrument for a part
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instrument {
    AcousticBass,
    Piano,
}

impl Instrument {
    /// GM program number (0-based)
    pub fn program(self) -> u8 {
        match self {
            Instrument::AcousticBass => 32,
            Instrument::Piano => 0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Instrument::AcousticBass => "Acoustic Bass",
            Instrument::Piano => "Acoustic Grand Piano",
        }
    }
}

/// Notes sounding together, timed in quarters
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreEvent {
    pub start: f64,
    pub duration: f64,
    /// MIDI pitches; empty for a rest
    pub pitches: Vec<u8>,
}

impl ScoreEvent {
    pub fn is_rest(&self) -> bool {
        self.pitches.is_empty()
    }

    pub fn end(&self) -> f64 {
        self.start + self.duration
    }
}

/// One part laid out sequentially in time
#[derive(Debug, Clone, PartialEq)]
pub struct Score {
    instrument: Instrument,
    tempo: f64,
    quarters_per_bar: u32,
    events: Vec<ScoreEvent>,
    cursor: f64,
}

impl Score {
    pub fn new(instrument: Instrument, tempo: f64, quarters_per_bar: u32) -> Self {
        Self {
            instrument,
            tempo,
            quarters_per_bar,
            events: Vec::new(),
            cursor: 0.0,
        }
    }

    /// Append notes at the cursor and advance it
    pub fn push_notes(&mut self, notes: &[NoteEvent], duration: f64) {
        let pitches = notes
            .iter()
            .map(|n| n.to_midi().clamp(0, 127) as u8)
            .collect();
        self.events.push(ScoreEvent {
            start: self.cursor,
            duration,
            pitches,
        });
        self.cursor += duration;
    }

    pub fn push_rest(&mut self, duration: f64) {
        self.push_notes(&[], duration);
    }

    /// Bass line as consecutive single notes
    pub fn from_bass_line(line: &[NoteEvent], context: &GeneratorContext) -> Self {
        let mut score = Self::new(Instrument::AcousticBass, context.tempo, context.quarters_per_bar);
        for note in line {
            score.push_notes(std::slice::from_ref(note), note.length);
        }
        score
    }

    /// Comping as consecutive chords
    pub fn from_voicings(voicings: &[Voicing], context: &GeneratorContext) -> Self {
        let mut score = Self::new(Instrument::Piano, context.tempo, context.quarters_per_bar);
        for voicing in voicings {
            score.push_notes(&voicing.notes, voicing.duration);
        }
        score
    }

    pub fn instrument(&self) -> Instrument {
        self.instrument
    }

    pub fn tempo(&self) -> f64 {
        self.tempo
    }

    pub fn quarters_per_bar(&self) -> u32 {
        self.quarters_per_bar
    }

    pub fn events(&self) -> &[ScoreEvent] {
        &self.events
    }

    /// True when no event carries a pitch
    pub fn is_silent(&self) -> bool {
        self.events.iter().all(ScoreEvent::is_rest)
    }

    pub fn total_quarters(&self) -> f64 {
        self.cursor
    }
}

/// Turns a score into an audio file
pub trait Renderer {
    fn render(&self, score: &Score, output: &Path) -> Result<(), RenderError>;
}
