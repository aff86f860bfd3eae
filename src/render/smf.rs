// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Standard MIDI File writer.
//!
//! Writes one score as a Type 0 file: tempo, time signature, track name
//! and program change at tick 0, then the note events.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use super::Score;

/// Default ticks per quarter note
pub const DEFAULT_PPQN: u16 = 480;

/// Note-on velocity for every note
pub const DEFAULT_VELOCITY: u8 = 100;

const CHANNEL: u8 = 0;

/// One timed event with its raw bytes
#[derive(Debug, Clone)]
struct SmfEvent {
    tick: u64,
    /// Note-offs sort before note-ons at the same tick
    rank: u8,
    data: Vec<u8>,
}

impl SmfEvent {
    fn meta(tick: u64, kind: u8, payload: &[u8]) -> Self {
        let mut data = vec![0xFF, kind];
        write_variable_length(&mut data, payload.len() as u32);
        data.extend_from_slice(payload);
        Self { tick, rank: 0, data }
    }

    fn tempo(tick: u64, bpm: f64) -> Self {
        let us_per_beat = (60_000_000.0 / bpm) as u32;
        Self::meta(tick, 0x51, &us_per_beat.to_be_bytes()[1..])
    }

    fn time_signature(tick: u64, numerator: u8, denominator: u8) -> Self {
        let denom_power = (denominator as f32).log2() as u8;
        Self::meta(tick, 0x58, &[numerator, denom_power, 24, 8])
    }

    fn track_name(tick: u64, name: &str) -> Self {
        Self::meta(tick, 0x03, name.as_bytes())
    }

    fn program_change(tick: u64, channel: u8, program: u8) -> Self {
        Self {
            tick,
            rank: 1,
            data: vec![0xC0 | (channel & 0x0F), program & 0x7F],
        }
    }

    fn note_off(tick: u64, channel: u8, note: u8) -> Self {
        Self {
            tick,
            rank: 2,
            data: vec![0x80 | (channel & 0x0F), note & 0x7F, 0],
        }
    }

    fn note_on(tick: u64, channel: u8, note: u8, velocity: u8) -> Self {
        Self {
            tick,
            rank: 3,
            data: vec![0x90 | (channel & 0x0F), note & 0x7F, velocity & 0x7F],
        }
    }
}

/// Writes scores as Type 0 MIDI files
#[derive(Debug, Clone)]
pub struct SmfWriter {
    ppqn: u16,
    velocity: u8,
}

impl Default for SmfWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl SmfWriter {
    pub fn new() -> Self {
        Self {
            ppqn: DEFAULT_PPQN,
            velocity: DEFAULT_VELOCITY,
        }
    }

    pub fn with_ppqn(mut self, ppqn: u16) -> Self {
        self.ppqn = ppqn.max(1);
        self
    }

    pub fn ppqn(&self) -> u16 {
        self.ppqn
    }

    /// Convert a position in quarters to ticks
    pub fn quarters_to_ticks(&self, quarters: f64) -> u64 {
        (quarters.max(0.0) * self.ppqn as f64).round() as u64
    }

    fn events(&self, score: &Score) -> Vec<SmfEvent> {
        let instrument = score.instrument();
        let mut events = vec![
            SmfEvent::tempo(0, score.tempo()),
            SmfEvent::time_signature(0, score.quarters_per_bar().clamp(1, 255) as u8, 4),
            SmfEvent::track_name(0, instrument.name()),
            SmfEvent::program_change(0, CHANNEL, instrument.program()),
        ];

        for event in score.events() {
            let start = self.quarters_to_ticks(event.start);
            let end = self.quarters_to_ticks(event.end());
            for &pitch in &event.pitches {
                events.push(SmfEvent::note_on(start, CHANNEL, pitch, self.velocity));
                events.push(SmfEvent::note_off(end, CHANNEL, pitch));
            }
        }

        events.sort_by_key(|e| (e.tick, e.rank));
        events
    }

    /// Complete file contents for `score`
    pub fn to_bytes(&self, score: &Score) -> Vec<u8> {
        let events = self.events(score);

        let mut track = Vec::new();
        let mut last_tick = 0u64;
        for event in &events {
            write_variable_length(&mut track, (event.tick - last_tick) as u32);
            track.extend_from_slice(&event.data);
            last_tick = event.tick;
        }
        // end of track
        track.extend_from_slice(&[0x00, 0xFF, 0x2F, 0x00]);

        let mut bytes = Vec::with_capacity(22 + track.len());
        bytes.extend_from_slice(b"MThd");
        bytes.extend_from_slice(&6u32.to_be_bytes());
        bytes.extend_from_slice(&0u16.to_be_bytes());
        bytes.extend_from_slice(&1u16.to_be_bytes());
        bytes.extend_from_slice(&self.ppqn.to_be_bytes());
        bytes.extend_from_slice(b"MTrk");
        bytes.extend_from_slice(&(track.len() as u32).to_be_bytes());
        bytes.extend_from_slice(&track);
        bytes
    }

    /// Write `score` to any writer
    pub fn write<W: Write>(&self, score: &Score, writer: &mut W) -> io::Result<()> {
        writer.write_all(&self.to_bytes(score))
    }

    /// Write `score` to a file
    pub fn export(&self, score: &Score, path: &Path) -> io::Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write(score, &mut writer)?;
        writer.flush()
    }
}

/// Append a variable-length quantity
fn write_variable_length(out: &mut Vec<u8>, mut value: u32) {
    let mut bytes = vec![(value & 0x7F) as u8];
    value >>= 7;
    while value > 0 {
        bytes.push((value & 0x7F) as u8 | 0x80);
        value >>= 7;
    }
    bytes.reverse();
    out.extend_from_slice(&bytes);
}
