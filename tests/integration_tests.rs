// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Integration tests for jazzgen
//!
//! These tests drive the public API from progression text to a mixed WAV
//! file. Rendering goes through a stub renderer so no notation tool is
//! needed.

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::SeedableRng;
use tempfile::TempDir;

use jazzgen::audio::{AudioBuffer, DrumKit};
use jazzgen::generators::bass::{LOWER_BOUND, UPPER_BOUND};
use jazzgen::generators::{
    BassLineGenerator, CompingGenerator, DrumGenerator, DrumSound, GeneratorContext,
};
use jazzgen::music::NoteEvent;
use jazzgen::render::{Instrument, RenderError, Renderer, Score};
use jazzgen::{ComposeError, Composer, EngineConfig, Progression, ProgressionItem};

const RATE: u32 = 8000;

const BLUES: &str = "# F blues\n\
    *head\n\
    F7\nBb7 Bdim7\nF7\nCm7 F7\nBb7\nBdim7\nF7 D7\nAbm7 Db7\nGm7\nC7\nF7 D7\nGm7 C7\n\
    *solo\n\
    **head\n\
    **head\n";

/// Writes a short tone for every score it is asked to render
#[derive(Default)]
struct StubRenderer {
    rendered: RefCell<Vec<Instrument>>,
}

impl Renderer for StubRenderer {
    fn render(&self, score: &Score, output: &Path) -> Result<(), RenderError> {
        self.rendered.borrow_mut().push(score.instrument());
        write_tone(output, 100, 0.1);
        Ok(())
    }
}

/// Always fails like a crashed notation tool
struct BrokenRenderer;

impl Renderer for BrokenRenderer {
    fn render(&self, _score: &Score, output: &Path) -> Result<(), RenderError> {
        Err(RenderError::MissingOutput(output.to_path_buf()))
    }
}

fn write_tone(path: &Path, ms: u64, value: f32) {
    let frames = (ms * RATE as u64 / 1000) as usize;
    AudioBuffer::from_samples(RATE, 1, vec![value; frames])
        .unwrap()
        .export_wav(path)
        .unwrap();
}

/// Temp directory with a full drum kit and a config pointing at it
fn fixture() -> (TempDir, EngineConfig) {
    let dir = TempDir::new().unwrap();
    let sounds = dir.path().join("sounds");
    fs::create_dir(&sounds).unwrap();
    for path in DrumKit::new(&sounds).all_paths() {
        write_tone(&path, 50, 0.05);
    }

    let mut config = EngineConfig::default();
    config.sample_rate = RATE;
    config.channels = 1;
    config.drums.sounds_dir = sounds;
    (dir, config)
}

fn expanded(text: &str) -> Vec<ProgressionItem> {
    Progression::parse(text).expand().unwrap()
}

/// Test the whole pipeline from text to a mixed file
#[test]
fn test_full_composition_pipeline() {
    let (dir, config) = fixture();
    let output = dir.path().join("blues.wav");
    let composer = Composer::new(config, StubRenderer::default());

    let summary = composer
        .compose("F7\nBb7", &output, &mut StdRng::seed_from_u64(7))
        .unwrap();

    assert_eq!(summary.raw_items, 2);
    assert_eq!(summary.expanded_items, 2);
    assert_eq!(summary.bars, 2);
    assert_eq!(summary.voicings, 4);
    // kick, four rides and two hi-hats in every bar
    assert!(summary.drum_hits >= 2 * 7);
    // the last ride on beat four of bar two starts at 3500 ms
    assert!(summary.duration_ms >= 3500);

    let mix = AudioBuffer::load(&output).unwrap();
    assert_eq!(mix.sample_rate(), RATE);
    assert_eq!(mix.channels(), 1);
    assert_eq!(mix.duration_ms(), summary.duration_ms);
    assert!(mix.peak() > 0.0);

    assert_eq!(
        *composer.renderer().rendered.borrow(),
        vec![Instrument::AcousticBass, Instrument::Piano]
    );
}

/// Test a longer form with sections through the pipeline
#[test]
fn test_compose_blues_with_sections() {
    let (dir, config) = fixture();
    let output = dir.path().join("blues.wav");
    let composer = Composer::new(config, StubRenderer::default());

    let summary = composer
        .compose(BLUES, &output, &mut StdRng::seed_from_u64(12))
        .unwrap();

    // the head once in place and twice by reference
    assert_eq!(summary.bars, 36);
    assert!(output.is_file());
    assert!(summary.duration_ms >= 35 * 2000);
}

/// Test that a failed render leaves nothing behind
#[test]
fn test_render_failure_leaves_no_output() {
    let (dir, config) = fixture();
    let output = dir.path().join("out.wav");
    let composer = Composer::new(config, BrokenRenderer);

    let result = composer.compose("F7\nBb7", &output, &mut StdRng::seed_from_u64(1));
    assert!(matches!(result, Err(ComposeError::Render(_))));
    assert!(!output.exists());
}

/// Test that a missing drum sample aborts the request
#[test]
fn test_missing_sample_is_fatal() {
    let (dir, mut config) = fixture();
    config.drums.sounds_dir = dir.path().join("empty");
    fs::create_dir(&config.drums.sounds_dir).unwrap();
    let output = dir.path().join("out.wav");

    let composer = Composer::new(config, StubRenderer::default());
    let result = composer.compose("F7", &output, &mut StdRng::seed_from_u64(1));
    assert!(matches!(result, Err(ComposeError::MissingSample(_))));
    assert!(!output.exists());
}

/// Test section recursion surfaces as an error
#[test]
fn test_section_cycle_is_fatal() {
    let (dir, config) = fixture();
    let composer = Composer::new(config, StubRenderer::default());
    let result = composer.compose(
        "*a\n**b\n*b\n**a",
        &dir.path().join("out.wav"),
        &mut StdRng::seed_from_u64(1),
    );
    assert!(matches!(result, Err(ComposeError::Progression(_))));
}

/// Test loading a config file and composing with it
#[test]
fn test_compose_with_config_file() {
    let (dir, config) = fixture();
    let path = dir.path().join("engine.yaml");
    let mut config = config;
    config.tempo = 240.0;
    config.comping.enabled = false;
    config.save(&path).unwrap();

    let loaded = EngineConfig::load(&path).unwrap();
    assert_eq!(loaded, config);

    let output = dir.path().join("fast.wav");
    let composer = Composer::new(loaded, StubRenderer::default());
    let summary = composer
        .compose("F7\nBb7", &output, &mut StdRng::seed_from_u64(3))
        .unwrap();

    // half the time per bar at 240 BPM
    assert!(summary.duration_ms < 2100);
    assert_eq!(*composer.renderer().rendered.borrow(), vec![Instrument::AcousticBass]);
}

#[test]
fn test_two_chord_progression() {
    let progression = Progression::parse("F7\nBb7");
    let items = progression.items();
    assert_eq!(items.len(), 2);
    assert!(items.iter().all(|i| i.is_chord() && i.duration() == 4));
    assert!(!items.iter().any(ProgressionItem::is_event));

    let line = BassLineGenerator::new()
        .generate_line(&expanded("F7\nBb7"), &mut StdRng::seed_from_u64(0))
        .unwrap();
    assert_eq!(line[0].to_string(), "F2");
}

#[test]
fn test_bar_durations() {
    for (bar, total) in [("C7 F7 G7", 4), ("C7 F7", 4), ("C7 F7 G7 D7 A7", 4)] {
        let progression = Progression::parse(bar);
        let durations: Vec<u32> = progression.items().iter().map(|i| i.duration()).collect();
        assert_eq!(durations.iter().sum::<u32>(), total, "{bar}");
        assert!(durations.windows(2).all(|w| w[0] >= w[1]), "{bar}");
    }

    let durations: Vec<u32> = Progression::parse_with_bar_length("C7 F7", 3)
        .items()
        .iter()
        .map(|i| i.duration())
        .collect();
    assert_eq!(durations, vec![2, 1]);
}

#[test]
fn test_section_reference_repeats_content() {
    let items = expanded("*a\nF7\n**a");
    let chords: Vec<String> = items
        .iter()
        .filter_map(|i| i.as_chord().map(|c| c.to_string()))
        .collect();
    assert_eq!(chords, vec!["F7", "F7"]);
}

#[test]
fn test_expansion_is_repeatable() {
    let progression = Progression::parse(BLUES);
    let first = progression.expand().unwrap();
    let second = progression.expand().unwrap();
    assert_eq!(first, second);
    assert_eq!(progression.items().len(), Progression::parse(BLUES).items().len());
}

#[test]
fn test_bass_stays_in_range_without_repeats() {
    let items = expanded(BLUES);
    let generator = BassLineGenerator::new();

    for seed in 0..20 {
        let line = generator
            .generate_line(&items, &mut StdRng::seed_from_u64(seed))
            .unwrap();
        assert!(!line.is_empty());
        for note in &line {
            let midi = note.to_midi();
            assert!((LOWER_BOUND..=UPPER_BOUND).contains(&midi), "seed {seed}: {note} ({midi})");
        }
        for pair in line.windows(2) {
            assert!(!pair[0].same_pitch(&pair[1]), "seed {seed}: repeated {}", pair[0]);
        }
    }
}

#[test]
fn test_midi_round_trip() {
    for midi in 0..=127 {
        assert_eq!(NoteEvent::from_midi(midi).to_midi(), midi);
    }
}

#[test]
fn test_three_quarter_comping() {
    let items = expanded("C7 F7 G7");
    let voicings = CompingGenerator::new().generate_voicings(&items);

    // C7 lasts two quarters, F7 and G7 one each
    assert_eq!(voicings.len(), 4);

    let items = vec![ProgressionItem::chord("F7".parse().unwrap(), 3)];
    let voicings = CompingGenerator::new().generate_voicings(&items);
    assert_eq!(voicings.len(), 2);
    assert_eq!(voicings[0].duration, 2.0);
    assert_eq!(voicings[1].duration, 1.0);
    assert_eq!(voicings[0].midi_notes(), voicings[1].midi_notes());
}

#[test]
fn test_drum_patterns_are_seeded() {
    let context = GeneratorContext::default();
    let drummer = DrumGenerator::new();

    let first = drummer.pattern(8, &context, &mut StdRng::seed_from_u64(99));
    let second = drummer.pattern(8, &context, &mut StdRng::seed_from_u64(99));
    assert_eq!(first, second);

    for bar in 0..8 {
        assert!(first
            .iter()
            .any(|h| h.measure == bar && h.sound == DrumSound::Kick && h.quarter == 0.0));
    }
}

#[test]
fn test_scores_for_rendering() {
    let items = expanded("F7\nBb7");
    let context = GeneratorContext::default();
    let line = BassLineGenerator::new()
        .generate_line(&items, &mut StdRng::seed_from_u64(4))
        .unwrap();
    let bass = Score::from_bass_line(&line, &context);
    assert_eq!(bass.total_quarters(), line.len() as f64);

    let voicings = CompingGenerator::new().generate_voicings(&items);
    let comping = Score::from_voicings(&voicings, &context);
    assert_eq!(comping.total_quarters(), 8.0);
    assert!(!comping.is_silent());

    let paths: Vec<PathBuf> = DrumKit::new("sounds").all_paths();
    assert!(paths.contains(&PathBuf::from("sounds/211.wav")));
}
