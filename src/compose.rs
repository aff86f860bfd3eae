// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! End-to-end composition.
//!
//! A request parses the progression, generates the three parts, renders
//! the pitched parts through the external renderer into a private working
//! directory, and mixes everything onto one timeline. The working
//! directory is removed when the request ends, whether it succeeded or not.

use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tempfile::{NamedTempFile, TempDir};
use tracing::{debug, info, warn};

use crate::audio::{AudioCombiner, DrumKit};
use crate::config::EngineConfig;
use crate::error::{ComposeError, Result};
use crate::generators::{
    BassLineGenerator, CompingGenerator, DrumGenerator, DrumHit, Generator, Voicing,
};
use crate::music::NoteEvent;
use crate::progression::{Progression, ProgressionItem};
use crate::render::{ExternalRenderer, Renderer, Score};

/// Generated parts for one progression
#[derive(Debug, Clone)]
pub struct Arrangement {
    pub progression: Progression,
    pub items: Vec<ProgressionItem>,
    pub bass: Vec<NoteEvent>,
    pub voicings: Vec<Voicing>,
    pub drums: Vec<DrumHit>,
    pub bars: u32,
}

/// What a finished composition contains
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositionSummary {
    pub raw_items: usize,
    pub expanded_items: usize,
    pub bass_notes: usize,
    pub voicings: usize,
    pub drum_hits: usize,
    pub bars: u32,
    pub duration_ms: u64,
}

/// Runs composition requests with one configuration and renderer
#[derive(Debug, Clone)]
pub struct Composer<R> {
    config: EngineConfig,
    renderer: R,
}

impl Composer<ExternalRenderer> {
    /// Composer using the renderer command from `config`
    pub fn from_config(config: EngineConfig) -> Self {
        let renderer = config.renderer();
        Self { config, renderer }
    }
}

impl<R: Renderer> Composer<R> {
    pub fn new(config: EngineConfig, renderer: R) -> Self {
        Self { config, renderer }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Parse `text` and generate every part, without rendering.
    ///
    /// Draws from `rng` in a fixed order: the bass line, then the drum
    /// pattern.
    pub fn arrange<G: Rng + ?Sized>(&self, text: &str, rng: &mut G) -> Result<Arrangement> {
        let config = &self.config;
        let context = config.generator_context();

        let progression = Progression::parse_with_bar_length(text, config.quarters_per_bar);
        let items = progression.expand()?;
        info!(
            raw = progression.len(),
            expanded = items.len(),
            warnings = progression.warnings().len(),
            "progression parsed"
        );

        let bass = BassLineGenerator::with_config(config.bass.to_bass_config())?
            .generate(&items, &context, rng)?;
        let voicings = CompingGenerator::with_base_octave(config.comping.base_octave)
            .generate(&items, &context, rng)?;

        let drummer = DrumGenerator::new().with_default_bars(config.drums.default_bars);
        let bars = drummer.bars_for(&items, &context);
        let drums = drummer.pattern(bars, &context, rng);

        info!(
            bass_notes = bass.len(),
            voicings = voicings.len(),
            drum_hits = drums.len(),
            bars,
            "parts generated"
        );

        Ok(Arrangement {
            progression,
            items,
            bass,
            voicings,
            drums,
            bars,
        })
    }

    /// Compose `text` into a mixed WAV at `output`.
    ///
    /// Nothing is written to `output` unless every step succeeds.
    pub fn compose<G: Rng + ?Sized>(
        &self,
        text: &str,
        output: &Path,
        rng: &mut G,
    ) -> Result<CompositionSummary> {
        let config = &self.config;
        let context = config.generator_context();
        let arrangement = self.arrange(text, rng)?;
        let mut kit_rng = StdRng::seed_from_u64(rng.gen());

        let workspace = TempDir::new().map_err(ComposeError::Workspace)?;
        debug!(dir = %workspace.path().display(), "working directory");

        let bass_audio = self.render_part(
            &Score::from_bass_line(&arrangement.bass, &context),
            workspace.path().join("bass.wav"),
        )?;
        let comping_audio = if config.comping.enabled {
            self.render_part(
                &Score::from_voicings(&arrangement.voicings, &context),
                workspace.path().join("comping.wav"),
            )?
        } else {
            None
        };

        let mut combiner = AudioCombiner::from_context(&context, config.sample_rate, config.channels);

        let kit = DrumKit::new(&config.drums.sounds_dir);
        for hit in &arrangement.drums {
            let sample = kit.resolve(hit.sound, &mut kit_rng)?;
            combiner.place_hit(hit, &sample, config.drums.gain_db)?;
        }
        if let Some(path) = &bass_audio {
            combiner.place_at(path, 0, 0.0, 0, 1, config.bass.gain_db)?;
        }
        if let Some(path) = &comping_audio {
            combiner.place_at(path, 0, 0.0, 0, 1, config.comping.gain_db)?;
        }

        self.write_mix(&combiner, output)?;

        let summary = CompositionSummary {
            raw_items: arrangement.progression.len(),
            expanded_items: arrangement.items.len(),
            bass_notes: arrangement.bass.len(),
            voicings: arrangement.voicings.len(),
            drum_hits: arrangement.drums.len(),
            bars: arrangement.bars,
            duration_ms: combiner.duration_ms(),
        };
        info!(output = %output.display(), duration_ms = summary.duration_ms, "composition written");
        Ok(summary)
    }

    /// Export the mix beside `output`, then move it into place
    fn write_mix(&self, combiner: &AudioCombiner, output: &Path) -> Result<()> {
        let dir = match output.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let partial = tempfile::Builder::new()
            .prefix(".jazzgen-")
            .suffix(".wav")
            .tempfile_in(dir)
            .map_err(|source| ComposeError::Output {
                path: output.to_path_buf(),
                source,
            })?;
        combiner.export(partial.path())?;
        persist(partial, output)
    }

    /// Render a score, or skip it when nothing sounds
    fn render_part(&self, score: &Score, output: PathBuf) -> Result<Option<PathBuf>> {
        if score.is_silent() {
            warn!(instrument = score.instrument().name(), "score is silent, not rendering");
            return Ok(None);
        }
        self.renderer.render(score, &output)?;
        Ok(Some(output))
    }
}

fn persist(partial: NamedTempFile, output: &Path) -> Result<()> {
    partial
        .persist(output)
        .map(|_| ())
        .map_err(|e| ComposeError::Output {
            path: output.to_path_buf(),
            source: e.error,
        })
}
