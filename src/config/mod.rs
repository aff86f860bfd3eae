// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Configuration for the composition engine.
//!
//! Every field has a default, so an empty file (or no file at all) gives
//! the stock 4/4 setup at 120 BPM. Files are YAML or TOML, picked by
//! extension.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, ensure, Context, Result};
use serde::{Deserialize, Serialize};

use crate::generators::bass::{LOWER_BOUND, START_OCTAVE, UPPER_BOUND};
use crate::generators::comping::DEFAULT_BASE_OCTAVE;
use crate::generators::drums::{DEFAULT_BARS, SWING_FACTOR};
use crate::generators::{BassConfig, GeneratorContext};
use crate::music::PitchRange;
use crate::render::external::{default_args, DEFAULT_PROGRAM};
use crate::render::ExternalRenderer;

/// Root configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EngineConfig {
    /// Tempo in BPM
    #[serde(default = "default_tempo")]
    pub tempo: f64,
    /// Quarters per bar; also the default bar length of the progression
    #[serde(default = "default_quarters_per_bar")]
    pub quarters_per_bar: u32,
    /// Off-beat eighth position within a quarter (0.5 = straight)
    #[serde(default = "default_swing")]
    pub swing: f64,
    /// Sample rate of the final mix
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,
    /// Channel count of the final mix
    #[serde(default = "default_channels")]
    pub channels: u16,
    #[serde(default)]
    pub bass: BassSettings,
    #[serde(default)]
    pub comping: CompingSettings,
    #[serde(default)]
    pub drums: DrumSettings,
    #[serde(default)]
    pub renderer: RendererSettings,
}

fn default_tempo() -> f64 {
    120.0
}
fn default_quarters_per_bar() -> u32 {
    4
}
fn default_swing() -> f64 {
    SWING_FACTOR
}
fn default_sample_rate() -> u32 {
    44_100
}
fn default_channels() -> u16 {
    2
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tempo: default_tempo(),
            quarters_per_bar: default_quarters_per_bar(),
            swing: default_swing(),
            sample_rate: default_sample_rate(),
            channels: default_channels(),
            bass: BassSettings::default(),
            comping: CompingSettings::default(),
            drums: DrumSettings::default(),
            renderer: RendererSettings::default(),
        }
    }
}

impl EngineConfig {
    /// Load from a `.yaml`/`.yml` or `.toml` file and validate it
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        let config = match extension.as_deref() {
            Some("yaml") | Some("yml") => Self::from_yaml(&contents)?,
            Some("toml") => Self::from_toml(&contents)?,
            _ => bail!("Unsupported config format: {:?}", path),
        };

        config.validate()?;
        Ok(config)
    }

    /// Parse from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("Failed to parse YAML configuration")
    }

    /// Parse from a TOML string
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("Failed to parse TOML configuration")
    }

    /// Serialize to a YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize configuration to YAML")
    }

    /// Save as YAML
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml = self.to_yaml()?;
        fs::write(path.as_ref(), yaml)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))
    }

    /// Reject settings the generators cannot work with
    pub fn validate(&self) -> Result<()> {
        ensure!(self.tempo > 0.0, "tempo must be positive, got {}", self.tempo);
        ensure!(self.quarters_per_bar > 0, "quarters_per_bar must be at least 1");
        ensure!(
            (0.5..1.0).contains(&self.swing),
            "swing must be in [0.5, 1.0), got {}",
            self.swing
        );
        ensure!(self.sample_rate > 0, "sample_rate must be positive");
        ensure!(self.channels > 0, "channels must be at least 1");
        self.bass.to_bass_config().validate()?;
        ensure!(!self.renderer.program.is_empty(), "renderer program is empty");
        Ok(())
    }

    /// Timing shared by the generators
    pub fn generator_context(&self) -> GeneratorContext {
        GeneratorContext {
            tempo: self.tempo,
            quarters_per_bar: self.quarters_per_bar,
            swing: self.swing,
        }
    }

    pub fn renderer(&self) -> ExternalRenderer {
        ExternalRenderer::new(self.renderer.program.clone(), self.renderer.args.clone())
    }
}

/// Walking bass settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BassSettings {
    /// Lowest MIDI pitch
    #[serde(default = "default_lower_bound")]
    pub lower_bound: i32,
    /// Highest MIDI pitch
    #[serde(default = "default_upper_bound")]
    pub upper_bound: i32,
    /// Octave of the first root
    #[serde(default = "default_start_octave")]
    pub start_octave: i32,
    /// Mix gain in dB
    #[serde(default = "default_bass_gain")]
    pub gain_db: f32,
}

fn default_lower_bound() -> i32 {
    LOWER_BOUND
}
fn default_upper_bound() -> i32 {
    UPPER_BOUND
}
fn default_start_octave() -> i32 {
    START_OCTAVE
}
fn default_bass_gain() -> f32 {
    10.0
}

impl Default for BassSettings {
    fn default() -> Self {
        Self {
            lower_bound: default_lower_bound(),
            upper_bound: default_upper_bound(),
            start_octave: default_start_octave(),
            gain_db: default_bass_gain(),
        }
    }
}

impl BassSettings {
    pub fn to_bass_config(&self) -> BassConfig {
        BassConfig {
            range: PitchRange::new(self.lower_bound, self.upper_bound),
            start_octave: self.start_octave,
        }
    }
}

/// Piano comping settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompingSettings {
    #[serde(default = "default_base_octave")]
    pub base_octave: i32,
    /// Mix gain in dB
    #[serde(default = "default_comping_gain")]
    pub gain_db: f32,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_base_octave() -> i32 {
    DEFAULT_BASE_OCTAVE
}
fn default_comping_gain() -> f32 {
    8.0
}
fn default_enabled() -> bool {
    true
}

impl Default for CompingSettings {
    fn default() -> Self {
        Self {
            base_octave: default_base_octave(),
            gain_db: default_comping_gain(),
            enabled: default_enabled(),
        }
    }
}

/// Drum settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DrumSettings {
    /// Directory holding the numbered drum samples
    #[serde(default = "default_sounds_dir")]
    pub sounds_dir: PathBuf,
    /// Bars when the progression has no chords
    #[serde(default = "default_bars")]
    pub default_bars: u32,
    /// Mix gain in dB
    #[serde(default)]
    pub gain_db: f32,
}

fn default_sounds_dir() -> PathBuf {
    PathBuf::from("sounds")
}
fn default_bars() -> u32 {
    DEFAULT_BARS
}

impl Default for DrumSettings {
    fn default() -> Self {
        Self {
            sounds_dir: default_sounds_dir(),
            default_bars: default_bars(),
            gain_db: 0.0,
        }
    }
}

/// External renderer command
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RendererSettings {
    #[serde(default = "default_program")]
    pub program: String,
    /// Arguments; `{input}` and `{output}` are replaced with paths
    #[serde(default = "default_args")]
    pub args: Vec<String>,
}

fn default_program() -> String {
    DEFAULT_PROGRAM.to_string()
}

impl Default for RendererSettings {
    fn default() -> Self {
        Self {
            program: default_program(),
            args: default_args(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_values() {
        let config = EngineConfig::from_yaml("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.tempo, 120.0);
        assert_eq!(config.quarters_per_bar, 4);
        assert_eq!(config.sample_rate, 44_100);
        assert_eq!(config.bass.lower_bound, 30);
        assert_eq!(config.bass.upper_bound, 55);
        assert_eq!(config.bass.gain_db, 10.0);
        assert_eq!(config.comping.gain_db, 8.0);
        assert!(config.comping.enabled);
        assert_eq!(config.drums.sounds_dir, PathBuf::from("sounds"));
        assert_eq!(config.renderer.args, vec!["{input}", "-o", "{output}"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
tempo: 160
quarters_per_bar: 3
bass:
  start_octave: 1
  lower_bound: 28
comping:
  enabled: false
drums:
  sounds_dir: "kit/brushes"
renderer:
  program: "timidity"
  args: ["{input}", "-Ow", "-o", "{output}"]
"#;

        let config = EngineConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.tempo, 160.0);
        assert_eq!(config.quarters_per_bar, 3);
        assert_eq!(config.bass.start_octave, 1);
        assert_eq!(config.bass.lower_bound, 28);
        assert_eq!(config.bass.upper_bound, 55);
        assert!(!config.comping.enabled);
        assert_eq!(config.drums.sounds_dir, PathBuf::from("kit/brushes"));
        assert_eq!(config.renderer.program, "timidity");
        assert_eq!(config.renderer.args.len(), 4);

        let ctx = config.generator_context();
        assert_eq!(ctx.quarters_per_bar, 3);
        assert_eq!(config.bass.to_bass_config().range, PitchRange::new(28, 55));
    }

    #[test]
    fn test_parse_toml() {
        let text = r#"
tempo = 90.0
swing = 0.6

[drums]
default_bars = 8
gain_db = -3.0
"#;

        let config = EngineConfig::from_toml(text).unwrap();
        assert_eq!(config.tempo, 90.0);
        assert_eq!(config.swing, 0.6);
        assert_eq!(config.drums.default_bars, 8);
        assert_eq!(config.drums.gain_db, -3.0);
        assert_eq!(config.channels, 2);
    }

    #[test]
    fn test_round_trip() {
        let mut original = EngineConfig::default();
        original.tempo = 140.0;
        original.bass.gain_db = 6.0;
        original.renderer.program = "fluidsynth".to_string();

        let yaml = original.to_yaml().unwrap();
        let parsed = EngineConfig::from_yaml(&yaml).unwrap();
        assert_eq!(original, parsed);
    }

    #[test]
    fn test_validation() {
        let mut config = EngineConfig::default();
        config.tempo = 0.0;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.quarters_per_bar = 0;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.bass.lower_bound = 50;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.bass.lower_bound = 60;
        config.bass.upper_bound = 40;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_and_save() {
        let dir = tempdir().unwrap();

        let yaml_path = dir.path().join("engine.yaml");
        let mut config = EngineConfig::default();
        config.tempo = 132.0;
        config.save(&yaml_path).unwrap();
        assert_eq!(EngineConfig::load(&yaml_path).unwrap().tempo, 132.0);

        let toml_path = dir.path().join("engine.toml");
        fs::write(&toml_path, "tempo = 100.0\n").unwrap();
        assert_eq!(EngineConfig::load(&toml_path).unwrap().tempo, 100.0);
    }

    #[test]
    fn test_load_rejects_bad_files() {
        let dir = tempdir().unwrap();

        let broken = dir.path().join("broken.yaml");
        fs::write(&broken, "this is not valid yaml: [").unwrap();
        assert!(EngineConfig::load(&broken).is_err());

        let unknown = dir.path().join("engine.ini");
        fs::write(&unknown, "tempo=1").unwrap();
        assert!(EngineConfig::load(&unknown).is_err());

        let invalid = dir.path().join("slow.yaml");
        fs::write(&invalid, "tempo: 0").unwrap();
        assert!(EngineConfig::load(&invalid).is_err());

        assert!(EngineConfig::load(dir.path().join("missing.yaml")).is_err());
    }
}
