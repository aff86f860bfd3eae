// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Drum sample bank.
//!
//! Samples live in one directory as `<number>.wav`. Each kit piece owns a
//! range of numbers and a hit picks one of them at random.

use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use rand::Rng;

use crate::error::ComposeError;
use crate::generators::DrumSound;

/// Sample numbers for each kit piece
pub fn variants(sound: DrumSound) -> RangeInclusive<u32> {
    match sound {
        DrumSound::Kick => 1..=2,
        DrumSound::HiHat => 41..=46,
        DrumSound::Snare => 61..=62,
        DrumSound::Ride => 211..=215,
    }
}

/// Directory of numbered drum samples
#[derive(Debug, Clone)]
pub struct DrumKit {
    dir: PathBuf,
}

impl DrumKit {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of a random variant of `sound`
    pub fn sample_path<R: Rng + ?Sized>(&self, sound: DrumSound, rng: &mut R) -> PathBuf {
        let number = rng.gen_range(variants(sound));
        self.dir.join(format!("{}.wav", number))
    }

    /// Like [`DrumKit::sample_path`], but the file must exist
    pub fn resolve<R: Rng + ?Sized>(&self, sound: DrumSound, rng: &mut R) -> Result<PathBuf, ComposeError> {
        let path = self.sample_path(sound, rng);
        if path.is_file() {
            Ok(path)
        } else {
            Err(ComposeError::MissingSample(path))
        }
    }

    /// Every sample file this kit can pick
    pub fn all_paths(&self) -> Vec<PathBuf> {
        DrumSound::ALL
            .iter()
            .flat_map(|&sound| variants(sound))
            .map(|n| self.dir.join(format!("{}.wav", n)))
            .collect()
    }
}
