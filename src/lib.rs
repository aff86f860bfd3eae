// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! jazzgen - jazz accompaniment from chord progressions.
//!
//! A progression written in a small line-oriented language becomes a
//! walking bass line, piano comping and a swung drum pattern, mixed into
//! one WAV file.

pub mod audio;
pub mod compose;
pub mod config;
pub mod error;
pub mod generators;
pub mod music;
pub mod progression;
pub mod render;

pub use compose::{Arrangement, Composer, CompositionSummary};
pub use config::EngineConfig;
pub use error::{ComposeError, GenerationError};
pub use progression::{Progression, ProgressionError, ProgressionItem};
