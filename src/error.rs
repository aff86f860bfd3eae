// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Errors that abort a generation or composition request.

use std::path::PathBuf;

use thiserror::Error;

use crate::audio::AudioError;
use crate::progression::ProgressionError;
use crate::render::RenderError;

/// Fatal generator errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GenerationError {
    #[error("no resolution tone toward {next} from {from} over {chord} inside the bass range")]
    NoResolutionTone {
        chord: String,
        next: String,
        from: String,
    },

    #[error("bass range {lower}..={upper} is narrower than an octave")]
    InvalidRange { lower: i32, upper: i32 },

    #[error("bass walk over {chord} cannot move from {from} inside the bass range")]
    WalkStuck { chord: String, from: String },
}

/// Errors from the end-to-end composition pipeline
#[derive(Debug, Error)]
pub enum ComposeError {
    #[error(transparent)]
    Progression(#[from] ProgressionError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Audio(#[from] AudioError),

    #[error("drum sample {0} does not exist")]
    MissingSample(PathBuf),

    #[error("failed to create working directory: {0}")]
    Workspace(#[source] std::io::Error),

    #[error("failed to write {path}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, ComposeError>;
