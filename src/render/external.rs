// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! External notation renderer.
//!
//! The score is written as a MIDI file next to the requested output and a
//! child process converts it. Arguments are a template where `{input}`
//! and `{output}` are replaced with the two paths.

use std::io::ErrorKind;
use std::path::Path;
use std::process::Command;

use tracing::{debug, info};

use super::{RenderError, Renderer, Score, SmfWriter};

/// Default rendering program
pub const DEFAULT_PROGRAM: &str = "mscore";

/// Placeholder for the MIDI input path
pub const INPUT_PLACEHOLDER: &str = "{input}";

/// Placeholder for the audio output path
pub const OUTPUT_PLACEHOLDER: &str = "{output}";

/// Default argument template
pub fn default_args() -> Vec<String> {
    vec![
        INPUT_PLACEHOLDER.to_string(),
        "-o".to_string(),
        OUTPUT_PLACEHOLDER.to_string(),
    ]
}

/// Renders scores by running an external program
#[derive(Debug, Clone)]
pub struct ExternalRenderer {
    program: String,
    args: Vec<String>,
    writer: SmfWriter,
}

impl Default for ExternalRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM, default_args())
    }
}

impl ExternalRenderer {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            writer: SmfWriter::new(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments with both placeholders filled in
    pub fn resolve_args(&self, input: &Path, output: &Path) -> Vec<String> {
        let input = input.to_string_lossy();
        let output = output.to_string_lossy();
        self.args
            .iter()
            .map(|arg| {
                arg.replace(INPUT_PLACEHOLDER, &input)
                    .replace(OUTPUT_PLACEHOLDER, &output)
            })
            .collect()
    }
}

impl Renderer for ExternalRenderer {
    fn render(&self, score: &Score, output: &Path) -> Result<(), RenderError> {
        let input = output.with_extension("mid");
        self.writer.export(score, &input)?;

        let args = self.resolve_args(&input, output);
        debug!(program = %self.program, ?args, "running renderer");

        let result = Command::new(&self.program).args(&args).output().map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                RenderError::NotFound {
                    program: self.program.clone(),
                }
            } else {
                RenderError::Io(e)
            }
        })?;

        if !result.status.success() {
            return Err(RenderError::Failed {
                program: self.program.clone(),
                status: result.status,
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            });
        }

        if !output.is_file() {
            return Err(RenderError::MissingOutput(output.to_path_buf()));
        }

        info!(output = %output.display(), instrument = score.instrument().name(), "part rendered");
        Ok(())
    }
}
