//! Rendering `.qmd` notebooks to Markdown with the external Quarto CLI.

use crate::config::QuartoConfig;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum QuartoError {
    #[error("Failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Quarto render failed ({status}): {stderr}")]
    Failed { status: ExitStatus, stderr: String },

    #[error("Expected output {0:?} not found")]
    MissingOutput(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Something that turns a notebook into a Markdown file next to it
pub trait NotebookRenderer {
    /// Render `source`, running inside `workdir`, and return the produced `.md` path
    fn render(&self, source: &Path, workdir: &Path) -> Result<PathBuf, QuartoError>;

    /// Output format name; Quarto uses it in figure directories and suffixes
    fn format(&self) -> &str;
}

/// Runs `quarto render <file> --to <format>`
#[derive(Debug, Clone)]
pub struct QuartoRenderer {
    command: String,
    format: String,
}

impl QuartoRenderer {
    pub fn new(command: impl Into<String>, format: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            format: format.into(),
        }
    }

    pub fn from_config(config: &QuartoConfig) -> Self {
        Self::new(config.command.clone(), config.format.clone())
    }
}

impl NotebookRenderer for QuartoRenderer {
    fn render(&self, source: &Path, workdir: &Path) -> Result<PathBuf, QuartoError> {
        // Quarto runs inside `workdir`, so it gets the bare file name
        let file_name = source
            .file_name()
            .ok_or_else(|| QuartoError::MissingOutput(source.to_path_buf()))?;
        tracing::debug!("Running {} render {:?} --to {}", self.command, file_name, self.format);

        let output = Command::new(&self.command)
            .arg("render")
            .arg(file_name)
            .arg("--to")
            .arg(&self.format)
            .current_dir(workdir)
            .output()
            .map_err(|source| QuartoError::Spawn {
                command: self.command.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(QuartoError::Failed {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        locate_output(source, workdir, &self.format)
    }

    fn format(&self) -> &str {
        &self.format
    }
}

/// Find the Markdown Quarto produced for `source`
///
/// Quarto writes `<stem>.md` into `workdir`, but some versions add a
/// `-<format>` suffix; that variant is renamed to `<stem>.md`.
pub fn locate_output(source: &Path, workdir: &Path, format: &str) -> Result<PathBuf, QuartoError> {
    let stem = source
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    let md_file = workdir.join(format!("{}.md", stem));
    if md_file.exists() {
        return Ok(md_file);
    }

    let suffixed = workdir.join(format!("{}-{}.md", stem, format));
    if suffixed.exists() {
        fs::rename(&suffixed, &md_file)?;
        return Ok(md_file);
    }

    Err(QuartoError::MissingOutput(md_file))
}
