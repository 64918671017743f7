//! External PDF-to-markdown converter bridge.
//!
//! Conversion runs out of process: a configured command receives the PDF
//! path as its final argument and writes markdown to stdout. Anything
//! other than a clean exit with non-empty output fails that document.

use std::path::Path;
use std::process::Command;

use tracing::{debug, info};

use passageforge_shared::{ConverterConfig, PassageForgeError, Result};

use crate::MarkdownConverter;

/// Converter that spawns a configured external command.
#[derive(Debug, Clone)]
pub struct CommandConverter {
    command: String,
    args: Vec<String>,
}

impl CommandConverter {
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            command: command.into(),
            args,
        }
    }

    pub fn from_config(config: &ConverterConfig) -> Self {
        Self::new(config.command.clone(), config.args.clone())
    }
}

impl MarkdownConverter for CommandConverter {
    fn convert(&self, path: &Path) -> Result<String> {
        info!(cmd = %self.command, path = %path.display(), "converting PDF to markdown");

        let output = Command::new(&self.command)
            .args(&self.args)
            .arg(path)
            .output()
            .map_err(|e| {
                PassageForgeError::Conversion(format!(
                    "failed to spawn converter: {e}. Is `{}` installed?",
                    self.command
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PassageForgeError::Conversion(format!(
                "{}: converter exited with {}: {}",
                path.display(),
                output.status,
                stderr.trim().chars().take(200).collect::<String>()
            )));
        }

        let markdown = String::from_utf8(output.stdout).map_err(|e| {
            PassageForgeError::Conversion(format!(
                "{}: converter produced non-UTF-8 output: {e}",
                path.display()
            ))
        })?;

        if markdown.trim().is_empty() {
            return Err(PassageForgeError::Conversion(format!(
                "{}: converter produced no output",
                path.display()
            )));
        }

        debug!(len = markdown.len(), "conversion complete");
        Ok(markdown)
    }
}
