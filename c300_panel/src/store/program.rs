//! Editable program buffer, optionally bound to a text file.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use super::{ProgramSource, StoreError};

/// Program text as the operator sees it in the editor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextProgram {
    text: String,
    path: Option<PathBuf>,
}

impl TextProgram {
    /// Unbound buffer holding `text`.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            path: None,
        }
    }

    /// Read a program file and bind the buffer to it.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let mut program = Self::default();
        program.load_file(path)?;
        Ok(program)
    }

    /// Replace the buffer with the file contents and bind to `path`.
    /// On failure the buffer is unchanged.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<(), StoreError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| StoreError::io(path, e))?;
        self.text = text;
        self.path = Some(path.to_path_buf());
        info!(path = %path.display(), "program loaded");
        Ok(())
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Append one line after the last non-blank line.
    pub fn append_line(&mut self, line: &str) {
        self.text.truncate(self.text.trim_end().len());
        if !self.text.is_empty() {
            self.text.push('\n');
        }
        self.text.push_str(line);
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Write back to the bound file.
    pub fn save(&self) -> Result<&Path, StoreError> {
        let path = self.path.as_deref().ok_or(StoreError::NoPath)?;
        write_trimmed(path, &self.text)?;
        info!(path = %path.display(), "program saved");
        Ok(path)
    }

    /// Write to `path` and bind the buffer to it.
    pub fn save_as(&mut self, path: impl AsRef<Path>) -> Result<(), StoreError> {
        let path = path.as_ref();
        write_trimmed(path, &self.text)?;
        self.path = Some(path.to_path_buf());
        info!(path = %path.display(), "program saved as");
        Ok(())
    }
}

fn write_trimmed(path: &Path, text: &str) -> Result<(), StoreError> {
    fs::write(path, text.trim()).map_err(|e| StoreError::io(path, e))
}

/// Split program text into lines. Surrounding blank space is dropped, so a
/// blank buffer has no lines; blank lines inside the program are kept.
pub fn program_lines(text: &str) -> Vec<String> {
    text.trim().lines().map(str::to_string).collect()
}

impl ProgramSource for TextProgram {
    fn load(&self) -> Result<Vec<String>, StoreError> {
        Ok(program_lines(&self.text))
    }
}
