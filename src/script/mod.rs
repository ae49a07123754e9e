//! Script rendering and output.
//!
//! A [`Script`] is the flat, ordered list of lines produced from ordered
//! features: each feature contributes its command block, optionally preceded
//! by a `# <resolved-path>` comment. [`ScriptWriter`] implementations persist
//! the lines without reordering them.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use crate::resolver::ResolvedFeature;
use crate::utils::safe_write;

/// Rendering options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptOptions {
    /// Emit a `# <resolved-path>` line before each feature block
    pub comments: bool,
}

impl Default for ScriptOptions {
    fn default() -> Self {
        Self {
            comments: true,
        }
    }
}

/// Ordered command lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Script {
    lines: Vec<String>,
}

impl Script {
    /// Render `features` in the given order.
    pub fn from_features(features: &[ResolvedFeature], options: ScriptOptions) -> Self {
        let mut lines = Vec::new();
        for feature in features {
            if options.comments {
                lines.push(format!("# {}", feature.resolved_path()));
            }
            lines.extend(feature.commands().iter().cloned());
        }
        Self {
            lines,
        }
    }

    /// The rendered lines.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Number of lines that are commands rather than comments.
    pub fn command_count(&self) -> usize {
        self.lines.iter().filter(|line| !line.starts_with('#')).count()
    }

    /// Lines joined with newlines, terminated by a final newline when non-empty.
    pub fn render(&self) -> String {
        let mut out = self.lines.join("\n");
        if !out.is_empty() {
            out.push('\n');
        }
        out
    }
}

/// Destination for a rendered script.
pub trait ScriptWriter {
    /// Persist `script`, preserving line order.
    fn write_script(&mut self, script: &Script) -> Result<()>;
}

/// Writes the script to a file atomically.
#[derive(Debug, Clone)]
pub struct FileScriptWriter {
    path: PathBuf,
}

impl FileScriptWriter {
    /// Write to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
        }
    }

    /// Target file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScriptWriter for FileScriptWriter {
    fn write_script(&mut self, script: &Script) -> Result<()> {
        safe_write(&self.path, &script.render())?;
        debug!("Wrote {} lines to {}", script.lines().len(), self.path.display());
        Ok(())
    }
}

/// Collects scripts in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryScriptWriter {
    lines: Vec<String>,
}

impl MemoryScriptWriter {
    /// Empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// All lines written so far.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Buffer contents as text.
    pub fn contents(&self) -> String {
        Script {
            lines: self.lines.clone(),
        }
        .render()
    }
}

impl ScriptWriter for MemoryScriptWriter {
    fn write_script(&mut self, script: &Script) -> Result<()> {
        self.lines.extend(script.lines().iter().cloned());
        Ok(())
    }
}

/// Writes the script to any [`Write`] stream, such as stdout.
#[derive(Debug)]
pub struct StreamScriptWriter<W: Write> {
    inner: W,
}

impl<W: Write> StreamScriptWriter<W> {
    /// Wrap `inner`.
    pub const fn new(inner: W) -> Self {
        Self {
            inner,
        }
    }

    /// Unwrap the stream.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> ScriptWriter for StreamScriptWriter<W> {
    fn write_script(&mut self, script: &Script) -> Result<()> {
        self.inner.write_all(script.render().as_bytes()).context("Failed to write script")?;
        self.inner.flush().context("Failed to flush script output")?;
        Ok(())
    }
}
