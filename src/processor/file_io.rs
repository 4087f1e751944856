//! # File I/O Module
//!
//! File reading and writing utilities for the processor. Every operation
//! opens, fully reads or writes, and releases its handle before returning;
//! no handle outlives a single call.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// File I/O operations for the processor.
pub struct FileIO;

impl FileIO {
  /// Read a file's full content as UTF-8.
  pub fn read_to_string(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path.display()))
  }

  /// Overwrite a file in place.
  pub fn write_in_place(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content).with_context(|| format!("Failed to write file: {}", path.display()))
  }

  /// Write content under `output_dir` at the given relative path, creating
  /// intermediate directories as needed. Returns the destination path.
  pub fn write_under(output_dir: &Path, relative: &Path, content: &str) -> Result<PathBuf> {
    let destination = output_dir.join(relative);

    if let Some(parent) = destination.parent() {
      std::fs::create_dir_all(parent)
        .with_context(|| format!("Failed to create output directory: {}", parent.display()))?;
    }

    std::fs::write(&destination, content)
      .with_context(|| format!("Failed to write file: {}", destination.display()))?;

    Ok(destination)
  }
}
