//! # Report Module
//!
//! Per-file results and run summaries, plus machine-readable JSON report
//! generation. Results are created once per file and never mutated; the
//! summary is derived from the full result list at the end of a run.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use serde::{Deserialize, Serialize};

/// What happened to one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileAction {
  /// A header was inserted into a file that had none
  Added,
  /// An existing header was rewritten with merged metadata
  Replaced,
  /// An existing header was stripped
  Removed,
  /// The file already had exactly the desired content
  Unchanged,
  /// The file was not processed (unknown syntax, ignore pattern, symlink)
  Skipped,
  /// Reading or writing the file failed
  Error,
}

/// Outcome of processing one file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileResult {
  /// Path to the file
  #[serde(with = "path_serialization")]
  pub path: PathBuf,
  /// Action taken on the file
  pub action: FileAction,
  /// Skip reason or error cause, when applicable
  #[serde(skip_serializing_if = "Option::is_none")]
  pub detail: Option<String>,
}

impl FileResult {
  /// Result with an action and no detail.
  pub fn new(path: &Path, action: FileAction) -> Self {
    Self {
      path: path.to_path_buf(),
      action,
      detail: None,
    }
  }

  /// Result for a skipped file, with the reason.
  pub fn skipped(path: &Path, reason: impl Into<String>) -> Self {
    Self {
      path: path.to_path_buf(),
      action: FileAction::Skipped,
      detail: Some(reason.into()),
    }
  }

  /// Result for a failed file, with the underlying cause.
  pub fn error(path: &Path, cause: impl Into<String>) -> Self {
    Self {
      path: path.to_path_buf(),
      action: FileAction::Error,
      detail: Some(cause.into()),
    }
  }
}

/// Helper module for serializing/deserializing PathBuf
mod path_serialization {
  use std::path::PathBuf;

  use serde::{Deserialize, Deserializer, Serializer};

  pub fn serialize<S>(path: &std::path::Path, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: Serializer,
  {
    serializer.serialize_str(&path.to_string_lossy())
  }

  pub fn deserialize<'de, D>(deserializer: D) -> Result<PathBuf, D::Error>
  where
    D: Deserializer<'de>,
  {
    let s = String::deserialize(deserializer)?;
    Ok(PathBuf::from(s))
  }
}

/// Summary counts for one run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
  pub added: usize,
  pub replaced: usize,
  pub removed: usize,
  pub unchanged: usize,
  pub skipped: usize,
  pub errors: usize,
  /// Timestamp when the summary was generated
  #[serde(skip_serializing_if = "Option::is_none")]
  pub timestamp: Option<i64>,
}

impl RunSummary {
  /// Tally a summary from a collection of file results.
  pub fn from_results(results: &[FileResult]) -> Self {
    let mut summary = Self {
      timestamp: Some(Local::now().timestamp()),
      ..Self::default()
    };

    for result in results {
      match result.action {
        FileAction::Added => summary.added += 1,
        FileAction::Replaced => summary.replaced += 1,
        FileAction::Removed => summary.removed += 1,
        FileAction::Unchanged => summary.unchanged += 1,
        FileAction::Skipped => summary.skipped += 1,
        FileAction::Error => summary.errors += 1,
      }
    }

    summary
  }

  /// Total number of files seen.
  pub const fn total(&self) -> usize {
    self.added + self.replaced + self.removed + self.unchanged + self.skipped + self.errors
  }

  /// Whether any file failed.
  pub const fn has_failures(&self) -> bool {
    self.errors > 0
  }
}

/// Write a machine-readable JSON report of the run.
pub fn write_json_report(output_path: &Path, results: &[FileResult], summary: &RunSummary) -> Result<()> {
  let report = serde_json::json!({
      "summary": summary,
      "files": results,
  });

  let content = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;

  fs::write(output_path, content).with_context(|| format!("Failed to write report to {}", output_path.display()))
}
