//! # Walker Module
//!
//! Recursive enumeration of the files named on the command line. Directories
//! are traversed in deterministic lexicographic order, symbolic links are
//! never followed, and every path argument is processed independently so a
//! broken path cannot abort its siblings.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;
use walkdir::WalkDir;

use crate::processor::{FileProcessor, Operation};
use crate::report::FileResult;
use crate::verbose_log;

/// Walks file trees and feeds each regular file to the processor.
pub struct TreeWalker<'a> {
  processor: &'a FileProcessor,
  ignore: Vec<glob::Pattern>,
}

impl<'a> TreeWalker<'a> {
  /// Create a walker over the given processor.
  ///
  /// # Errors
  ///
  /// Returns an error if any ignore pattern is not a valid glob. This is a
  /// configuration error surfaced before any file is touched.
  pub fn new(processor: &'a FileProcessor, ignore_patterns: &[String]) -> Result<Self> {
    let ignore = ignore_patterns
      .iter()
      .map(|pattern| glob::Pattern::new(pattern).with_context(|| format!("Invalid ignore pattern: {pattern}")))
      .collect::<Result<Vec<_>>>()?;

    Ok(Self { processor, ignore })
  }

  /// Process every file under the given paths, in order, and collect one
  /// result per file.
  ///
  /// A path that is a regular file is processed directly; a directory is
  /// recursed into. Unreadable or missing paths yield an error result for
  /// that path and traversal continues.
  pub fn walk(&self, paths: &[PathBuf], operation: Operation) -> Vec<FileResult> {
    let mut results = Vec::new();

    for path in paths {
      match std::fs::symlink_metadata(path) {
        Ok(metadata) if metadata.file_type().is_symlink() => {
          verbose_log!("Skipping: {} (symlink)", path.display());
          results.push(FileResult::skipped(path, "symlink"));
        }
        Ok(metadata) if metadata.is_dir() => {
          self.walk_directory(path, operation, &mut results);
        }
        Ok(_) => {
          let base = path.parent().unwrap_or(Path::new(""));
          results.push(self.process_one(path, base, operation));
        }
        Err(e) => {
          results.push(FileResult::error(path, format!("Failed to stat {}: {e}", path.display())));
        }
      }
    }

    results
  }

  /// Recurse into one directory in lexicographic order.
  fn walk_directory(&self, dir: &Path, operation: Operation, results: &mut Vec<FileResult>) {
    debug!("Scanning directory: {}", dir.display());

    let walk = WalkDir::new(dir).follow_links(false).sort_by_file_name();

    for entry in walk {
      let entry = match entry {
        Ok(entry) => entry,
        Err(e) => {
          let path = e.path().map_or_else(|| dir.to_path_buf(), Path::to_path_buf);
          results.push(FileResult::error(&path, e.to_string()));
          continue;
        }
      };

      if !entry.file_type().is_file() {
        continue;
      }

      results.push(self.process_one(entry.path(), dir, operation));
    }
  }

  fn process_one(&self, path: &Path, base: &Path, operation: Operation) -> FileResult {
    if self.is_ignored(path) {
      verbose_log!("Skipping: {} (matches ignore pattern)", path.display());
      return FileResult::skipped(path, "matches ignore pattern");
    }

    self.processor.process(path, base, operation)
  }

  /// A path is ignored when any pattern matches its full path or basename.
  fn is_ignored(&self, path: &Path) -> bool {
    self.ignore.iter().any(|pattern| {
      pattern.matches_path(path)
        || path
          .file_name()
          .is_some_and(|name| pattern.matches(&name.to_string_lossy()))
    })
  }
}
