//! # Output Module
//!
//! This module centralizes user-facing terminal output: the start message,
//! per-action file lists, and the end-of-run summary.
//!
//! ## Design Goals
//!
//! - **Scannable**: symbols and colors make the result easy to parse visually
//! - **Progressive**: more detail with `-v`, silence with `-q`
//! - **Scriptable**: in dry-run mode stdout carries only file content, so all
//!   status lines move to stderr

use std::path::Path;

use owo_colors::{OwoColorize, Stream};

use crate::logging::{is_quiet, is_verbose};
use crate::processor::Operation;
use crate::report::{FileAction, FileResult, RunSummary};

/// Symbols used in output
pub mod symbols {
  /// Header added or replaced
  pub const SUCCESS: &str = "\u{2713}"; // ✓
  /// Processing failure
  pub const FAILURE: &str = "\u{2717}"; // ✗
  /// Header removed
  pub const REMOVED: &str = "-";
}

/// Maximum number of files to show per list before truncating
const DEFAULT_FILE_LIST_LIMIT: usize = 20;

/// Print the initial "Adding headers..." / "Removing headers..." message.
pub fn print_start_message(file_count: usize, operation: Operation, to_stderr: bool) {
  if is_quiet() {
    return;
  }

  let verb = match operation {
    Operation::Add => "Adding headers in",
    Operation::Remove => "Removing headers in",
  };
  let files_word = if file_count == 1 { "path" } else { "paths" };

  emit(to_stderr, format!("{} {} {}...", verb, file_count, files_word));
}

/// Print the dry-run banner to stderr, ahead of any content on stdout.
pub fn print_dry_run_banner() {
  eprintln!("-- DRY RUN --");
}

/// Print a blank line for visual separation (respects quiet mode).
pub fn print_blank_line(to_stderr: bool) {
  if is_quiet() {
    return;
  }
  if to_stderr {
    eprintln!();
  } else {
    println!();
  }
}

/// Print the files grouped by the action taken on them.
///
/// Shows up to [`DEFAULT_FILE_LIST_LIMIT`] files per group, or all of them in
/// verbose mode. Skipped and unchanged files only appear in verbose mode.
pub fn print_result_lists(results: &[FileResult], base: Option<&Path>, to_stderr: bool) {
  if is_quiet() {
    return;
  }

  let groups: [(FileAction, &str, &str); 3] = [
    (FileAction::Added, symbols::SUCCESS, "Added header to"),
    (FileAction::Replaced, symbols::SUCCESS, "Updated header in"),
    (FileAction::Removed, symbols::REMOVED, "Removed header from"),
  ];

  let mut first = true;
  for (action, symbol, label) in groups {
    let mut files: Vec<&FileResult> = results.iter().filter(|r| r.action == action).collect();
    if files.is_empty() {
      continue;
    }
    files.sort_by(|a, b| a.path.cmp(&b.path));

    if !first {
      print_blank_line(to_stderr);
    }
    first = false;

    let count = files.len();
    emit(
      to_stderr,
      format!(
        "{} {} {} {}:",
        symbol.if_supports_color(Stream::Stdout, |s| s.green()),
        label,
        count,
        if count == 1 { "file" } else { "files" }
      ),
    );

    let effective_limit = if is_verbose() { count } else { DEFAULT_FILE_LIST_LIMIT };
    for file in files.iter().take(effective_limit) {
      emit(to_stderr, format!("  {}", make_relative_path(&file.path, base)));
    }

    if count > effective_limit {
      emit(
        to_stderr,
        format!("  ... and {} more (use -v to see all)", count - effective_limit),
      );
    }
  }
}

/// Print every file that failed, with its cause. Errors ignore quiet mode.
pub fn print_error_files(results: &[FileResult], base: Option<&Path>) {
  let failures: Vec<&FileResult> = results.iter().filter(|r| r.action == FileAction::Error).collect();
  if failures.is_empty() {
    return;
  }

  eprintln!(
    "{} {} {} failed:",
    symbols::FAILURE.if_supports_color(Stream::Stderr, |s| s.red()),
    failures.len(),
    if failures.len() == 1 { "file" } else { "files" }
  );

  for file in failures {
    let cause = file.detail.as_deref().unwrap_or("unknown error");
    eprintln!("  {}: {}", make_relative_path(&file.path, base), cause);
  }
}

/// Print the "all good" line used when nothing needed doing.
pub fn print_all_files_ok(to_stderr: bool) {
  if is_quiet() {
    return;
  }
  emit(
    to_stderr,
    format!(
      "{} All files already up to date",
      symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green())
    ),
  );
}

/// Print the end-of-run summary counts.
pub fn print_summary(summary: &RunSummary, to_stderr: bool) {
  if is_quiet() {
    return;
  }

  emit(
    to_stderr,
    format!(
      "{} processed: {} added, {} replaced, {} removed, {} unchanged, {} skipped, {} errors",
      summary.total(),
      summary.added,
      summary.replaced,
      summary.removed,
      summary.unchanged,
      summary.skipped,
      summary.errors
    ),
  );
}

fn emit(to_stderr: bool, line: String) {
  if to_stderr {
    eprintln!("{line}");
  } else {
    println!("{line}");
  }
}

/// Display a path relative to the base directory when possible.
fn make_relative_path(path: &Path, base: Option<&Path>) -> String {
  if let Some(base) = base
    && let Some(relative) = pathdiff::diff_paths(path, base)
    && !relative.as_os_str().is_empty()
  {
    return relative.display().to_string();
  }

  path.display().to_string()
}
