//! # Processor Module
//!
//! Per-file orchestration: resolve the comment syntax, match any existing
//! header, merge metadata, render the replacement header, splice it into the
//! original content, and write the result to the chosen destination.
//!
//! The module is organized into submodules:
//! - [`matcher`] - header region detection and metadata extraction
//! - [`merge`] - additive merging of extracted and requested metadata
//! - [`file_io`] - file reading and writing
//!
//! Splicing is conservative: the shebang/preamble and everything outside the
//! matched region survive byte-identical; only the header region's lines are
//! replaced or deleted.

pub mod file_io;
pub mod matcher;
pub mod merge;

use std::path::{Path, PathBuf};

use anyhow::Result;
pub use file_io::FileIO;
pub use matcher::{HeaderRegion, match_header, skip_preamble};
pub use merge::{MergeError, merge};
use regex::{Regex, RegexBuilder};
use tracing::debug;

use crate::report::{FileAction, FileResult};
use crate::syntax::{ExtensionGuesser, SyntaxDescriptor, SyntaxRegistry};
use crate::template::{HeaderContext, HeaderTemplate, decorate};
use crate::verbose_log;

/// Which operation a run performs on each file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
  /// Insert or update headers
  Add,
  /// Strip recognized headers
  Remove,
}

/// Where transformed content is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteMode {
  /// Overwrite the original file
  InPlace,
  /// Mirror each file's relative path below this directory
  OutputDir(PathBuf),
  /// Print transformed content to stdout behind a per-file banner
  DryRun,
}

/// Configuration for creating a [`FileProcessor`].
pub struct ProcessorOptions {
  pub registry: SyntaxRegistry,
  pub template: HeaderTemplate,
  /// Context built from the CLI options, merged per file with extracted
  /// metadata
  pub requested: HeaderContext,
  /// Regex deciding whether a comment block is a header; compiled
  /// case-insensitively
  pub marker: String,
  /// Maximum leading lines searched for a header
  pub marker_length: usize,
  pub write_mode: WriteMode,
  /// Fallback extension guesser consulted when the registry has no match
  pub guesser: Option<Box<dyn ExtensionGuesser>>,
}

/// Processor applying one operation to one file at a time.
///
/// All state is immutable after construction; each call to [`add`](Self::add)
/// or [`remove`](Self::remove) is independent and returns a [`FileResult`]
/// describing what happened. Per-file failures are captured in the result,
/// never propagated, so a bad file cannot abort a run.
pub struct FileProcessor {
  registry: SyntaxRegistry,
  template: HeaderTemplate,
  requested: HeaderContext,
  marker: Regex,
  marker_length: usize,
  write_mode: WriteMode,
  guesser: Option<Box<dyn ExtensionGuesser>>,
}

impl FileProcessor {
  /// Create a processor from the given options.
  ///
  /// # Errors
  ///
  /// Returns an error if the marker regex does not compile. This is a
  /// configuration error surfaced before any file is touched.
  pub fn new(options: ProcessorOptions) -> Result<Self> {
    let marker = RegexBuilder::new(&options.marker)
      .case_insensitive(true)
      .build()
      .map_err(|e| anyhow::anyhow!("Invalid marker regex '{}': {e}", options.marker))?;

    Ok(Self {
      registry: options.registry,
      template: options.template,
      requested: options.requested,
      marker,
      marker_length: options.marker_length,
      write_mode: options.write_mode,
      guesser: options.guesser,
    })
  }

  /// Apply an operation to one file. `base` anchors the relative path used
  /// for output-dir mirroring.
  pub fn process(&self, path: &Path, base: &Path, operation: Operation) -> FileResult {
    match operation {
      Operation::Add => self.add(path, base),
      Operation::Remove => self.remove(path, base),
    }
  }

  /// Insert a header, or refresh an existing one by merging its metadata
  /// with the requested metadata.
  pub fn add(&self, path: &Path, base: &Path) -> FileResult {
    let content = match FileIO::read_to_string(path) {
      Ok(content) => content,
      Err(e) => return FileResult::error(path, format!("{e:#}")),
    };

    let Some(syntax) = self.resolve_syntax(path, &content) else {
      verbose_log!("Skipping: {} (unknown comment syntax)", path.display());
      return FileResult::skipped(path, "unknown comment syntax");
    };

    let lines: Vec<&str> = content.split_inclusive('\n').collect();
    let region = match_header(&lines, syntax, &self.marker, self.marker_length);

    let merged = match merge(&region, &self.requested) {
      Ok(merged) => merged,
      Err(e) => return FileResult::error(path, e.to_string()),
    };

    let header = decorate(&self.template.render(&merged), syntax);

    let (new_content, action) = if region.matched {
      let new_content = splice_replace(&lines, &region, &header);
      if new_content == content {
        (new_content, FileAction::Unchanged)
      } else {
        (new_content, FileAction::Replaced)
      }
    } else {
      let insert_at = skip_preamble(&lines, syntax);
      (splice_insert(&lines, insert_at, &header), FileAction::Added)
    };

    debug!("{}: {:?}", path.display(), action);

    match self.write_output(path, base, &new_content, &action) {
      Ok(()) => FileResult::new(path, action),
      Err(e) => FileResult::error(path, format!("{e:#}")),
    }
  }

  /// Strip a recognized header. Files without one are left untouched and
  /// reported as unchanged, not as an error.
  pub fn remove(&self, path: &Path, base: &Path) -> FileResult {
    let content = match FileIO::read_to_string(path) {
      Ok(content) => content,
      Err(e) => return FileResult::error(path, format!("{e:#}")),
    };

    let Some(syntax) = self.resolve_syntax(path, &content) else {
      verbose_log!("Skipping: {} (unknown comment syntax)", path.display());
      return FileResult::skipped(path, "unknown comment syntax");
    };

    let lines: Vec<&str> = content.split_inclusive('\n').collect();
    let region = match_header(&lines, syntax, &self.marker, self.marker_length);

    let (new_content, action) = if region.matched {
      (splice_remove(&lines, &region), FileAction::Removed)
    } else {
      (content.clone(), FileAction::Unchanged)
    };

    debug!("{}: {:?}", path.display(), action);

    match self.write_output(path, base, &new_content, &action) {
      Ok(()) => FileResult::new(path, action),
      Err(e) => FileResult::error(path, format!("{e:#}")),
    }
  }

  /// Resolve the syntax descriptor for a file, consulting the extension
  /// guesser as a fallback when enabled.
  fn resolve_syntax(&self, path: &Path, content: &str) -> Option<&SyntaxDescriptor> {
    let filename = path.file_name()?.to_string_lossy();

    if let Ok(descriptor) = self.registry.lookup(&filename) {
      return Some(descriptor);
    }

    let guessed = self.guesser.as_ref()?.guess(content)?;
    verbose_log!("Guessed extension '{}' for: {}", guessed, path.display());
    self.registry.lookup_extension(&guessed)
  }

  /// Route transformed content to the configured destination.
  fn write_output(&self, path: &Path, base: &Path, content: &str, action: &FileAction) -> Result<()> {
    match &self.write_mode {
      WriteMode::DryRun => {
        println!("==> {} <==", path.display());
        print!("{content}");
        Ok(())
      }
      WriteMode::OutputDir(output_dir) => {
        let relative = relative_to(path, base);
        let destination = FileIO::write_under(output_dir, &relative, content)?;
        debug!("Wrote: {}", destination.display());
        Ok(())
      }
      WriteMode::InPlace => {
        // Identical content means nothing to commit; skip the write so
        // repeated runs do not touch mtimes
        if *action == FileAction::Unchanged {
          return Ok(());
        }
        FileIO::write_in_place(path, content)
      }
    }
  }
}

/// Relative path of `path` below `base`, falling back to the basename when
/// `path` is not under `base` (e.g. a single-file argument).
fn relative_to(path: &Path, base: &Path) -> PathBuf {
  path
    .strip_prefix(base)
    .map(Path::to_path_buf)
    .unwrap_or_else(|_| path.file_name().map_or_else(|| path.to_path_buf(), PathBuf::from))
}

/// Replace the matched region with the rendered header, preserving every
/// byte before and after it.
fn splice_replace(lines: &[&str], region: &HeaderRegion, header: &[String]) -> String {
  let mut out = String::new();
  for line in &lines[..region.start_line] {
    out.push_str(line);
  }
  for line in header {
    out.push_str(line);
    out.push('\n');
  }
  for line in &lines[region.end_line..] {
    out.push_str(line);
  }
  out
}

/// Insert the rendered header at `insert_at` (just past the preamble),
/// followed by one blank separator line when code follows.
fn splice_insert(lines: &[&str], insert_at: usize, header: &[String]) -> String {
  let mut out = String::new();
  for line in &lines[..insert_at] {
    out.push_str(line);
  }
  for line in header {
    out.push_str(line);
    out.push('\n');
  }
  if insert_at < lines.len() {
    out.push('\n');
  }
  for line in &lines[insert_at..] {
    out.push_str(line);
  }
  out
}

/// Delete the matched region, plus the single blank separator line after it
/// when present, preserving everything else.
fn splice_remove(lines: &[&str], region: &HeaderRegion) -> String {
  let mut out = String::new();
  for line in &lines[..region.start_line] {
    out.push_str(line);
  }

  let mut rest = region.end_line;
  if lines.get(rest).is_some_and(|line| line.trim().is_empty()) {
    rest += 1;
  }

  for line in &lines[rest..] {
    out.push_str(line);
  }
  out
}
