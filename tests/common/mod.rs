#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use copyright_header::processor::{FileProcessor, ProcessorOptions, WriteMode};
use copyright_header::syntax::SyntaxRegistry;
use copyright_header::template::{HeaderContext, HeaderTemplate};

/// The small header template used throughout the processor tests.
pub const TEST_TEMPLATE: &str = "{{copyright}}\n\nThis file is part of {{software}}.\n";

/// Writes a file under `dir`, creating parent directories as needed, and
/// returns its path.
pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
  let path = dir.join(name);
  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent).expect("create parent dirs");
  }
  fs::write(&path, content).expect("write test file");
  path
}

/// Builds a processor over the builtin registry with the given request.
pub fn build_processor(template: &str, years: &[u32], holders: &[&str], write_mode: WriteMode) -> FileProcessor {
  FileProcessor::new(ProcessorOptions {
    registry: SyntaxRegistry::builtin(),
    template: HeaderTemplate::new(template.to_string()),
    requested: HeaderContext {
      software: "Tool".to_string(),
      description: "A test tool".to_string(),
      holders: holders.iter().map(|h| h.to_string()).collect(),
      years: years.iter().copied().collect(),
      word_wrap: 80,
    },
    marker: "[Cc]opyright|[Ll]icense".to_string(),
    marker_length: 20,
    write_mode,
    guesser: None,
  })
  .expect("build processor")
}
