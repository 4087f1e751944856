mod common;

use std::fs;

use common::{TEST_TEMPLATE, build_processor, write_file};
use copyright_header::processor::{FileProcessor, Operation, ProcessorOptions, WriteMode};
use copyright_header::report::FileAction;
use copyright_header::syntax::{ShebangGuesser, SyntaxRegistry};
use copyright_header::template::{HeaderContext, HeaderTemplate};
use copyright_header::walker::TreeWalker;
use tempfile::tempdir;

#[test]
fn test_add_header_to_python_file() {
  let dir = tempdir().unwrap();
  let path = write_file(dir.path(), "a.py", "print('hello')\n");

  let processor = build_processor(TEST_TEMPLATE, &[2016], &["Erik"], WriteMode::InPlace);
  let result = processor.add(&path, dir.path());

  assert_eq!(result.action, FileAction::Added);

  let content = fs::read_to_string(&path).unwrap();
  assert!(content.starts_with("# Copyright (C) 2016 Erik\n"));
  assert!(content.contains("Erik"));
  assert!(content.contains("2016"));
  assert!(content.ends_with("\nprint('hello')\n"));
}

#[test]
fn test_add_is_idempotent() {
  let dir = tempdir().unwrap();
  let path = write_file(dir.path(), "a.py", "print('hello')\n");

  let processor = build_processor(TEST_TEMPLATE, &[2016], &["Erik"], WriteMode::InPlace);

  let first = processor.add(&path, dir.path());
  assert_eq!(first.action, FileAction::Added);
  let after_first = fs::read_to_string(&path).unwrap();

  let second = processor.add(&path, dir.path());
  assert_eq!(second.action, FileAction::Unchanged);
  let after_second = fs::read_to_string(&path).unwrap();

  assert_eq!(after_first, after_second);
}

#[test]
fn test_add_then_remove_round_trips() {
  let dir = tempdir().unwrap();
  let original = "def main():\n    pass\n";
  let path = write_file(dir.path(), "a.py", original);

  let processor = build_processor(TEST_TEMPLATE, &[2016], &["Erik"], WriteMode::InPlace);

  processor.add(&path, dir.path());
  assert_ne!(fs::read_to_string(&path).unwrap(), original);

  let removed = processor.remove(&path, dir.path());
  assert_eq!(removed.action, FileAction::Removed);
  assert_eq!(fs::read_to_string(&path).unwrap(), original);
}

#[test]
fn test_round_trip_preserves_shebang() {
  let dir = tempdir().unwrap();
  let original = "#!/usr/bin/env python\nprint('x')\n";
  let path = write_file(dir.path(), "tool.py", original);

  let processor = build_processor(TEST_TEMPLATE, &[2016], &["Erik"], WriteMode::InPlace);

  processor.add(&path, dir.path());
  let with_header = fs::read_to_string(&path).unwrap();
  assert!(with_header.starts_with("#!/usr/bin/env python\n# Copyright"));

  processor.remove(&path, dir.path());
  assert_eq!(fs::read_to_string(&path).unwrap(), original);
}

#[test]
fn test_round_trip_without_trailing_newline() {
  let dir = tempdir().unwrap();
  let original = "code()";
  let path = write_file(dir.path(), "a.py", original);

  let processor = build_processor(TEST_TEMPLATE, &[2016], &["Erik"], WriteMode::InPlace);

  processor.add(&path, dir.path());
  processor.remove(&path, dir.path());
  assert_eq!(fs::read_to_string(&path).unwrap(), original);
}

#[test]
fn test_merge_is_monotonic_on_existing_header() {
  let dir = tempdir().unwrap();
  let path = write_file(
    dir.path(),
    "a.py",
    "# Copyright (C) 2012-2013 A\n\ncode()\n",
  );

  let processor = build_processor(TEST_TEMPLATE, &[2015], &["B"], WriteMode::InPlace);
  let result = processor.add(&path, dir.path());

  assert_eq!(result.action, FileAction::Replaced);

  let content = fs::read_to_string(&path).unwrap();
  assert!(content.contains("Copyright (C) 2012-2013, 2015 A"));
  assert!(content.contains("Copyright (C) 2012-2013, 2015 B"));
  assert!(content.ends_with("\ncode()\n"));
}

#[test]
fn test_leading_comments_without_marker_stay_below_header() {
  let dir = tempdir().unwrap();
  let original = "# helper module\n# does things\ncode()\n";
  let path = write_file(dir.path(), "a.py", original);

  let processor = build_processor(TEST_TEMPLATE, &[2016], &["Erik"], WriteMode::InPlace);
  let result = processor.add(&path, dir.path());

  assert_eq!(result.action, FileAction::Added);

  let content = fs::read_to_string(&path).unwrap();
  assert!(content.starts_with("# Copyright (C) 2016 Erik\n"));
  // The original commentary is untouched, merely pushed below the header
  assert!(content.ends_with("\n# helper module\n# does things\ncode()\n"));
}

#[test]
fn test_remove_without_header_is_a_no_op() {
  let dir = tempdir().unwrap();
  let original = "fn main() {}\n";
  let path = write_file(dir.path(), "a.rs", original);

  let processor = build_processor(TEST_TEMPLATE, &[2016], &["Erik"], WriteMode::InPlace);
  let result = processor.remove(&path, dir.path());

  assert_eq!(result.action, FileAction::Unchanged);
  assert_eq!(fs::read_to_string(&path).unwrap(), original);
}

#[test]
fn test_block_comment_header_for_java() {
  let dir = tempdir().unwrap();
  let path = write_file(dir.path(), "Main.java", "class Main {}\n");

  let processor = build_processor(TEST_TEMPLATE, &[2016], &["Erik"], WriteMode::InPlace);
  processor.add(&path, dir.path());

  let content = fs::read_to_string(&path).unwrap();
  assert!(content.starts_with("/*\n Copyright (C) 2016 Erik\n"));
  assert!(content.contains("*/\n\nclass Main {}\n"));

  // And the block header round-trips too
  processor.remove(&path, dir.path());
  assert_eq!(fs::read_to_string(&path).unwrap(), "class Main {}\n");
}

#[test]
fn test_unknown_extension_is_skipped() {
  let dir = tempdir().unwrap();
  let path = write_file(dir.path(), "data.zzz", "1,2,3\n");

  let processor = build_processor(TEST_TEMPLATE, &[2016], &["Erik"], WriteMode::InPlace);
  let result = processor.add(&path, dir.path());

  assert_eq!(result.action, FileAction::Skipped);
  assert_eq!(fs::read_to_string(&path).unwrap(), "1,2,3\n");
}

#[test]
fn test_guess_extension_from_shebang() {
  let dir = tempdir().unwrap();
  let path = write_file(dir.path(), "deploy", "#!/bin/bash\necho hi\n");

  let processor = FileProcessor::new(ProcessorOptions {
    registry: SyntaxRegistry::builtin(),
    template: HeaderTemplate::new(common::TEST_TEMPLATE.to_string()),
    requested: HeaderContext {
      software: "Tool".to_string(),
      description: "A test tool".to_string(),
      holders: ["Erik".to_string()].into_iter().collect(),
      years: [2016].into_iter().collect(),
      word_wrap: 80,
    },
    marker: "[Cc]opyright|[Ll]icense".to_string(),
    marker_length: 20,
    write_mode: WriteMode::InPlace,
    guesser: Some(Box::new(ShebangGuesser)),
  })
  .unwrap();

  let result = processor.add(&path, dir.path());
  assert_eq!(result.action, FileAction::Added);

  let content = fs::read_to_string(&path).unwrap();
  assert!(content.starts_with("#!/bin/bash\n# Copyright (C) 2016 Erik\n"));
}

#[test]
fn test_extensionless_file_skipped_without_guesser() {
  let dir = tempdir().unwrap();
  let path = write_file(dir.path(), "deploy", "#!/bin/bash\necho hi\n");

  let processor = build_processor(TEST_TEMPLATE, &[2016], &["Erik"], WriteMode::InPlace);
  let result = processor.add(&path, dir.path());

  assert_eq!(result.action, FileAction::Skipped);
}

#[test]
fn test_output_dir_leaves_original_untouched() {
  let dir = tempdir().unwrap();
  let out = tempdir().unwrap();
  let original = "print('hello')\n";
  write_file(dir.path(), "pkg/a.py", original);

  let processor = build_processor(
    TEST_TEMPLATE,
    &[2016],
    &["Erik"],
    WriteMode::OutputDir(out.path().to_path_buf()),
  );
  let walker = TreeWalker::new(&processor, &[]).unwrap();
  let results = walker.walk(&[dir.path().to_path_buf()], Operation::Add);

  assert_eq!(results.len(), 1);
  assert_eq!(results[0].action, FileAction::Added);

  // Source tree untouched, mirror carries the header at the same relative path
  assert_eq!(fs::read_to_string(dir.path().join("pkg/a.py")).unwrap(), original);
  let mirrored = fs::read_to_string(out.path().join("pkg/a.py")).unwrap();
  assert!(mirrored.starts_with("# Copyright (C) 2016 Erik\n"));
  assert!(mirrored.ends_with("\nprint('hello')\n"));
}

#[test]
fn test_dry_run_writes_nothing() {
  let dir = tempdir().unwrap();
  let original = "print('hello')\n";
  let path = write_file(dir.path(), "a.py", original);

  let processor = build_processor(TEST_TEMPLATE, &[2016], &["Erik"], WriteMode::DryRun);
  let result = processor.add(&path, dir.path());

  assert_eq!(result.action, FileAction::Added);
  assert_eq!(fs::read_to_string(&path).unwrap(), original);
}

#[test]
fn test_walker_orders_files_deterministically() {
  let dir = tempdir().unwrap();
  write_file(dir.path(), "b.py", "b = 1\n");
  write_file(dir.path(), "a.py", "a = 1\n");
  write_file(dir.path(), "sub/c.py", "c = 1\n");

  let processor = build_processor(TEST_TEMPLATE, &[2016], &["Erik"], WriteMode::DryRun);
  let walker = TreeWalker::new(&processor, &[]).unwrap();
  let results = walker.walk(&[dir.path().to_path_buf()], Operation::Add);

  let names: Vec<String> = results
    .iter()
    .map(|r| {
      r.path
        .strip_prefix(dir.path())
        .unwrap()
        .to_string_lossy()
        .into_owned()
    })
    .collect();

  assert_eq!(names, vec!["a.py", "b.py", "sub/c.py"]);
}

#[test]
fn test_walker_ignore_patterns() {
  let dir = tempdir().unwrap();
  write_file(dir.path(), "a.py", "a = 1\n");
  write_file(dir.path(), "generated.py", "g = 1\n");

  let processor = build_processor(TEST_TEMPLATE, &[2016], &["Erik"], WriteMode::InPlace);
  let walker = TreeWalker::new(&processor, &["generated.py".to_string()]).unwrap();
  let results = walker.walk(&[dir.path().to_path_buf()], Operation::Add);

  let skipped: Vec<_> = results.iter().filter(|r| r.action == FileAction::Skipped).collect();
  assert_eq!(skipped.len(), 1);
  assert!(skipped[0].path.ends_with("generated.py"));
  assert_eq!(fs::read_to_string(dir.path().join("generated.py")).unwrap(), "g = 1\n");
}

#[test]
fn test_walker_reports_missing_path_and_continues() {
  let dir = tempdir().unwrap();
  write_file(dir.path(), "a.py", "a = 1\n");

  let processor = build_processor(TEST_TEMPLATE, &[2016], &["Erik"], WriteMode::InPlace);
  let walker = TreeWalker::new(&processor, &[]).unwrap();

  let missing = dir.path().join("does-not-exist");
  let results = walker.walk(&[missing.clone(), dir.path().to_path_buf()], Operation::Add);

  assert_eq!(results[0].action, FileAction::Error);
  assert!(results[0].detail.is_some());
  // The good sibling path is still processed
  assert_eq!(results[1].action, FileAction::Added);
}

#[test]
fn test_add_reports_missing_years_per_file() {
  let dir = tempdir().unwrap();
  let path = write_file(dir.path(), "a.py", "code()\n");

  // No years requested and none to extract: the file fails, the run goes on
  let processor = build_processor(TEST_TEMPLATE, &[], &["Erik"], WriteMode::InPlace);
  let result = processor.add(&path, dir.path());

  assert_eq!(result.action, FileAction::Error);
  assert!(result.detail.unwrap().contains("years"));
  assert_eq!(fs::read_to_string(&path).unwrap(), "code()\n");
}

#[test]
fn test_add_without_years_keeps_existing_years() {
  let dir = tempdir().unwrap();
  let path = write_file(dir.path(), "a.py", "# Copyright (C) 2012 A\n\ncode()\n");

  let processor = build_processor(TEST_TEMPLATE, &[], &["A"], WriteMode::InPlace);
  let result = processor.add(&path, dir.path());

  // Existing years survive even though the request named none
  assert_ne!(result.action, FileAction::Error);
  let content = fs::read_to_string(&path).unwrap();
  assert!(content.contains("Copyright (C) 2012 A"));
}
