//! # Header Matcher Module
//!
//! This module scans the leading lines of a file for an existing license
//! header region. Detection is comment-syntax aware: a block comment opened
//! at the top of the file, or a contiguous run of line comments, is a header
//! *candidate*; the marker regex decides whether it is a genuine header or
//! ordinary leading comments that must be left untouched.
//!
//! When a header is recognized, copyright years and holder names are
//! extracted from it best-effort. Absence of either is not an error.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use indexmap::IndexSet;
use regex::Regex;

use crate::syntax::SyntaxDescriptor;

/// The header region found (or not found) at the top of a file.
///
/// Line indices are half-open: the region covers `start_line..end_line` of
/// the file's lines. Both are zero when nothing matched, and the extracted
/// sets are empty in that case.
#[derive(Debug, Clone, Default)]
pub struct HeaderRegion {
  /// First line of the region (inclusive)
  pub start_line: usize,

  /// Line just past the region (exclusive); `end_line >= start_line`
  pub end_line: usize,

  /// Whether a genuine header was recognized
  pub matched: bool,

  /// Copyright years extracted from the header
  pub years: BTreeSet<u32>,

  /// Copyright holders extracted from the header, in order of appearance
  pub holders: IndexSet<String>,
}

impl HeaderRegion {
  /// A region describing "no header found".
  pub fn unmatched() -> Self {
    Self::default()
  }
}

/// Lines recognized as an encoding/declaration preamble when they follow an
/// optional shebang: Ruby/Python encoding comments, Emacs-style mode lines,
/// and XML declarations.
static PREAMBLE_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"(?i)^(#\s*-\*-.*-\*-|#\s*(en)?coding:|#\s*frozen_string_literal:|<\?xml\b)")
    .expect("preamble regex must compile")
});

/// One copyright notice line: the token, an optional symbol, at least one
/// year or year range, then the holder text to end of line. `.` stops at the
/// newline, so no trailing anchor is needed on lines that keep their `\n`.
static COPYRIGHT_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"(?i)copyright\s*(?:\(c\)|©)?\s+((?:\d{4}(?:\s*-\s*\d{4})?[,;]?\s*)+)(.*)")
    .expect("copyright regex must compile")
});

/// A single year or an inclusive year range inside the years field.
static YEAR_SPAN_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"(\d{4})(?:\s*-\s*(\d{4}))?").expect("year span regex must compile"));

/// Number of preamble lines (shebang, encoding/declaration comments) to skip
/// before header detection starts, per the file's syntax descriptor.
///
/// Returns 0 when the syntax does not allow a preamble.
pub fn skip_preamble(lines: &[&str], syntax: &SyntaxDescriptor) -> usize {
  if !syntax.allow_shebang {
    return 0;
  }

  let mut index = 0;

  if lines.first().is_some_and(|line| line.starts_with("#!")) {
    index = 1;
  }

  while lines.get(index).is_some_and(|line| PREAMBLE_RE.is_match(line)) {
    index += 1;
  }

  index
}

/// Scan a file's lines for an existing header region.
///
/// The algorithm follows the file's comment syntax: after skipping any
/// allowed preamble, a block comment opened on the first candidate line is
/// scanned to its closing token (block is primary when both forms exist);
/// otherwise a contiguous run of line comments is accumulated. Either scan is
/// capped at `max_lines` — an unclosed block within the cap is treated as
/// unmatched rather than an error.
///
/// The captured candidate only counts as a header if at least one of its
/// lines matches `marker` (which callers compile case-insensitively). A
/// candidate without a marker hit is ordinary leading commentary: the region
/// boundaries are discarded so rewrites leave it untouched.
pub fn match_header(lines: &[&str], syntax: &SyntaxDescriptor, marker: &Regex, max_lines: usize) -> HeaderRegion {
  let start = skip_preamble(lines, syntax);
  if start >= lines.len() || max_lines == 0 {
    return HeaderRegion::unmatched();
  }

  let candidate = find_candidate(lines, start, syntax, max_lines);
  let Some((region_start, region_end)) = candidate else {
    return HeaderRegion::unmatched();
  };

  let region_lines = &lines[region_start..region_end];
  if !region_lines.iter().any(|line| marker.is_match(line)) {
    return HeaderRegion::unmatched();
  }

  let (years, holders) = extract_metadata(region_lines, syntax);

  HeaderRegion {
    start_line: region_start,
    end_line: region_end,
    matched: true,
    years,
    holders,
  }
}

/// Locate the candidate comment region starting at `start`, or `None` when
/// the first line opens no comment or a block comment never closes within
/// the cap.
fn find_candidate(lines: &[&str], start: usize, syntax: &SyntaxDescriptor, max_lines: usize) -> Option<(usize, usize)> {
  let limit = lines.len().min(start + max_lines);
  let first = lines[start].trim_start();

  if let Some((open, close)) = &syntax.block_comment
    && first.starts_with(open.as_str())
  {
    for index in start..limit {
      let haystack = if index == start {
        // Skip past the opening token so `/*` does not satisfy a `*/` search
        let offset = lines[start].find(open.as_str()).unwrap_or(0) + open.len();
        &lines[start][offset..]
      } else {
        lines[index]
      };

      if haystack.contains(close.as_str()) {
        return Some((start, index + 1));
      }
    }
    // Unclosed within the cap: malformed header, defensively ignored
    return None;
  }

  if let Some(token) = &syntax.line_comment {
    let mut end = start;
    while end < limit && lines[end].trim_start().starts_with(token.as_str()) {
      end += 1;
    }
    if end > start {
      return Some((start, end));
    }
  }

  None
}

/// Best-effort extraction of years and holders from a recognized header.
///
/// Each line carrying a copyright notice contributes its years and one
/// holder (the text after the years). Lines without a notice, and notices
/// without a holder, contribute nothing.
fn extract_metadata(region_lines: &[&str], syntax: &SyntaxDescriptor) -> (BTreeSet<u32>, IndexSet<String>) {
  let mut years = BTreeSet::new();
  let mut holders = IndexSet::new();

  let block_close = syntax.block_comment.as_ref().map(|(_, close)| close.as_str());

  for line in region_lines {
    let Some(caps) = COPYRIGHT_LINE_RE.captures(line) else {
      continue;
    };

    for span in YEAR_SPAN_RE.captures_iter(&caps[1]) {
      let Ok(first) = span[1].parse::<u32>() else { continue };
      let last = span.get(2).and_then(|m| m.as_str().parse::<u32>().ok()).unwrap_or(first);
      for year in first..=last.max(first) {
        years.insert(year);
      }
    }

    let mut holder = caps[2].trim();
    if let Some(close) = block_close {
      holder = holder.strip_suffix(close).map_or(holder, str::trim_end);
    }

    if !holder.is_empty() {
      holders.insert(holder.to_string());
    }
  }

  (years, holders)
}
