//! # Template Module
//!
//! This module renders license header templates into raw (uncommented) header
//! lines, and decorates those lines with the comment syntax of a target file
//! type.
//!
//! Rendering is plain placeholder substitution followed by word wrapping:
//!
//! - `{{software}}` - the common name of the software
//! - `{{description}}` - the one-line description of the software
//! - `{{years}}` - the copyright years, consecutive runs collapsed to ranges
//! - `{{holders}}` - all copyright holders joined with commas
//! - `{{copyright}}` - one `Copyright (C) <years> <holder>` line per holder
//!
//! Lines produced by `{{copyright}}` are exempt from wrapping so that the
//! years and holder on each line survive re-extraction intact on later runs.
//!
//! Comment decoration is a separate step (see [`decorate`]) so the same
//! rendered header can be spliced into files of different types.

use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{Context, Result};
use indexmap::IndexSet;

use crate::syntax::SyntaxDescriptor;
use crate::verbose_log;

/// Data used to fill out a header template for one file.
///
/// Built once per file from the merged CLI options and any metadata extracted
/// from an existing header, then treated as immutable.
#[derive(Debug, Clone)]
pub struct HeaderContext {
  /// The common name for the software (e.g. "Copyright Header")
  pub software: String,

  /// The detailed description for the software
  pub description: String,

  /// Copyright holders, insertion order preserved, deduplicated
  pub holders: IndexSet<String>,

  /// Distinct copyright years, kept sorted
  pub years: BTreeSet<u32>,

  /// Maximum characters per rendered line
  pub word_wrap: usize,
}

impl HeaderContext {
  /// The year set collapsed for display, e.g. `2012-2014, 2016`.
  pub fn years_display(&self) -> String {
    collapse_years(&self.years)
  }

  /// All holders joined with commas, in insertion order.
  pub fn holders_display(&self) -> String {
    self.holders.iter().cloned().collect::<Vec<_>>().join(", ")
  }
}

/// A license header template with named placeholders.
#[derive(Debug)]
pub struct HeaderTemplate {
  source: String,
}

impl HeaderTemplate {
  /// Create a template from an already-loaded source string.
  pub const fn new(source: String) -> Self {
    Self { source }
  }

  /// Load a template from a file.
  ///
  /// # Errors
  ///
  /// Returns an error if the file does not exist, cannot be read, or is not
  /// valid UTF-8.
  pub fn from_file(path: &Path) -> Result<Self> {
    verbose_log!("Loading license template from: {}", path.display());

    let source = std::fs::read_to_string(path)
      .with_context(|| format!("Failed to read license file: {}", path.display()))?;

    Ok(Self::new(source))
  }

  /// Look up one of the shipped license templates by name.
  pub fn builtin(name: &str) -> Option<Self> {
    let source = match name {
      "GPL3" => licenses::GPL3,
      "MIT" => licenses::MIT,
      "APACHE2" => licenses::APACHE2,
      "BSD-3-CLAUSE" => licenses::BSD_3_CLAUSE,
      _ => return None,
    };
    Some(Self::new(source.to_string()))
  }

  /// Names accepted by [`builtin`](Self::builtin).
  pub const fn builtin_names() -> &'static [&'static str] {
    &["GPL3", "MIT", "APACHE2", "BSD-3-CLAUSE"]
  }

  /// Render the template with the given context into raw header lines.
  ///
  /// Placeholders are substituted, `{{copyright}}` expands to one line per
  /// holder, and prose lines longer than `context.word_wrap` are wrapped at
  /// word boundaries. A single word longer than the wrap width occupies its
  /// own line uncut.
  pub fn render(&self, context: &HeaderContext) -> Vec<String> {
    let mut lines = Vec::new();

    for template_line in self.source.lines() {
      if template_line.contains("{{copyright}}") {
        lines.extend(copyright_lines(context));
        continue;
      }

      let substituted = template_line
        .replace("{{software}}", &context.software)
        .replace("{{description}}", &context.description)
        .replace("{{years}}", &context.years_display())
        .replace("{{holders}}", &context.holders_display());

      lines.extend(wrap_line(&substituted, context.word_wrap));
    }

    lines
  }
}

/// Expand the `{{copyright}}` placeholder: one notice line per holder, or a
/// bare year notice when no holder is known.
fn copyright_lines(context: &HeaderContext) -> Vec<String> {
  let years = context.years_display();

  if context.holders.is_empty() {
    return vec![format!("Copyright (C) {years}")];
  }

  context
    .holders
    .iter()
    .map(|holder| format!("Copyright (C) {years} {holder}"))
    .collect()
}

/// Collapse a sorted set of years into range notation.
///
/// Runs of consecutive years render as `start-end`, singletons render
/// individually, and mixed runs join with commas:
/// `{2012, 2013, 2014, 2016}` becomes `2012-2014, 2016`.
pub fn collapse_years(years: &BTreeSet<u32>) -> String {
  let mut parts: Vec<String> = Vec::new();
  let mut iter = years.iter().copied().peekable();

  while let Some(start) = iter.next() {
    let mut end = start;
    while iter.peek() == Some(&(end + 1)) {
      end = iter.next().unwrap_or(end);
    }

    if end > start {
      parts.push(format!("{start}-{end}"));
    } else {
      parts.push(start.to_string());
    }
  }

  parts.join(", ")
}

/// Wrap a line at word boundaries to at most `width` characters.
///
/// Lines already within the width are returned untouched, internal spacing
/// included. A word longer than the width is never split.
fn wrap_line(line: &str, width: usize) -> Vec<String> {
  if line.chars().count() <= width {
    return vec![line.to_string()];
  }

  let mut wrapped = Vec::new();
  let mut current = String::new();

  for word in line.split_whitespace() {
    if current.is_empty() {
      current.push_str(word);
      continue;
    }

    if current.chars().count() + 1 + word.chars().count() <= width {
      current.push(' ');
      current.push_str(word);
    } else {
      wrapped.push(std::mem::take(&mut current));
      current.push_str(word);
    }
  }

  if !current.is_empty() {
    wrapped.push(current);
  }

  wrapped
}

/// Decorate raw header lines with the comment syntax of a file type.
///
/// Block syntax produces the opening token on its own line, the body indented
/// by one space, and the closing token on its own line. Line syntax prefixes
/// every line with the comment token; blank body lines become the bare token.
/// Block is primary when a descriptor carries both forms.
pub fn decorate(lines: &[String], syntax: &SyntaxDescriptor) -> Vec<String> {
  if let Some((open, close)) = &syntax.block_comment {
    let mut decorated = Vec::with_capacity(lines.len() + 2);
    decorated.push(open.clone());
    for line in lines {
      if line.is_empty() {
        decorated.push(String::new());
      } else {
        decorated.push(format!(" {line}"));
      }
    }
    decorated.push(close.clone());
    return decorated;
  }

  if let Some(token) = &syntax.line_comment {
    return lines
      .iter()
      .map(|line| {
        if line.is_empty() {
          token.clone()
        } else {
          format!("{token} {line}")
        }
      })
      .collect();
  }

  // Descriptors are validated on construction, but render something sane
  // rather than panic if both forms are absent
  lines.to_vec()
}

/// The license templates shipped with the tool.
mod licenses {
  pub const GPL3: &str = "\
{{software}} - {{description}}
{{copyright}}

This file is part of {{software}}.

{{software}} is free software: you can redistribute it and/or modify it under the terms of the GNU General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.

{{software}} is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.

You should have received a copy of the GNU General Public License along with {{software}}. If not, see <http://www.gnu.org/licenses/>.
";

  pub const MIT: &str = "\
{{software}} - {{description}}
{{copyright}}

Permission is hereby granted, free of charge, to any person obtaining a copy of this software and associated documentation files (the \"Software\"), to deal in the Software without restriction, including without limitation the rights to use, copy, modify, merge, publish, distribute, sublicense, and/or sell copies of the Software, and to permit persons to whom the Software is furnished to do so, subject to the following conditions:

The above copyright notice and this permission notice shall be included in all copies or substantial portions of the Software.

THE SOFTWARE IS PROVIDED \"AS IS\", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.
";

  pub const APACHE2: &str = "\
{{software}} - {{description}}
{{copyright}}

Licensed under the Apache License, Version 2.0 (the \"License\"); you may not use this file except in compliance with the License. You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software distributed under the License is distributed on an \"AS IS\" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied. See the License for the specific language governing permissions and limitations under the License.
";

  pub const BSD_3_CLAUSE: &str = "\
{{software}} - {{description}}
{{copyright}}
All rights reserved.

Redistribution and use in source and binary forms, with or without modification, are permitted provided that the following conditions are met:

1. Redistributions of source code must retain the above copyright notice, this list of conditions and the following disclaimer.

2. Redistributions in binary form must reproduce the above copyright notice, this list of conditions and the following disclaimer in the documentation and/or other materials provided with the distribution.

3. Neither the name of the copyright holder nor the names of its contributors may be used to endorse or promote products derived from this software without specific prior written permission.

THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS \"AS IS\" AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE ARE DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE LIABLE FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR CONSEQUENTIAL DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS OR SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS INTERRUPTION) HOWEVER CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN CONTRACT, STRICT LIABILITY, OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE USE OF THIS SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.
";
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::syntax::SyntaxDescriptor;

  fn context(years: &[u32], holders: &[&str]) -> HeaderContext {
    HeaderContext {
      software: "Tool".to_string(),
      description: "A test tool".to_string(),
      holders: holders.iter().map(|h| h.to_string()).collect(),
      years: years.iter().copied().collect(),
      word_wrap: 80,
    }
  }

  #[test]
  fn test_collapse_years_mixed_runs() {
    let years: BTreeSet<u32> = [2012, 2013, 2014, 2016].into_iter().collect();
    assert_eq!(collapse_years(&years), "2012-2014, 2016");
  }

  #[test]
  fn test_collapse_years_singleton() {
    let years: BTreeSet<u32> = [2020].into_iter().collect();
    assert_eq!(collapse_years(&years), "2020");
  }

  #[test]
  fn test_collapse_years_disjoint_singletons() {
    let years: BTreeSet<u32> = [2012, 2014].into_iter().collect();
    assert_eq!(collapse_years(&years), "2012, 2014");
  }

  #[test]
  fn test_collapse_years_single_run() {
    let years: BTreeSet<u32> = [2019, 2020, 2021].into_iter().collect();
    assert_eq!(collapse_years(&years), "2019-2021");
  }

  #[test]
  fn test_render_substitutes_placeholders() {
    let template = HeaderTemplate::new("{{software}} - {{description}}\nBy {{holders}}, {{years}}".to_string());
    let lines = template.render(&context(&[2016], &["Erik"]));

    assert_eq!(lines, vec!["Tool - A test tool".to_string(), "By Erik, 2016".to_string()]);
  }

  #[test]
  fn test_render_copyright_line_per_holder() {
    let template = HeaderTemplate::new("{{copyright}}".to_string());
    let lines = template.render(&context(&[2012, 2013], &["Alice", "Bob <bob@example.com>"]));

    assert_eq!(
      lines,
      vec![
        "Copyright (C) 2012-2013 Alice".to_string(),
        "Copyright (C) 2012-2013 Bob <bob@example.com>".to_string(),
      ]
    );
  }

  #[test]
  fn test_render_copyright_without_holders() {
    let template = HeaderTemplate::new("{{copyright}}".to_string());
    let lines = template.render(&context(&[2020], &[]));

    assert_eq!(lines, vec!["Copyright (C) 2020".to_string()]);
  }

  #[test]
  fn test_word_wrap_bound() {
    let description = "word ".repeat(40);
    let mut ctx = context(&[2020], &["A"]);
    ctx.description = description.trim_end().to_string();
    ctx.word_wrap = 40;

    let template = HeaderTemplate::new("{{description}}".to_string());
    let lines = template.render(&ctx);

    assert!(lines.len() > 1);
    for line in &lines {
      assert!(line.chars().count() <= 40, "line exceeds wrap width: {line:?}");
    }
  }

  #[test]
  fn test_word_wrap_never_splits_a_word() {
    let mut ctx = context(&[2020], &["A"]);
    ctx.word_wrap = 10;
    let long_word = "a".repeat(25);
    ctx.description = format!("tiny {long_word} words");

    let template = HeaderTemplate::new("{{description}}".to_string());
    let lines = template.render(&ctx);

    // The unsplittable word occupies its own (overlong) line, everything else
    // respects the width
    assert!(lines.contains(&long_word));
    for line in lines.iter().filter(|l| **l != long_word) {
      assert!(line.chars().count() <= 10);
    }
  }

  #[test]
  fn test_short_lines_keep_internal_spacing() {
    let template = HeaderTemplate::new("    indented  line".to_string());
    let lines = template.render(&context(&[2020], &["A"]));
    assert_eq!(lines, vec!["    indented  line".to_string()]);
  }

  #[test]
  fn test_decorate_line_syntax() {
    let syntax = SyntaxDescriptor::line_with_shebang("#");
    let raw = vec!["Copyright (C) 2020 A".to_string(), String::new(), "More".to_string()];
    let decorated = decorate(&raw, &syntax);

    assert_eq!(
      decorated,
      vec!["# Copyright (C) 2020 A".to_string(), "#".to_string(), "# More".to_string()]
    );
  }

  #[test]
  fn test_decorate_block_syntax() {
    let syntax = SyntaxDescriptor::block("/*", "*/");
    let raw = vec!["Copyright (C) 2020 A".to_string()];
    let decorated = decorate(&raw, &syntax);

    assert_eq!(
      decorated,
      vec!["/*".to_string(), " Copyright (C) 2020 A".to_string(), "*/".to_string()]
    );
  }

  #[test]
  fn test_decorate_block_primary_when_both_present() {
    let mut syntax = SyntaxDescriptor::block("<!--", "-->");
    syntax.line_comment = Some("//".to_string());

    let decorated = decorate(&["x".to_string()], &syntax);
    assert_eq!(decorated[0], "<!--");
  }

  #[test]
  fn test_builtin_templates_exist() {
    for name in HeaderTemplate::builtin_names() {
      assert!(HeaderTemplate::builtin(name).is_some(), "missing builtin {name}");
    }
    assert!(HeaderTemplate::builtin("NOPE").is_none());
  }

  #[test]
  fn test_builtin_mit_renders_within_wrap_width() {
    let template = HeaderTemplate::builtin("MIT").unwrap();
    let lines = template.render(&context(&[2016], &["Erik Osterman <e@osterman.com>"]));

    assert!(lines.iter().any(|l| l.contains("Permission is hereby granted")));
    for line in &lines {
      assert!(line.chars().count() <= 80, "line exceeds 80 columns: {line:?}");
    }
  }
}
