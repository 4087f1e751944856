//! # Syntax Module
//!
//! This module maps file extensions and basenames to comment-syntax
//! descriptors. A descriptor tells the rest of the engine how a header
//! comment looks for a given file type: the line-comment token, the
//! block-comment delimiters, and whether a shebang/encoding preamble may
//! precede the header.
//!
//! The registry is a pure lookup structure. Extension matches take precedence
//! over basename matches, and both are case-sensitive. Extension guessing for
//! files the registry does not know is a separate, pluggable concern (see
//! [`ExtensionGuesser`]).

use std::collections::HashMap;

use thiserror::Error;

/// Comment-syntax rules for one family of file types.
///
/// A descriptor may carry a line-comment token, a block-comment delimiter
/// pair, or both. When both are present, the block form is primary: detection
/// tries the block opener first and rendering uses the block delimiters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxDescriptor {
  /// Token that starts a line comment (e.g. `//` or `#`)
  pub line_comment: Option<String>,

  /// Start and end tokens of a block comment (e.g. `/*` and `*/`)
  pub block_comment: Option<(String, String)>,

  /// Whether a shebang or encoding/declaration preamble may precede the
  /// header and must be preserved above it
  pub allow_shebang: bool,
}

impl SyntaxDescriptor {
  /// Create a line-comment descriptor.
  pub fn line(token: &str) -> Self {
    Self {
      line_comment: Some(token.to_string()),
      block_comment: None,
      allow_shebang: false,
    }
  }

  /// Create a line-comment descriptor for interpreter-run file types that may
  /// start with a shebang or encoding preamble.
  pub fn line_with_shebang(token: &str) -> Self {
    Self {
      line_comment: Some(token.to_string()),
      block_comment: None,
      allow_shebang: true,
    }
  }

  /// Create a block-comment descriptor.
  pub fn block(open: &str, close: &str) -> Self {
    Self {
      line_comment: None,
      block_comment: Some((open.to_string(), close.to_string())),
      allow_shebang: false,
    }
  }

  /// Create a block-comment descriptor that tolerates a leading declaration
  /// line (e.g. `<?xml ...?>`).
  pub fn block_with_preamble(open: &str, close: &str) -> Self {
    Self {
      line_comment: None,
      block_comment: Some((open.to_string(), close.to_string())),
      allow_shebang: true,
    }
  }
}

/// Error returned when no comment syntax is known for a file.
#[derive(Debug, Error)]
#[error("no comment syntax known for '{0}'")]
pub struct UnknownSyntax(pub String);

/// Registry of comment-syntax descriptors keyed by extension and basename.
///
/// Lookups never mutate the registry. The builtin table covers the common
/// source file types; a user-supplied syntax configuration file can extend or
/// override it (see the `config` module).
pub struct SyntaxRegistry {
  extensions: HashMap<String, SyntaxDescriptor>,
  basenames: HashMap<String, SyntaxDescriptor>,
}

impl Default for SyntaxRegistry {
  fn default() -> Self {
    Self::builtin()
  }
}

impl SyntaxRegistry {
  /// Create an empty registry with no descriptors.
  pub fn empty() -> Self {
    Self {
      extensions: HashMap::new(),
      basenames: HashMap::new(),
    }
  }

  /// Create a registry populated with the builtin descriptor table.
  pub fn builtin() -> Self {
    let mut registry = Self::empty();

    let c_block = SyntaxDescriptor::block("/*", "*/");
    for ext in ["c", "h", "java", "scala", "kt", "kts", "groovy", "css", "scss", "sass"] {
      registry.insert_extension(ext, c_block.clone());
    }

    let c_line = SyntaxDescriptor::line("//");
    for ext in [
      "rs", "go", "cc", "cpp", "cs", "hh", "hpp", "m", "mm", "proto", "swift", "dart", "v", "sv", "js", "mjs", "cjs",
      "jsx", "ts", "tsx", "php",
    ] {
      registry.insert_extension(ext, c_line.clone());
    }

    let hash_line = SyntaxDescriptor::line_with_shebang("#");
    for ext in ["py", "rb", "sh", "bash", "zsh", "pl", "pm", "tcl", "yaml", "yml", "toml", "tf", "bzl", "pp", "r"] {
      registry.insert_extension(ext, hash_line.clone());
    }

    let dash_line = SyntaxDescriptor::line("--");
    for ext in ["hs", "sql", "lua", "sdl"] {
      registry.insert_extension(ext, dash_line.clone());
    }

    registry.insert_extension("el", SyntaxDescriptor::line(";;"));
    registry.insert_extension("lisp", SyntaxDescriptor::line(";;"));
    registry.insert_extension("erl", SyntaxDescriptor::line("%"));
    registry.insert_extension("tex", SyntaxDescriptor::line("%"));
    registry.insert_extension("ml", SyntaxDescriptor::block("(*", "*)"));
    registry.insert_extension("mli", SyntaxDescriptor::block("(*", "*)"));

    let markup_block = SyntaxDescriptor::block_with_preamble("<!--", "-->");
    for ext in ["html", "htm", "xml", "xhtml", "svg", "vue", "md"] {
      registry.insert_extension(ext, markup_block.clone());
    }

    for name in ["Makefile", "makefile", "GNUmakefile", "Dockerfile", "Rakefile", "Gemfile", "CMakeLists.txt"] {
      registry.insert_basename(name, hash_line.clone());
    }

    registry
  }

  /// Register a descriptor for a file extension (without the leading dot).
  pub fn insert_extension(&mut self, extension: &str, descriptor: SyntaxDescriptor) {
    self.extensions.insert(extension.to_string(), descriptor);
  }

  /// Register a descriptor for an exact basename (e.g. `Makefile`).
  pub fn insert_basename(&mut self, basename: &str, descriptor: SyntaxDescriptor) {
    self.basenames.insert(basename.to_string(), descriptor);
  }

  /// Look up the descriptor for a filename.
  ///
  /// Matching is by exact extension first, then by full basename, both
  /// case-sensitive. The registry performs no guessing; callers that want a
  /// fallback consult an [`ExtensionGuesser`] and retry via
  /// [`lookup_extension`](Self::lookup_extension).
  ///
  /// # Errors
  ///
  /// Returns [`UnknownSyntax`] when neither the extension nor the basename is
  /// registered. Callers treat this as "skip file".
  pub fn lookup(&self, filename: &str) -> Result<&SyntaxDescriptor, UnknownSyntax> {
    if let Some(extension) = filename.rsplit_once('.').map(|(_, ext)| ext)
      && let Some(descriptor) = self.extensions.get(extension)
    {
      return Ok(descriptor);
    }

    self
      .basenames
      .get(filename)
      .ok_or_else(|| UnknownSyntax(filename.to_string()))
  }

  /// Look up a descriptor by bare extension, used for guessed fallbacks.
  pub fn lookup_extension(&self, extension: &str) -> Option<&SyntaxDescriptor> {
    self.extensions.get(extension)
  }
}

/// Trait for guessing a file extension when the registry has no match.
///
/// Implementations inspect the file content and propose an extension the
/// registry may know. The default [`ShebangGuesser`] reads the interpreter
/// from a `#!` line; richer linguistic detection can be plugged in without
/// touching the processor.
pub trait ExtensionGuesser: Send + Sync {
  /// Propose an extension (without the leading dot) for the given content, or
  /// `None` if no guess can be made.
  fn guess(&self, content: &str) -> Option<String>;
}

/// Guesses the extension from the interpreter named on a shebang line.
#[derive(Debug, Default)]
pub struct ShebangGuesser;

impl ExtensionGuesser for ShebangGuesser {
  fn guess(&self, content: &str) -> Option<String> {
    let first_line = content.lines().next()?;
    let interpreter_path = first_line.strip_prefix("#!")?.trim();

    let mut words = interpreter_path.split_whitespace();
    let mut interpreter = words.next()?.rsplit('/').next()?;

    // `#!/usr/bin/env python3` names the interpreter as the first argument
    if interpreter == "env" {
      interpreter = words.next()?;
    }

    // Strip a version suffix such as the "3" in "python3" or "3.11" in
    // "python3.11"
    let interpreter = interpreter.trim_end_matches(|c: char| c.is_ascii_digit() || c == '.');

    let extension = match interpreter {
      "python" => "py",
      "ruby" => "rb",
      "perl" => "pl",
      "node" | "nodejs" => "js",
      "bash" | "sh" | "zsh" | "ksh" | "dash" => "sh",
      "Rscript" => "r",
      "lua" => "lua",
      _ => return None,
    };

    Some(extension.to_string())
  }
}
