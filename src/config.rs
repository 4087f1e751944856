//! # Configuration Module
//!
//! This module loads the optional syntax configuration file passed via
//! `--syntax`. The file extends or overrides the builtin syntax registry with
//! user-defined comment styles for extensions and exact basenames.
//!
//! Example:
//!
//! ```toml
//! [extensions.fancy]
//! block = ["/*", "*/"]
//!
//! [extensions.conf]
//! line = "#"
//! shebang = true
//!
//! [basenames.Justfile]
//! line = "#"
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::syntax::{SyntaxDescriptor, SyntaxRegistry};
use crate::verbose_log;

/// User-defined comment syntax for one extension or basename.
///
/// At least one of `line` and `block` must be present; `block` must name
/// exactly the opening and closing tokens.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SyntaxOverride {
  /// Token that starts a line comment (e.g. `//` or `#`)
  #[serde(default)]
  pub line: Option<String>,

  /// Opening and closing tokens of a block comment, in order
  #[serde(default)]
  pub block: Option<Vec<String>>,

  /// Whether a shebang/encoding preamble may precede the header
  #[serde(default)]
  pub shebang: bool,
}

impl SyntaxOverride {
  fn into_descriptor(self) -> SyntaxDescriptor {
    let block_comment = self
      .block
      .map(|pair| (pair[0].clone(), pair[1].clone()));

    SyntaxDescriptor {
      line_comment: self.line,
      block_comment,
      allow_shebang: self.shebang,
    }
  }
}

/// Syntax configuration loaded from a TOML file.
#[derive(Debug, Default, Deserialize)]
pub struct SyntaxConfig {
  /// Overrides keyed by file extension without the leading dot
  #[serde(default)]
  pub extensions: HashMap<String, SyntaxOverride>,

  /// Overrides keyed by exact basename (e.g. `Justfile`)
  #[serde(default)]
  pub basenames: HashMap<String, SyntaxOverride>,
}

/// Error type for configuration operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  /// The config file could not be read.
  #[error("Failed to read syntax file '{path}': {source}")]
  ReadError { path: PathBuf, source: std::io::Error },

  /// The config file contains invalid TOML.
  #[error("Failed to parse syntax file '{path}': {source}")]
  ParseError { path: PathBuf, source: toml::de::Error },

  /// A syntax override is invalid.
  #[error("Invalid syntax override for '{key}': {message}")]
  InvalidOverride { key: String, message: String },
}

impl SyntaxConfig {
  /// Load a syntax configuration from a TOML file.
  ///
  /// # Errors
  ///
  /// Returns an error if the file cannot be read, is not valid TOML, or
  /// contains an invalid override.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    verbose_log!("Loading syntax configuration from: {}", path.display());

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
      path: path.to_path_buf(),
      source: e,
    })?;

    let config: SyntaxConfig = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
      path: path.to_path_buf(),
      source: e,
    })?;

    config.validate()?;

    verbose_log!(
      "Loaded {} extension and {} basename syntax overrides",
      config.extensions.len(),
      config.basenames.len()
    );

    Ok(config)
  }

  /// Validate the configuration.
  ///
  /// Checks that every override carries a usable comment form, that block
  /// overrides name exactly two tokens, and that extension keys do not
  /// include the leading dot.
  fn validate(&self) -> Result<(), ConfigError> {
    for (key, override_) in self.extensions.iter().chain(self.basenames.iter()) {
      if override_.line.is_none() && override_.block.is_none() {
        return Err(ConfigError::InvalidOverride {
          key: key.clone(),
          message: "must define 'line' and/or 'block'".to_string(),
        });
      }

      if let Some(ref tokens) = override_.block
        && tokens.len() != 2
      {
        return Err(ConfigError::InvalidOverride {
          key: key.clone(),
          message: format!("'block' must list exactly [open, close], got {} entries", tokens.len()),
        });
      }

      if let Some(ref token) = override_.line
        && token.is_empty()
      {
        return Err(ConfigError::InvalidOverride {
          key: key.clone(),
          message: "'line' token cannot be empty".to_string(),
        });
      }
    }

    for key in self.extensions.keys() {
      if key.starts_with('.') {
        return Err(ConfigError::InvalidOverride {
          key: key.clone(),
          message: "extension should not include leading dot".to_string(),
        });
      }
    }

    Ok(())
  }

  /// Apply the overrides on top of a registry.
  pub fn apply(self, registry: &mut SyntaxRegistry) {
    for (extension, override_) in self.extensions {
      registry.insert_extension(&extension, override_.into_descriptor());
    }
    for (basename, override_) in self.basenames {
      registry.insert_basename(&basename, override_.into_descriptor());
    }
  }
}
