//! # copyright-header
//!
//! A tool that inserts, updates, and removes copyright/license header
//! comments across trees of source files, adapting comment syntax per file
//! type.
//!
//! The engine detects whether a file already carries a header, locates its
//! boundaries across dozens of comment syntaxes, extracts any existing
//! copyright metadata (years, holders), merges it additively with the
//! requested metadata, and rewrites the file byte-for-byte equivalent outside
//! the header region. Re-running over an already-stamped tree is a no-op.
//!
//! ## Features
//!
//! * Syntax-aware header detection for line and block comment styles
//! * Additive merge of copyright years and holders - metadata is never lost
//! * Shebang, encoding-comment, and XML-declaration preambles preserved
//! * Dry-run, output-directory, and in-place write modes
//! * Year ranges collapsed for display (`2012-2014, 2016`)
//! * Shipped license templates plus custom template files
//!
//! ## Usage as a Library
//!
//! ```rust,no_run
//! use std::path::{Path, PathBuf};
//!
//! use copyright_header::processor::{FileProcessor, Operation, ProcessorOptions, WriteMode};
//! use copyright_header::syntax::SyntaxRegistry;
//! use copyright_header::template::{HeaderContext, HeaderTemplate};
//! use copyright_header::walker::TreeWalker;
//!
//! fn main() -> anyhow::Result<()> {
//!     let processor = FileProcessor::new(ProcessorOptions {
//!         registry: SyntaxRegistry::builtin(),
//!         template: HeaderTemplate::builtin("MIT").expect("shipped template"),
//!         requested: HeaderContext {
//!             software: "Tool".to_string(),
//!             description: "A tool".to_string(),
//!             holders: ["Erik Osterman <e@osterman.com>".to_string()].into_iter().collect(),
//!             years: [2016].into_iter().collect(),
//!             word_wrap: 80,
//!         },
//!         marker: "[Cc]opyright|[Ll]icense".to_string(),
//!         marker_length: 20,
//!         write_mode: WriteMode::InPlace,
//!         guesser: None,
//!     })?;
//!
//!     let walker = TreeWalker::new(&processor, &[])?;
//!     let results = walker.walk(&[PathBuf::from("src")], Operation::Add);
//!
//!     for result in &results {
//!         println!("{}: {:?}", result.path.display(), result.action);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! * [`processor`] - per-file header matching, merging, splicing, and writing
//! * [`syntax`] - comment-syntax registry and extension guessing
//! * [`template`] - header rendering, word wrap, and comment decoration
//! * [`walker`] - deterministic file-tree traversal
//!
//! [`processor`]: crate::processor
//! [`syntax`]: crate::syntax
//! [`template`]: crate::template
//! [`walker`]: crate::walker

pub mod cli;
pub mod config;
pub mod logging;
pub mod output;
pub mod processor;
pub mod report;
pub mod syntax;
pub mod template;
pub mod walker;
