//! # CLI Module
//!
//! Command-line interface for the copyright-header tool. Argument parsing
//! uses clap; option validation (missing or ambiguous combinations) happens
//! here, before any file is touched, so a bad invocation can never leave a
//! tree half-rewritten.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use clap::builder::styling::{AnsiColor, Color, Style, Styles};
use thiserror::Error;
use tracing::debug;

use crate::config::SyntaxConfig;
use crate::logging::{ColorMode, init_tracing, set_quiet, set_verbose};
use crate::output::{
  print_all_files_ok, print_blank_line, print_dry_run_banner, print_error_files, print_result_lists,
  print_start_message, print_summary,
};
use crate::processor::{FileProcessor, Operation, ProcessorOptions, WriteMode};
use crate::report::{FileResult, RunSummary, write_json_report};
use crate::syntax::{ShebangGuesser, SyntaxRegistry};
use crate::template::{HeaderContext, HeaderTemplate};
use crate::walker::TreeWalker;

const CUSTOM_STYLES: Styles = Styles::styled()
  .header(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))).bold())
  .usage(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))).bold())
  .literal(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Blue))).bold())
  .placeholder(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Cyan))))
  .error(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Red))).bold())
  .valid(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))))
  .invalid(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Yellow))));

/// Command-line arguments
#[derive(Parser, Debug, Default)]
#[command(
  author,
  version,
  about,
  styles = CUSTOM_STYLES,
  after_help = "Examples:
  # Preview the headers that would be added, without writing anything
  copyright-header --dry-run --license MIT \\
    --copyright-software Tool --copyright-software-description \"A tool\" \\
    --copyright-holder \"Erik Osterman <e@osterman.com>\" --copyright-year 2016 \\
    --add-path src/

  # Stamp a tree in place with a custom header template
  copyright-header --license-file HEADER.txt --copyright-year 2016 --add-path src/ --add-path include/

  # Write transformed copies below ./out instead of modifying in place
  copyright-header --license MIT --output-dir out \\
    --copyright-software Tool --copyright-software-description \"A tool\" \\
    --copyright-holder Erik --copyright-year 2016 --add-path src/

  # Strip recognized headers from a tree
  copyright-header --remove-path src/

  # Skip vendored code and generated files
  copyright-header --license-file HEADER.txt --copyright-year 2016 \\
    --ignore \"**/vendor/**\" --ignore \"*.min.js\" --add-path .
",
  help_template = "{before-help}{name} v{version}
{about-section}
{usage-heading} {usage}

{all-args}{after-help}
"
)]
pub struct Cli {
  /// Output the transformed files to stdout instead of writing them
  #[arg(short = 'n', long)]
  pub dry_run: bool,

  /// Write results under DIR, mirroring each file's relative path
  #[arg(short = 'o', long, value_name = "DIR", conflicts_with = "dry_run")]
  pub output_dir: Option<PathBuf>,

  /// Use FILE as the header template (instead of --license)
  #[arg(long, value_name = "FILE")]
  pub license_file: Option<PathBuf>,

  /// Use one of the shipped license templates (GPL3, MIT, APACHE2, BSD-3-CLAUSE)
  #[arg(long, value_name = "NAME")]
  pub license: Option<String>,

  /// The common name for this piece of software (e.g. "Copyright Header")
  #[arg(long, value_name = "NAME")]
  pub copyright_software: Option<String>,

  /// The detailed description for this piece of software
  #[arg(long, value_name = "DESC")]
  pub copyright_software_description: Option<String>,

  /// The legal owner of the copyright. Repeat for multiple holders.
  #[arg(long = "copyright-holder", value_name = "NAME")]
  pub copyright_holders: Vec<String>,

  /// A year or year range ("2012", "2012-2016") the copyright exists for.
  /// Repeat for multiple years.
  #[arg(long = "copyright-year", value_name = "YEAR")]
  pub copyright_years: Vec<String>,

  /// Maximum number of characters per line for the header
  #[arg(short = 'w', long, value_name = "LEN", default_value_t = 80)]
  pub word_wrap: usize,

  /// Number of leading lines searched for an existing header
  #[arg(long, value_name = "LEN", default_value_t = 20)]
  pub marker_length: usize,

  /// Regex deciding whether a leading comment block is a header
  #[arg(long, value_name = "REGEX", default_value = "[Cc]opyright|[Ll]icense")]
  pub marker: String,

  /// Recursively insert headers in all files found in PATH. Repeatable.
  #[arg(short = 'a', long = "add-path", value_name = "PATH")]
  pub add_paths: Vec<PathBuf>,

  /// Recursively remove headers in all files found in PATH. Repeatable.
  #[arg(short = 'r', long = "remove-path", value_name = "PATH")]
  pub remove_paths: Vec<PathBuf>,

  /// Guess the file type from its shebang line when the extension is unknown
  #[arg(short = 'g', long)]
  pub guess_extension: bool,

  /// Syntax configuration file extending the builtin comment-style table
  #[arg(short = 'c', long, value_name = "FILE")]
  pub syntax: Option<PathBuf>,

  /// File patterns to ignore (supports glob patterns). Repeatable.
  #[arg(short = 'i', long, value_name = "PATTERN")]
  pub ignore: Vec<String>,

  /// Write a machine-readable JSON report of the run to FILE
  #[arg(long, value_name = "FILE")]
  pub report_json: Option<PathBuf>,

  /// Increase verbosity (-v info, -vv debug, -vvv trace)
  #[arg(short, long, action = clap::ArgAction::Count)]
  pub verbose: u8,

  /// Suppress all output except errors
  #[arg(short, long, conflicts_with = "verbose")]
  pub quiet: bool,

  /// Control when to use colored output (auto, never, always)
  #[arg(
    long,
    value_name = "WHEN",
    num_args = 0..=1,
    default_value_t = ColorMode::Auto,
    default_missing_value = "always",
    value_enum
  )]
  pub colors: ColorMode,
}

impl std::fmt::Display for ColorMode {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let name = match self {
      ColorMode::Auto => "auto",
      ColorMode::Never => "never",
      ColorMode::Always => "always",
    };
    write!(f, "{name}")
  }
}

/// Errors detected while validating the command line.
#[derive(Debug, Error)]
pub enum CliError {
  #[error("Missing argument: {0}")]
  MissingArgument(String),

  #[error("Ambiguous arguments: {0}")]
  AmbiguousArguments(String),

  #[error("Invalid argument: {0}")]
  InvalidArgument(String),
}

impl Cli {
  /// Parse CLI arguments and return the Cli struct
  pub fn parse_args() -> Self {
    Self::parse()
  }

  /// Validate argument combinations before any file is touched.
  pub fn validate(&self) -> Result<(), CliError> {
    if self.add_paths.is_empty() && self.remove_paths.is_empty() {
      return Err(CliError::MissingArgument("--add-path or --remove-path".to_string()));
    }

    if self.license.is_some() && self.license_file.is_some() {
      return Err(CliError::AmbiguousArguments(
        "Cannot pass both --license and --license-file".to_string(),
      ));
    }

    if !self.add_paths.is_empty() && self.license.is_none() && self.license_file.is_none() {
      return Err(CliError::MissingArgument("--license or --license-file".to_string()));
    }

    if let Some(ref name) = self.license {
      if HeaderTemplate::builtin(name).is_none() {
        return Err(CliError::InvalidArgument(format!(
          "Unknown license '{}', expected one of: {}",
          name,
          HeaderTemplate::builtin_names().join(", ")
        )));
      }

      // The shipped templates reference all of these placeholders, so demand
      // them up front rather than render half-empty headers
      if self.copyright_software.is_none() {
        return Err(CliError::MissingArgument("--copyright-software".to_string()));
      }
      if self.copyright_software_description.is_none() {
        return Err(CliError::MissingArgument("--copyright-software-description".to_string()));
      }
      if self.copyright_holders.is_empty() {
        return Err(CliError::MissingArgument("--copyright-holder".to_string()));
      }
      if self.copyright_years.is_empty() {
        return Err(CliError::MissingArgument("--copyright-year".to_string()));
      }
    }

    if self.word_wrap == 0 {
      return Err(CliError::InvalidArgument("--word-wrap must be greater than zero".to_string()));
    }
    if self.marker_length == 0 {
      return Err(CliError::InvalidArgument(
        "--marker-length must be greater than zero".to_string(),
      ));
    }

    parse_years(&self.copyright_years).map(|_| ())
  }
}

/// Parse year specs ("2012", "2012-2016") into a distinct sorted set.
fn parse_years(specs: &[String]) -> Result<BTreeSet<u32>, CliError> {
  let mut years = BTreeSet::new();

  for spec in specs {
    let invalid = || CliError::InvalidArgument(format!("Invalid --copyright-year '{spec}'"));

    if let Some((first, last)) = spec.split_once('-') {
      let first: u32 = first.trim().parse().map_err(|_| invalid())?;
      let last: u32 = last.trim().parse().map_err(|_| invalid())?;
      if last < first {
        return Err(invalid());
      }
      years.extend(first..=last);
    } else {
      years.insert(spec.trim().parse().map_err(|_| invalid())?);
    }
  }

  Ok(years)
}

/// Run the tool with the given arguments.
pub fn run(cli: Cli) -> Result<()> {
  init_tracing(cli.quiet, cli.verbose);

  if cli.verbose > 0 {
    set_verbose();
  } else if cli.quiet {
    set_quiet();
  }
  cli.colors.apply();

  if let Err(e) = cli.validate() {
    eprintln!("ERROR: {e}");
    process::exit(1);
  }

  let mut registry = SyntaxRegistry::builtin();
  if let Some(ref syntax_path) = cli.syntax {
    let config = SyntaxConfig::load(syntax_path)?;
    config.apply(&mut registry);
  }

  let template = match (&cli.license, &cli.license_file) {
    // Validation guarantees the name is known
    (Some(name), _) => HeaderTemplate::builtin(name)
      .with_context(|| format!("Unknown license '{name}'"))?,
    (None, Some(path)) => HeaderTemplate::from_file(path)?,
    // Remove-only runs render nothing
    (None, None) => HeaderTemplate::new(String::new()),
  };

  let years = parse_years(&cli.copyright_years)?;

  let requested = HeaderContext {
    software: cli.copyright_software.clone().unwrap_or_default(),
    description: cli.copyright_software_description.clone().unwrap_or_default(),
    holders: cli.copyright_holders.iter().cloned().collect(),
    years,
    word_wrap: cli.word_wrap,
  };

  let write_mode = if cli.dry_run {
    WriteMode::DryRun
  } else if let Some(ref output_dir) = cli.output_dir {
    WriteMode::OutputDir(output_dir.clone())
  } else {
    WriteMode::InPlace
  };

  // In dry-run mode stdout carries file content, so status goes to stderr
  let status_to_stderr = cli.dry_run;
  if cli.dry_run {
    print_dry_run_banner();
  }

  let processor = FileProcessor::new(ProcessorOptions {
    registry,
    template,
    requested,
    marker: cli.marker.clone(),
    marker_length: cli.marker_length,
    write_mode,
    guesser: cli.guess_extension.then(|| Box::new(ShebangGuesser) as Box<dyn crate::syntax::ExtensionGuesser>),
  })?;

  let walker = TreeWalker::new(&processor, &cli.ignore)?;

  let mut results: Vec<FileResult> = Vec::new();

  if !cli.add_paths.is_empty() {
    print_start_message(cli.add_paths.len(), Operation::Add, status_to_stderr);
    results.extend(walker.walk(&cli.add_paths, Operation::Add));
  }
  if !cli.remove_paths.is_empty() {
    print_start_message(cli.remove_paths.len(), Operation::Remove, status_to_stderr);
    results.extend(walker.walk(&cli.remove_paths, Operation::Remove));
  }

  let summary = RunSummary::from_results(&results);
  debug!("Run complete: {} files seen", summary.total());

  print_blank_line(status_to_stderr);
  let nothing_changed = summary.added == 0 && summary.replaced == 0 && summary.removed == 0;
  if nothing_changed && !summary.has_failures() {
    print_all_files_ok(status_to_stderr);
  } else {
    print_result_lists(&results, base_for_display(&cli), status_to_stderr);
  }
  print_error_files(&results, base_for_display(&cli));

  print_blank_line(status_to_stderr);
  print_summary(&summary, status_to_stderr);

  if let Some(ref report_path) = cli.report_json {
    write_json_report(report_path, &results, &summary)?;
    crate::info_log!("Wrote JSON report to {}", report_path.display());
  }

  if summary.has_failures() {
    process::exit(1);
  }

  Ok(())
}

/// Base directory for relative path display: the sole path argument when
/// there is exactly one, otherwise the current directory.
fn base_for_display(cli: &Cli) -> Option<&std::path::Path> {
  let mut paths = cli.add_paths.iter().chain(cli.remove_paths.iter());
  match (paths.next(), paths.next()) {
    (Some(only), None) if only.is_dir() => Some(only.as_path()),
    _ => None,
  }
}
