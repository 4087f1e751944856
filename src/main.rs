//! # copyright-header
//!
//! A tool that manipulates copyright headers on source code files.

use anyhow::Result;

use copyright_header::cli::{Cli, run};

fn main() -> Result<()> {
  let cli = Cli::parse_args();
  run(cli)
}
