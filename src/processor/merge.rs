//! # Header Merger Module
//!
//! Combines metadata extracted from an existing header with the metadata
//! requested on the command line into the final render context for a file.
//!
//! The merge is strictly additive: holders and years are only ever unioned,
//! never removed, so re-running the tool over an already-stamped tree is
//! idempotent with respect to present metadata.

use thiserror::Error;

use crate::processor::matcher::HeaderRegion;
use crate::template::HeaderContext;

/// Error returned when a merge cannot produce a usable context.
#[derive(Debug, Error)]
pub enum MergeError {
  /// Neither the command line nor the existing header supplied any year.
  /// Years are never invented here; the caller decides how to surface this.
  #[error("no copyright years available: none requested and none found in the existing header")]
  MissingYears,
}

/// Merge existing extracted metadata with the requested context.
///
/// Holders are the ordered union of the existing holders followed by the
/// requested ones, deduplicated by exact string equality with first-seen
/// order winning. Years are the union of both sets; when the request carries
/// no years the existing ones are kept as-is.
///
/// # Errors
///
/// Returns [`MergeError::MissingYears`] when both year sets are empty.
pub fn merge(existing: &HeaderRegion, requested: &HeaderContext) -> Result<HeaderContext, MergeError> {
  let mut holders = existing.holders.clone();
  for holder in &requested.holders {
    holders.insert(holder.clone());
  }

  let mut years = existing.years.clone();
  years.extend(requested.years.iter().copied());

  if years.is_empty() {
    return Err(MergeError::MissingYears);
  }

  Ok(HeaderContext {
    software: requested.software.clone(),
    description: requested.description.clone(),
    holders,
    years,
    word_wrap: requested.word_wrap,
  })
}
