//! Per-run report.

use std::{collections::BTreeMap, fmt};

use ine_core::{fact::FactTable, source::SourceFamily};
use serde::Serialize;

use crate::mapper::SkipReason;

/// How processing of one source code ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SourceOutcome {
  /// Rows were mapped and handed to the store.
  Loaded,
  /// Fetched and mapped, but nothing survived the family rule.
  Empty,
  /// No family rule for this code.
  Unmapped,
  FetchFailed { error: String },
  StoreFailed { error: String },
}

impl SourceOutcome {
  pub fn is_ok(&self) -> bool { matches!(self, Self::Loaded | Self::Empty) }
}

impl fmt::Display for SourceOutcome {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Loaded | Self::Empty => f.write_str("ok"),
      Self::Unmapped => f.write_str("unmapped"),
      Self::FetchFailed { .. } => f.write_str("fetch failed"),
      Self::StoreFailed { .. } => f.write_str("store failed"),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceSummary {
  pub code:           String,
  pub family:         Option<SourceFamily>,
  pub table:          Option<FactTable>,
  pub outcome:        SourceOutcome,
  pub series_fetched: usize,
  pub rows_fetched:   usize,
  pub rows_mapped:    usize,
  pub skipped:        BTreeMap<SkipReason, usize>,
  pub inserted:       usize,
  pub ignored:        usize,
}

impl SourceSummary {
  pub fn new(code: impl Into<String>, outcome: SourceOutcome) -> Self {
    Self {
      code: code.into(),
      family: None,
      table: None,
      outcome,
      series_fetched: 0,
      rows_fetched: 0,
      rows_mapped: 0,
      skipped: BTreeMap::new(),
      inserted: 0,
      ignored: 0,
    }
  }

  pub fn rows_skipped(&self) -> usize { self.skipped.values().sum() }

  pub fn skipped_for(&self, reason: SkipReason) -> usize {
    self.skipped.get(&reason).copied().unwrap_or(0)
  }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
  pub sources: Vec<SourceSummary>,
}

impl RunSummary {
  pub fn get(&self, code: &str) -> Option<&SourceSummary> {
    self.sources.iter().find(|s| s.code == code)
  }

  pub fn inserted(&self) -> usize { self.sources.iter().map(|s| s.inserted).sum() }

  pub fn ignored(&self) -> usize { self.sources.iter().map(|s| s.ignored).sum() }

  pub fn failed(&self) -> usize {
    self.sources.iter().filter(|s| !s.outcome.is_ok()).count()
  }
}

impl fmt::Display for RunSummary {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(
      f,
      "{:<8} {:<20} {:<13} {:>7} {:>8} {:>8} {:>8} {:>9} {:>8}",
      "code", "family", "outcome", "series", "fetched", "mapped", "skipped", "inserted", "ignored"
    )?;
    for s in &self.sources {
      let family = s.family.map(|fam| fam.to_string()).unwrap_or_else(|| "-".into());
      writeln!(
        f,
        "{:<8} {:<20} {:<13} {:>7} {:>8} {:>8} {:>8} {:>9} {:>8}",
        s.code,
        family,
        s.outcome.to_string(),
        s.series_fetched,
        s.rows_fetched,
        s.rows_mapped,
        s.rows_skipped(),
        s.inserted,
        s.ignored,
      )?;
      for (reason, n) in &s.skipped {
        writeln!(f, "{:<8}   {reason}: {n}", "")?;
      }
      if let SourceOutcome::FetchFailed { error } | SourceOutcome::StoreFailed { error } =
        &s.outcome
      {
        writeln!(f, "{:<8}   error: {error}", "")?;
      }
    }
    write!(
      f,
      "{} sources, {} failed, {} inserted, {} ignored",
      self.sources.len(),
      self.failed(),
      self.inserted(),
      self.ignored()
    )
  }
}
