//! Fact rows — one stored observation with resolved dimension references.
//!
//! There are three fixed shapes, one per fact table. Facts are write-once:
//! the store ignores an insert whose key already exists and never updates a
//! stored value.

use serde::{Deserialize, Serialize};

use crate::{dimension::DimensionId, period::PeriodId};

/// Stored in place of an absent optional attribute.
///
/// SQL `UNIQUE` constraints treat `NULL`s as distinct, so absent attributes
/// must be a real value for the fact key to deduplicate.
pub const NOT_APPLICABLE: &str = "N/A";

// ─── Tables ──────────────────────────────────────────────────────────────────

/// The three destination fact tables.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  PartialOrd,
  Ord,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FactTable {
  Prices,
  Wages,
  Employment,
}

// ─── Row shapes ──────────────────────────────────────────────────────────────

/// A price-index observation. Unique on (period, indicator, geography,
/// category).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceFact {
  pub period_id:    PeriodId,
  pub indicator_id: DimensionId,
  pub geography_id: DimensionId,
  pub category:     String,
  pub value:        f64,
}

/// A wage observation. Unique on every column but `value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WageFact {
  pub period_id:    PeriodId,
  pub indicator_id: DimensionId,
  pub geography_id: DimensionId,
  pub sex:          Option<String>,
  /// Activity sector; only the quarterly labour-cost survey has one.
  pub sector:       Option<String>,
  /// Occupation group; only the by-occupation wage survey has one.
  pub occupation:   Option<String>,
  pub value:        f64,
}

/// An employment observation. Unique on every column but `value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmploymentFact {
  pub period_id:     PeriodId,
  pub indicator_id:  DimensionId,
  pub geography_id:  DimensionId,
  pub sex:           String,
  pub age_group:     Option<String>,
  pub working_time:  Option<String>,
  pub contract_type: Option<String>,
  pub value:         f64,
}

// ─── Batches ─────────────────────────────────────────────────────────────────

/// A set of rows bound for exactly one fact table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "table", content = "rows", rename_all = "snake_case")]
pub enum FactBatch {
  Prices(Vec<PriceFact>),
  Wages(Vec<WageFact>),
  Employment(Vec<EmploymentFact>),
}

impl FactBatch {
  /// An empty batch for `table`.
  pub fn empty(table: FactTable) -> Self {
    match table {
      FactTable::Prices => Self::Prices(Vec::new()),
      FactTable::Wages => Self::Wages(Vec::new()),
      FactTable::Employment => Self::Employment(Vec::new()),
    }
  }

  pub fn table(&self) -> FactTable {
    match self {
      Self::Prices(_) => FactTable::Prices,
      Self::Wages(_) => FactTable::Wages,
      Self::Employment(_) => FactTable::Employment,
    }
  }

  pub fn len(&self) -> usize {
    match self {
      Self::Prices(rows) => rows.len(),
      Self::Wages(rows) => rows.len(),
      Self::Employment(rows) => rows.len(),
    }
  }

  pub fn is_empty(&self) -> bool { self.len() == 0 }
}

/// Outcome of [`crate::store::StatStore::insert_facts`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsertReport {
  /// Rows newly written.
  pub inserted: usize,
  /// Rows skipped because their key already existed.
  pub ignored:  usize,
}
