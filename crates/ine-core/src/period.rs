//! Periods — the time dimension shared by every fact table.
//!
//! Upstream series mix monthly, quarterly and annual observations. Every
//! period collapses to a canonical date (the first day of its representative
//! month), and that date is the only deduplication key for the `periods`
//! table.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── Identifiers ─────────────────────────────────────────────────────────────

/// Surrogate key of a row in the `periods` table.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct PeriodId(pub i64);

// ─── Quarter ─────────────────────────────────────────────────────────────────

/// A calendar quarter, decoded from the upstream `FK_Periodo` code.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Quarter {
  Q1,
  Q2,
  Q3,
  Q4,
}

impl Quarter {
  /// Translate an upstream quarter code (`19`..=`22`).
  pub fn from_code(code: u32) -> Result<Self> {
    match code {
      19 => Ok(Self::Q1),
      20 => Ok(Self::Q2),
      21 => Ok(Self::Q3),
      22 => Ok(Self::Q4),
      other => Err(Error::UnknownQuarterCode(other)),
    }
  }

  /// Inverse of [`Quarter::ordinal`].
  pub fn from_ordinal(n: u8) -> Option<Self> {
    match n {
      1 => Some(Self::Q1),
      2 => Some(Self::Q2),
      3 => Some(Self::Q3),
      4 => Some(Self::Q4),
      _ => None,
    }
  }

  /// 1-based position within the year; this is what the store persists.
  pub fn ordinal(self) -> u8 {
    match self {
      Self::Q1 => 1,
      Self::Q2 => 2,
      Self::Q3 => 3,
      Self::Q4 => 4,
    }
  }

  /// The representative (first) month of the quarter.
  pub fn first_month(self) -> u32 {
    match self {
      Self::Q1 => 1,
      Self::Q2 => 4,
      Self::Q3 => 7,
      Self::Q4 => 10,
    }
  }
}

// ─── Granularity ─────────────────────────────────────────────────────────────

/// How a source family encodes the period of its observations.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Granularity {
  /// `FK_Periodo` is the month number.
  Monthly,
  /// `FK_Periodo` is a quarter code.
  Quarterly,
  /// `FK_Periodo` carries no sub-annual information.
  Annual,
}

impl Granularity {
  /// Route an upstream `(year, period code)` pair into the right slot.
  ///
  /// The returned key always has a canonical date.
  pub fn period_key(self, year: i32, code: u32) -> Result<PeriodKey> {
    let key = match self {
      Self::Monthly => PeriodKey::monthly(year, code)?,
      Self::Quarterly => PeriodKey::quarterly(year, Quarter::from_code(code)?),
      Self::Annual => PeriodKey::annual(year),
    };
    key.canonical_date()?;
    Ok(key)
  }
}

// ─── PeriodKey ───────────────────────────────────────────────────────────────

/// Input to [`crate::store::StatStore::resolve_period`].
///
/// At most one of `month` and `quarter` is set; the constructors are the only
/// way to build one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PeriodKey {
  year:    i32,
  month:   Option<u32>,
  quarter: Option<Quarter>,
}

impl PeriodKey {
  pub fn monthly(year: i32, month: u32) -> Result<Self> {
    if !(1..=12).contains(&month) {
      return Err(Error::InvalidMonth(month));
    }
    Ok(Self { year, month: Some(month), quarter: None })
  }

  pub fn quarterly(year: i32, quarter: Quarter) -> Self {
    Self { year, month: None, quarter: Some(quarter) }
  }

  pub fn annual(year: i32) -> Self {
    Self { year, month: None, quarter: None }
  }

  pub fn year(&self) -> i32 { self.year }

  pub fn month(&self) -> Option<u32> { self.month }

  pub fn quarter(&self) -> Option<Quarter> { self.quarter }

  /// The deduplication key: first day of the representative month.
  pub fn canonical_date(&self) -> Result<NaiveDate> {
    let month = match (self.month, self.quarter) {
      (Some(m), _) => m,
      (None, Some(q)) => q.first_month(),
      (None, None) => 1,
    };
    NaiveDate::from_ymd_opt(self.year, month, 1)
      .ok_or(Error::InvalidYear(self.year))
  }
}

// ─── Period ──────────────────────────────────────────────────────────────────

/// A persisted row of the `periods` table. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
  pub period_id:      PeriodId,
  pub year:           i32,
  pub month:          Option<u32>,
  pub quarter:        Option<Quarter>,
  pub canonical_date: NaiveDate,
}
