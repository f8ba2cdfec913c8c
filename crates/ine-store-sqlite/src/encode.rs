//! Encoding and decoding helpers between Rust domain types and the plain
//! representations stored in SQLite columns.
//!
//! Canonical dates are stored as `YYYY-MM-DD` text. Optional fact attributes
//! are stored as the [`NOT_APPLICABLE`] sentinel, never as `NULL`.

use chrono::NaiveDate;
use ine_core::{
  dimension::{Dimension, DimensionId, DimensionKind},
  fact::{EmploymentFact, FactTable, NOT_APPLICABLE, PriceFact, WageFact},
  period::{Period, PeriodId, Quarter},
};

use crate::{Error, Result};

// ─── NaiveDate ───────────────────────────────────────────────────────────────

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn encode_date(d: NaiveDate) -> String { d.format(DATE_FORMAT).to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Optional attributes ─────────────────────────────────────────────────────

pub fn encode_optional(v: Option<&str>) -> String {
  match v.map(str::trim) {
    Some(s) if !s.is_empty() => s.to_owned(),
    _ => NOT_APPLICABLE.to_owned(),
  }
}

pub fn decode_optional(s: String) -> Option<String> {
  (s != NOT_APPLICABLE).then_some(s)
}

// ─── Table names ─────────────────────────────────────────────────────────────

pub fn fact_table_name(t: FactTable) -> &'static str {
  match t {
    FactTable::Prices => "price_facts",
    FactTable::Wages => "wage_facts",
    FactTable::Employment => "employment_facts",
  }
}

pub fn dimension_table_name(k: DimensionKind) -> &'static str {
  match k {
    DimensionKind::Geography => "geographies",
    DimensionKind::Indicator => "indicators",
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `periods` row.
pub struct RawPeriod {
  pub period_id:      i64,
  pub year:           i32,
  pub month:          Option<u32>,
  pub quarter:        Option<u8>,
  pub canonical_date: String,
}

impl RawPeriod {
  pub fn into_period(self) -> Result<Period> {
    let quarter = self
      .quarter
      .map(|n| {
        Quarter::from_ordinal(n).ok_or_else(|| Error::CorruptRow {
          table:  "periods",
          detail: format!("quarter {n} out of range"),
        })
      })
      .transpose()?;

    Ok(Period {
      period_id: PeriodId(self.period_id),
      year: self.year,
      month: self.month,
      quarter,
      canonical_date: decode_date(&self.canonical_date)?,
    })
  }
}

/// Raw values read from either dimension table. `unit` is always `None` for
/// geographies.
pub struct RawDimension {
  pub id:   i64,
  pub name: String,
  pub unit: Option<String>,
}

impl RawDimension {
  pub fn into_dimension(self, kind: DimensionKind) -> Dimension {
    Dimension { id: DimensionId(self.id), kind, name: self.name, unit: self.unit }
  }
}

/// Raw values read from `price_facts`.
pub struct RawPriceFact {
  pub period_id:    i64,
  pub indicator_id: i64,
  pub geography_id: i64,
  pub category:     String,
  pub value:        f64,
}

impl RawPriceFact {
  pub fn into_fact(self) -> PriceFact {
    PriceFact {
      period_id:    PeriodId(self.period_id),
      indicator_id: DimensionId(self.indicator_id),
      geography_id: DimensionId(self.geography_id),
      category:     self.category,
      value:        self.value,
    }
  }
}

/// Raw values read from `wage_facts`.
pub struct RawWageFact {
  pub period_id:    i64,
  pub indicator_id: i64,
  pub geography_id: i64,
  pub sex:          String,
  pub sector:       String,
  pub occupation:   String,
  pub value:        f64,
}

impl RawWageFact {
  pub fn into_fact(self) -> WageFact {
    WageFact {
      period_id:    PeriodId(self.period_id),
      indicator_id: DimensionId(self.indicator_id),
      geography_id: DimensionId(self.geography_id),
      sex:          decode_optional(self.sex),
      sector:       decode_optional(self.sector),
      occupation:   decode_optional(self.occupation),
      value:        self.value,
    }
  }
}

/// Raw values read from `employment_facts`.
pub struct RawEmploymentFact {
  pub period_id:     i64,
  pub indicator_id:  i64,
  pub geography_id:  i64,
  pub sex:           String,
  pub age_group:     String,
  pub working_time:  String,
  pub contract_type: String,
  pub value:         f64,
}

impl RawEmploymentFact {
  pub fn into_fact(self) -> EmploymentFact {
    EmploymentFact {
      period_id:     PeriodId(self.period_id),
      indicator_id:  DimensionId(self.indicator_id),
      geography_id:  DimensionId(self.geography_id),
      sex:           self.sex,
      age_group:     decode_optional(self.age_group),
      working_time:  decode_optional(self.working_time),
      contract_type: decode_optional(self.contract_type),
      value:         self.value,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn absent_and_blank_encode_to_sentinel() {
    assert_eq!(encode_optional(None), NOT_APPLICABLE);
    assert_eq!(encode_optional(Some("  ")), NOT_APPLICABLE);
    assert_eq!(encode_optional(Some(" Hombres ")), "Hombres");
  }

  #[test]
  fn sentinel_decodes_to_none() {
    assert_eq!(decode_optional(NOT_APPLICABLE.to_owned()), None);
    assert_eq!(decode_optional("Total".to_owned()).as_deref(), Some("Total"));
  }

  #[test]
  fn date_roundtrip() {
    let d = NaiveDate::from_ymd_opt(2022, 4, 1).unwrap();
    assert_eq!(encode_date(d), "2022-04-01");
    assert_eq!(decode_date("2022-04-01").unwrap(), d);
    assert!(decode_date("2022-T2-01").is_err());
  }
}
