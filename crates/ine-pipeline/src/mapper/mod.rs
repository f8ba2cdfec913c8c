//! Fact mappers — one series batch in, one fact batch out.
//!
//! Mapping is split in two. A family *classifier* looks only at the parsed
//! label and decides whether the series is kept and under which indicator
//! (see [`prices`], [`wages`], [`employment`]). The shared [`map_series`]
//! driver then resolves dimensions and periods and emits one row per usable
//! observation. Bad records are counted and skipped; only store failures
//! abort the batch.

pub mod employment;
pub mod prices;
pub mod wages;

use std::collections::BTreeMap;

use ine_core::{
  dimension::{DimensionId, DimensionRef},
  fact::{EmploymentFact, FactBatch, FactTable, PriceFact, WageFact},
  period::PeriodId,
  series::Series,
  source::{DEFAULT_GEOGRAPHY, Field, SourceFamily},
  store::StatStore,
};
use ine_labels::ParsedLabel;
use serde::{Deserialize, Serialize};

use crate::{registry::Route, resolve::Resolver};

// ─── Skip reasons ────────────────────────────────────────────────────────────

/// Why a row did not become a fact.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  Serialize,
  Deserialize,
  strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SkipReason {
  /// Label too short for the schema, or a required field is absent.
  MalformedLabel,
  /// The family rule discards this series.
  Filtered,
  /// Unknown quarter code, out-of-range month or a year the calendar
  /// cannot represent.
  InvalidPeriod,
  /// A dimension name came out blank.
  EmptyDimension,
  /// Null, secret or non-finite value.
  MissingValue,
}

impl From<ine_core::Error> for SkipReason {
  fn from(e: ine_core::Error) -> Self {
    match e {
      ine_core::Error::EmptyDimensionName(_) => Self::EmptyDimension,
      ine_core::Error::UnknownQuarterCode(_)
      | ine_core::Error::InvalidMonth(_)
      | ine_core::Error::InvalidYear(_) => Self::InvalidPeriod,
      _ => Self::MalformedLabel,
    }
  }
}

// ─── Drafts ──────────────────────────────────────────────────────────────────

/// Table-specific attributes of a kept series, before ids are known. Each
/// implementor fixes the fact table its rows land in.
pub trait FactDetail: Send + Sync {
  type Fact: Send;

  const TABLE: FactTable;

  fn fact(
    &self,
    period_id: PeriodId,
    indicator_id: DimensionId,
    geography_id: DimensionId,
    value: f64,
  ) -> Self::Fact;

  fn batch(rows: Vec<Self::Fact>) -> FactBatch;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceDetail {
  pub category: String,
}

impl FactDetail for PriceDetail {
  type Fact = PriceFact;

  const TABLE: FactTable = FactTable::Prices;

  fn fact(
    &self,
    period_id: PeriodId,
    indicator_id: DimensionId,
    geography_id: DimensionId,
    value: f64,
  ) -> PriceFact {
    PriceFact { period_id, indicator_id, geography_id, category: self.category.clone(), value }
  }

  fn batch(rows: Vec<PriceFact>) -> FactBatch { FactBatch::Prices(rows) }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WageDetail {
  pub sex:        Option<String>,
  pub sector:     Option<String>,
  pub occupation: Option<String>,
}

impl FactDetail for WageDetail {
  type Fact = WageFact;

  const TABLE: FactTable = FactTable::Wages;

  fn fact(
    &self,
    period_id: PeriodId,
    indicator_id: DimensionId,
    geography_id: DimensionId,
    value: f64,
  ) -> WageFact {
    WageFact {
      period_id,
      indicator_id,
      geography_id,
      sex: self.sex.clone(),
      sector: self.sector.clone(),
      occupation: self.occupation.clone(),
      value,
    }
  }

  fn batch(rows: Vec<WageFact>) -> FactBatch { FactBatch::Wages(rows) }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmploymentDetail {
  pub sex:           String,
  pub age_group:     Option<String>,
  pub working_time:  Option<String>,
  pub contract_type: Option<String>,
}

impl FactDetail for EmploymentDetail {
  type Fact = EmploymentFact;

  const TABLE: FactTable = FactTable::Employment;

  fn fact(
    &self,
    period_id: PeriodId,
    indicator_id: DimensionId,
    geography_id: DimensionId,
    value: f64,
  ) -> EmploymentFact {
    EmploymentFact {
      period_id,
      indicator_id,
      geography_id,
      sex: self.sex.clone(),
      age_group: self.age_group.clone(),
      working_time: self.working_time.clone(),
      contract_type: self.contract_type.clone(),
      value,
    }
  }

  fn batch(rows: Vec<EmploymentFact>) -> FactBatch { FactBatch::Employment(rows) }
}

/// What a classifier decided for one series: everything except ids, periods
/// and values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesDraft<D> {
  pub indicator: DimensionRef,
  pub geography: DimensionRef,
  pub detail:    D,
}

/// `Ok(None)` means the series is deliberately discarded.
pub type Classification<D> = Result<Option<SeriesDraft<D>>, SkipReason>;

/// A family's filter-and-name rule, tagged with the table it feeds.
#[derive(Debug, Clone, Copy)]
pub enum Classifier {
  Prices(fn(&ParsedLabel) -> Classification<PriceDetail>),
  Wages(fn(&ParsedLabel) -> Classification<WageDetail>),
  Employment(fn(&ParsedLabel) -> Classification<EmploymentDetail>),
}

impl Classifier {
  pub fn table(self) -> FactTable {
    match self {
      Self::Prices(_) => PriceDetail::TABLE,
      Self::Wages(_) => WageDetail::TABLE,
      Self::Employment(_) => EmploymentDetail::TABLE,
    }
  }
}

/// The classifier for `family`.
pub fn classifier(family: SourceFamily) -> Classifier {
  match family {
    SourceFamily::ConsumerPrices => Classifier::Prices(prices::classify_consumer),
    SourceFamily::HousingPrices => Classifier::Prices(prices::classify_housing),
    SourceFamily::LabourCost => Classifier::Wages(wages::classify_labour_cost),
    SourceFamily::WagePercentiles => Classifier::Wages(wages::classify_percentiles),
    SourceFamily::WageByOccupation => Classifier::Wages(wages::classify_occupation),
    SourceFamily::UnemploymentRate => {
      Classifier::Employment(employment::classify_unemployment)
    }
    SourceFamily::Temporariness => Classifier::Employment(employment::classify_temporariness),
  }
}

/// Label fields the family's classifier cannot work without.
pub fn required_fields(family: SourceFamily) -> &'static [Field] {
  match family {
    SourceFamily::ConsumerPrices | SourceFamily::HousingPrices => {
      &[Field::Category, Field::DataType]
    }
    SourceFamily::LabourCost | SourceFamily::WagePercentiles => &[Field::Indicator],
    SourceFamily::WageByOccupation => &[Field::Occupation],
    SourceFamily::UnemploymentRate => &[Field::Sex],
    SourceFamily::Temporariness => {
      &[Field::Sex, Field::WorkingTime, Field::ContractType]
    }
  }
}

// ─── Classifier helpers ──────────────────────────────────────────────────────

pub(crate) fn require(label: &ParsedLabel, field: Field) -> Result<&str, SkipReason> {
  label.get(field).ok_or(SkipReason::MalformedLabel)
}

pub(crate) fn optional(label: &ParsedLabel, field: Field) -> Option<String> {
  label.get(field).map(str::to_owned)
}

/// The label's geography, or the national default when the schema has none.
pub(crate) fn geography(label: &ParsedLabel) -> Result<DimensionRef, SkipReason> {
  let name = label.get(Field::Geography).unwrap_or(DEFAULT_GEOGRAPHY);
  Ok(DimensionRef::geography(name)?)
}

pub(crate) fn indicator(name: &str, unit: &str) -> Result<DimensionRef, SkipReason> {
  Ok(DimensionRef::indicator(name, unit)?)
}

// ─── Driver ──────────────────────────────────────────────────────────────────

/// Result of mapping one source's series.
#[derive(Debug, Clone, PartialEq)]
pub struct MappedBatch {
  pub batch:          FactBatch,
  pub series_fetched: usize,
  pub rows_fetched:   usize,
  pub skipped:        BTreeMap<SkipReason, usize>,
}

impl MappedBatch {
  fn skip(&mut self, reason: SkipReason, rows: usize) {
    if rows > 0 {
      *self.skipped.entry(reason).or_default() += rows;
    }
  }

  pub fn rows_skipped(&self) -> usize { self.skipped.values().sum() }
}

/// Map every series of one source onto `route`'s fact table.
///
/// Dimension and period rows are created in the store as a side effect,
/// always before the fact that references them is emitted. Facts themselves
/// are only returned; the caller inserts them.
pub async fn map_series<S: StatStore>(
  store: &S,
  route: &Route,
  series: &[Series],
) -> Result<MappedBatch, S::Error> {
  match route.classify {
    Classifier::Prices(classify) => map_with(store, route, series, classify).await,
    Classifier::Wages(classify) => map_with(store, route, series, classify).await,
    Classifier::Employment(classify) => map_with(store, route, series, classify).await,
  }
}

async fn map_with<S: StatStore, D: FactDetail>(
  store: &S,
  route: &Route,
  series: &[Series],
  classify: fn(&ParsedLabel) -> Classification<D>,
) -> Result<MappedBatch, S::Error> {
  let mut resolver = Resolver::new(store);
  let mut rows: Vec<D::Fact> = Vec::new();
  let mut out = MappedBatch {
    batch:          FactBatch::empty(D::TABLE),
    series_fetched: series.len(),
    rows_fetched:   series.iter().map(|s| s.observations.len()).sum(),
    skipped:        BTreeMap::new(),
  };

  for s in series {
    let rows_in_series = s.observations.len();

    let label = match ine_labels::parse(&route.spec.schema, &s.label) {
      Ok(label) => label,
      Err(e) => {
        tracing::debug!(code = %route.spec.code, error = %e, "skipping series");
        out.skip(SkipReason::MalformedLabel, rows_in_series);
        continue;
      }
    };

    let draft = match classify(&label) {
      Ok(Some(draft)) => draft,
      Ok(None) => {
        tracing::trace!(code = %route.spec.code, label = %s.label, "filtered");
        out.skip(SkipReason::Filtered, rows_in_series);
        continue;
      }
      Err(reason) => {
        tracing::debug!(code = %route.spec.code, label = %s.label, %reason, "skipping series");
        out.skip(reason, rows_in_series);
        continue;
      }
    };

    // Resolved on the first usable observation, so series without data
    // leave no dimension rows behind.
    let mut ids: Option<(DimensionId, DimensionId)> = None;

    for obs in &s.observations {
      let Some(value) = obs.usable_value() else {
        out.skip(SkipReason::MissingValue, 1);
        continue;
      };

      let key = match route.granularity.period_key(obs.year, obs.period_code) {
        Ok(key) => key,
        Err(e) => {
          tracing::debug!(
            code = %route.spec.code,
            year = obs.year,
            period_code = obs.period_code,
            error = %e,
            "skipping observation"
          );
          out.skip(SkipReason::InvalidPeriod, 1);
          continue;
        }
      };

      let (indicator_id, geography_id) = match ids {
        Some(ids) => ids,
        None => {
          let resolved = (
            resolver.dimension(&draft.indicator).await?,
            resolver.dimension(&draft.geography).await?,
          );
          ids = Some(resolved);
          resolved
        }
      };
      let period_id = resolver.period(key).await?;

      rows.push(draft.detail.fact(period_id, indicator_id, geography_id, value));
    }
  }

  out.batch = D::batch(rows);

  let (periods, dimensions) = resolver.resolved();
  tracing::debug!(
    code = %route.spec.code,
    rows = out.batch.len(),
    periods,
    dimensions,
    "mapped series"
  );
  Ok(out)
}
