//! Source families and their label schemas.
//!
//! A source code selects one upstream table. Each table belongs to a family
//! that fixes its destination fact table, its period granularity and the
//! positional layout of its series labels. The layout is data, not code: it
//! can be overridden per source code from configuration when upstream label
//! formats drift.

use serde::{Deserialize, Serialize};

use crate::{Error, Result, fact::FactTable, period::Granularity};

/// Geography used when a family's labels carry no geography segment.
pub const DEFAULT_GEOGRAPHY: &str = "Total Nacional";

// ─── Label fields ────────────────────────────────────────────────────────────

/// A semantic attribute extracted from one label segment.
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
  strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Field {
  /// The statistic or indicator the series measures.
  Indicator,
  Sex,
  Geography,
  AgeGroup,
  ContractType,
  WorkingTime,
  Category,
  /// Index level, monthly variation, annual variation...
  DataType,
  Sector,
  Occupation,
  /// Position present in the label but not extracted.
  Skip,
}

// ─── LabelSchema ─────────────────────────────────────────────────────────────

/// Ordered mapping of label position → [`Field`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelSchema {
  positions: Vec<Field>,
}

impl LabelSchema {
  pub fn new(positions: Vec<Field>) -> Self { Self { positions } }

  /// Build from field names such as `["geography", "category", "data_type"]`.
  pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self> {
    let positions = names
      .iter()
      .map(|n| {
        let n = n.as_ref().trim();
        n.parse::<Field>()
          .map_err(|_| Error::UnknownField(n.to_owned()))
      })
      .collect::<Result<_>>()?;
    Ok(Self { positions })
  }

  pub fn positions(&self) -> &[Field] { &self.positions }

  /// Number of segments a label needs for every extracted field to exist.
  /// Trailing `skip` positions do not count.
  pub fn required_segments(&self) -> usize {
    self
      .positions
      .iter()
      .rposition(|f| *f != Field::Skip)
      .map_or(0, |i| i + 1)
  }

  pub fn contains(&self, field: Field) -> bool {
    field != Field::Skip && self.positions.contains(&field)
  }

  /// `(position, field)` pairs for every extracted field.
  pub fn extracted(&self) -> impl Iterator<Item = (usize, Field)> + '_ {
    self
      .positions
      .iter()
      .copied()
      .enumerate()
      .filter(|(_, f)| *f != Field::Skip)
  }
}

// ─── SourceFamily ────────────────────────────────────────────────────────────

/// The seven upstream table families the pipeline understands.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SourceFamily {
  /// Consumer price index (IPC), monthly.
  ConsumerPrices,
  /// Housing price index (IPV), quarterly.
  HousingPrices,
  /// Labour force survey unemployment rate, quarterly.
  UnemploymentRate,
  /// Labour force survey employees by contract and working time, quarterly.
  Temporariness,
  /// Quarterly labour cost survey (ETCL).
  LabourCost,
  /// Annual wage structure survey, distribution statistics.
  WagePercentiles,
  /// Annual wage structure survey, by occupation.
  WageByOccupation,
}

impl SourceFamily {
  pub fn table(self) -> FactTable {
    match self {
      Self::ConsumerPrices | Self::HousingPrices => FactTable::Prices,
      Self::LabourCost | Self::WagePercentiles | Self::WageByOccupation => {
        FactTable::Wages
      }
      Self::UnemploymentRate | Self::Temporariness => FactTable::Employment,
    }
  }

  pub fn granularity(self) -> Granularity {
    match self {
      Self::ConsumerPrices => Granularity::Monthly,
      Self::HousingPrices
      | Self::UnemploymentRate
      | Self::Temporariness
      | Self::LabourCost => Granularity::Quarterly,
      Self::WagePercentiles | Self::WageByOccupation => Granularity::Annual,
    }
  }

  /// The label layout observed on the live API.
  pub fn default_schema(self) -> LabelSchema {
    use Field::*;
    let positions = match self {
      Self::ConsumerPrices | Self::HousingPrices => {
        vec![Geography, Category, DataType]
      }
      Self::UnemploymentRate => vec![Indicator, Sex, Geography, AgeGroup],
      Self::Temporariness => vec![Sex, Geography, WorkingTime, ContractType],
      Self::LabourCost => vec![Geography, Indicator, Sector],
      Self::WagePercentiles => vec![Sex, Geography, Indicator],
      Self::WageByOccupation => vec![Sex, Occupation, Geography],
    };
    LabelSchema::new(positions)
  }
}

// ─── SourceSpec ──────────────────────────────────────────────────────────────

/// Default source codes and their families.
pub const DEFAULT_SOURCES: &[(&str, SourceFamily)] = &[
  ("50913", SourceFamily::ConsumerPrices),
  ("25171", SourceFamily::HousingPrices),
  ("65334", SourceFamily::UnemploymentRate),
  ("65132", SourceFamily::Temporariness),
  ("6061", SourceFamily::LabourCost),
  ("28191", SourceFamily::WagePercentiles),
  ("28186", SourceFamily::WageByOccupation),
];

/// Everything needed to process one source code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSpec {
  pub code:   String,
  pub family: SourceFamily,
  pub schema: LabelSchema,
}

impl SourceSpec {
  /// A spec using the family's default label layout.
  pub fn new(code: impl Into<String>, family: SourceFamily) -> Self {
    Self { code: code.into(), family, schema: family.default_schema() }
  }

  pub fn with_schema(mut self, schema: LabelSchema) -> Self {
    self.schema = schema;
    self
  }

  /// One spec per entry of [`DEFAULT_SOURCES`], in run order.
  pub fn defaults() -> Vec<Self> {
    DEFAULT_SOURCES
      .iter()
      .map(|(code, family)| Self::new(*code, *family))
      .collect()
  }
}
