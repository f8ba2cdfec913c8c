//! Reference dimensions (geography, indicator) deduplicated by name.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Surrogate key of a row in a dimension table.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct DimensionId(pub i64);

/// Which dimension table a name belongs to.
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
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DimensionKind {
  Geography,
  Indicator,
}

/// Input to [`crate::store::StatStore::resolve_dimension`].
///
/// The name is trimmed and guaranteed non-empty; a blank name never reaches
/// the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DimensionRef {
  kind: DimensionKind,
  name: String,
  unit: Option<String>,
}

impl DimensionRef {
  pub fn new(kind: DimensionKind, name: &str, unit: Option<&str>) -> Result<Self> {
    let name = name.trim();
    if name.is_empty() {
      return Err(Error::EmptyDimensionName(kind));
    }
    // Units only exist on indicators.
    let unit = match kind {
      DimensionKind::Indicator => unit.map(str::trim).filter(|u| !u.is_empty()),
      DimensionKind::Geography => None,
    };
    Ok(Self { kind, name: name.to_owned(), unit: unit.map(str::to_owned) })
  }

  pub fn geography(name: &str) -> Result<Self> {
    Self::new(DimensionKind::Geography, name, None)
  }

  pub fn indicator(name: &str, unit: &str) -> Result<Self> {
    Self::new(DimensionKind::Indicator, name, Some(unit))
  }

  pub fn kind(&self) -> DimensionKind { self.kind }

  pub fn name(&self) -> &str { &self.name }

  pub fn unit(&self) -> Option<&str> { self.unit.as_deref() }
}

/// A persisted dimension row. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimension {
  pub id:   DimensionId,
  pub kind: DimensionKind,
  pub name: String,
  /// Only ever set for indicators.
  pub unit: Option<String>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn blank_names_are_rejected() {
    assert!(matches!(
      DimensionRef::geography("   "),
      Err(Error::EmptyDimensionName(DimensionKind::Geography))
    ));
    assert!(matches!(
      DimensionRef::indicator("", "%"),
      Err(Error::EmptyDimensionName(DimensionKind::Indicator))
    ));
  }

  #[test]
  fn names_are_trimmed() {
    let g = DimensionRef::geography("  Andalucía ").unwrap();
    assert_eq!(g.name(), "Andalucía");
    assert_eq!(g.unit(), None);
  }

  #[test]
  fn geography_never_carries_a_unit() {
    let g = DimensionRef::new(DimensionKind::Geography, "Galicia", Some("%")).unwrap();
    assert_eq!(g.unit(), None);

    let i = DimensionRef::indicator("Tasa_Paro", "%").unwrap();
    assert_eq!(i.unit(), Some("%"));
  }
}
