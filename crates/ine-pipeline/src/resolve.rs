//! Per-batch front for the store's lookup-or-create resolvers.
//!
//! A table of a few hundred series repeats the same handful of geographies,
//! indicators and periods thousands of times. The store stays the source of
//! truth; the caches only avoid asking it twice for the same key within one
//! batch.

use std::collections::HashMap;

use ine_core::{
  dimension::{DimensionId, DimensionRef},
  period::{PeriodId, PeriodKey},
  store::StatStore,
};

pub struct Resolver<'s, S: StatStore> {
  store:      &'s S,
  periods:    HashMap<PeriodKey, PeriodId>,
  dimensions: HashMap<DimensionRef, DimensionId>,
}

impl<'s, S: StatStore> Resolver<'s, S> {
  pub fn new(store: &'s S) -> Self {
    Self { store, periods: HashMap::new(), dimensions: HashMap::new() }
  }

  pub async fn period(&mut self, key: PeriodKey) -> Result<PeriodId, S::Error> {
    if let Some(id) = self.periods.get(&key) {
      return Ok(*id);
    }
    let id = self.store.resolve_period(key).await?;
    self.periods.insert(key, id);
    Ok(id)
  }

  pub async fn dimension(&mut self, dim: &DimensionRef) -> Result<DimensionId, S::Error> {
    if let Some(id) = self.dimensions.get(dim) {
      return Ok(*id);
    }
    let id = self.store.resolve_dimension(dim.clone()).await?;
    self.dimensions.insert(dim.clone(), id);
    Ok(id)
  }

  /// Distinct keys resolved so far: `(periods, dimensions)`.
  pub fn resolved(&self) -> (usize, usize) { (self.periods.len(), self.dimensions.len()) }
}
