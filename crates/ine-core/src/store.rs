//! The `StatStore` trait.
//!
//! Implemented by storage backends (e.g. `ine-store-sqlite`). The pipeline
//! depends on this abstraction, not on any concrete backend, and receives the
//! store as an explicit handle.

use std::future::Future;

use crate::{
  dimension::{Dimension, DimensionId, DimensionKind, DimensionRef},
  fact::{FactBatch, FactTable, InsertReport},
  period::{Period, PeriodId, PeriodKey},
};

/// Abstraction over the star-schema store.
///
/// Dimension and period rows are created on demand and never mutated. Fact
/// rows are write-once: inserting an existing key is a no-op.
///
/// Both resolve methods are lookup-or-create and must be safe under
/// concurrent callers: two racing resolves of the same key return the same
/// identifier and leave exactly one row behind.
pub trait StatStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Resolvers ─────────────────────────────────────────────────────────

  /// Return the id of the period with `key`'s canonical date, creating the
  /// row if none exists.
  fn resolve_period(
    &self,
    key: PeriodKey,
  ) -> impl Future<Output = Result<PeriodId, Self::Error>> + Send + '_;

  /// Return the id of the dimension named by `dim`, creating the row if none
  /// exists. An existing row keeps its original unit.
  fn resolve_dimension(
    &self,
    dim: DimensionRef,
  ) -> impl Future<Output = Result<DimensionId, Self::Error>> + Send + '_;

  // ── Facts ─────────────────────────────────────────────────────────────

  /// Insert every row of `batch` into its table in one transaction,
  /// skipping rows whose key already exists.
  fn insert_facts(
    &self,
    batch: FactBatch,
  ) -> impl Future<Output = Result<InsertReport, Self::Error>> + Send + '_;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// Retrieve a period by id. Returns `None` if not found.
  fn get_period(
    &self,
    id: PeriodId,
  ) -> impl Future<Output = Result<Option<Period>, Self::Error>> + Send + '_;

  /// Look a dimension up by exact name without creating it.
  fn find_dimension<'a>(
    &'a self,
    kind: DimensionKind,
    name: &'a str,
  ) -> impl Future<Output = Result<Option<Dimension>, Self::Error>> + Send + 'a;

  /// All rows of a dimension table, ordered by id.
  fn list_dimensions(
    &self,
    kind: DimensionKind,
  ) -> impl Future<Output = Result<Vec<Dimension>, Self::Error>> + Send + '_;

  /// Number of rows in a fact table.
  fn count_facts(
    &self,
    table: FactTable,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  /// Every row of a fact table, in insertion order.
  fn list_facts(
    &self,
    table: FactTable,
  ) -> impl Future<Output = Result<FactBatch, Self::Error>> + Send + '_;
}
