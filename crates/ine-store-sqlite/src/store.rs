//! [`SqliteStore`] — the SQLite implementation of [`StatStore`].

use std::path::Path;

use ine_core::{
  dimension::{Dimension, DimensionId, DimensionKind, DimensionRef},
  fact::{FactBatch, FactTable, InsertReport},
  period::{Period, PeriodId, PeriodKey, Quarter},
  store::StatStore,
};
use rusqlite::OptionalExtension as _;

use crate::{
  Result,
  encode::{
    RawDimension, RawEmploymentFact, RawPeriod, RawPriceFact, RawWageFact,
    dimension_table_name, encode_date, encode_optional, fact_table_name,
  },
  schema::SCHEMA,
};

// ─── SQL ─────────────────────────────────────────────────────────────────────

const INSERT_PRICE: &str = "
  INSERT OR IGNORE INTO price_facts
    (period_id, indicator_id, geography_id, category, value)
  VALUES (?1, ?2, ?3, ?4, ?5)";

const INSERT_WAGE: &str = "
  INSERT OR IGNORE INTO wage_facts
    (period_id, indicator_id, geography_id, sex, sector, occupation, value)
  VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)";

const INSERT_EMPLOYMENT: &str = "
  INSERT OR IGNORE INTO employment_facts
    (period_id, indicator_id, geography_id, sex,
     age_group, working_time, contract_type, value)
  VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)";

// ─── Store ───────────────────────────────────────────────────────────────────

/// A statistics store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted, and every
/// clone funnels into the same connection thread.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── StatStore impl ──────────────────────────────────────────────────────────

impl StatStore for SqliteStore {
  type Error = crate::Error;

  // ── Resolvers ─────────────────────────────────────────────────────────────

  async fn resolve_period(&self, key: PeriodKey) -> Result<PeriodId> {
    let date_str = encode_date(key.canonical_date()?);
    let year     = key.year();
    let month    = key.month();
    let quarter  = key.quarter().map(Quarter::ordinal);

    let (id, created) = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let select = "SELECT period_id FROM periods WHERE canonical_date = ?1";

        let existing: Option<i64> = tx
          .query_row(select, rusqlite::params![date_str], |r| r.get(0))
          .optional()?;

        let resolved = match existing {
          Some(id) => (id, false),
          None => {
            let n = tx.execute(
              "INSERT OR IGNORE INTO periods (year, month, quarter, canonical_date)
               VALUES (?1, ?2, ?3, ?4)",
              rusqlite::params![year, month, quarter, date_str],
            )?;
            let id: i64 =
              tx.query_row(select, rusqlite::params![date_str], |r| r.get(0))?;
            (id, n > 0)
          }
        };

        tx.commit()?;
        Ok(resolved)
      })
      .await?;

    if created {
      tracing::debug!(period_id = id, year, ?month, ?quarter, "created period");
    }
    Ok(PeriodId(id))
  }

  async fn resolve_dimension(&self, dim: DimensionRef) -> Result<DimensionId> {
    let kind  = dim.kind();
    let table = dimension_table_name(kind);
    let name  = dim.name().to_owned();
    let unit  = dim.unit().map(str::to_owned);

    let (select, insert) = match kind {
      DimensionKind::Geography => (
        "SELECT geography_id FROM geographies WHERE name = ?1",
        "INSERT OR IGNORE INTO geographies (name) VALUES (?1)",
      ),
      DimensionKind::Indicator => (
        "SELECT indicator_id FROM indicators WHERE name = ?1",
        "INSERT OR IGNORE INTO indicators (name, unit) VALUES (?1, ?2)",
      ),
    };

    let log_name = name.clone();
    let (id, created) = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let existing: Option<i64> = tx
          .query_row(select, rusqlite::params![name], |r| r.get(0))
          .optional()?;

        let resolved = match existing {
          Some(id) => (id, false),
          None => {
            let n = match kind {
              DimensionKind::Geography => {
                tx.execute(insert, rusqlite::params![name])?
              }
              DimensionKind::Indicator => {
                tx.execute(insert, rusqlite::params![name, unit])?
              }
            };
            let id: i64 = tx.query_row(select, rusqlite::params![name], |r| r.get(0))?;
            (id, n > 0)
          }
        };

        tx.commit()?;
        Ok(resolved)
      })
      .await?;

    if created {
      tracing::debug!(table, id, name = %log_name, "created dimension");
    }
    Ok(DimensionId(id))
  }

  // ── Facts ─────────────────────────────────────────────────────────────────

  async fn insert_facts(&self, batch: FactBatch) -> Result<InsertReport> {
    if batch.is_empty() {
      return Ok(InsertReport::default());
    }
    let table = batch.table();

    let report = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let mut report = InsertReport::default();
        let mut tally = |changed: usize| {
          if changed > 0 {
            report.inserted += 1;
          } else {
            report.ignored += 1;
          }
        };

        {
          match &batch {
            FactBatch::Prices(rows) => {
              let mut stmt = tx.prepare(INSERT_PRICE)?;
              for r in rows {
                tally(stmt.execute(rusqlite::params![
                  r.period_id.0,
                  r.indicator_id.0,
                  r.geography_id.0,
                  r.category,
                  r.value,
                ])?);
              }
            }
            FactBatch::Wages(rows) => {
              let mut stmt = tx.prepare(INSERT_WAGE)?;
              for r in rows {
                tally(stmt.execute(rusqlite::params![
                  r.period_id.0,
                  r.indicator_id.0,
                  r.geography_id.0,
                  encode_optional(r.sex.as_deref()),
                  encode_optional(r.sector.as_deref()),
                  encode_optional(r.occupation.as_deref()),
                  r.value,
                ])?);
              }
            }
            FactBatch::Employment(rows) => {
              let mut stmt = tx.prepare(INSERT_EMPLOYMENT)?;
              for r in rows {
                tally(stmt.execute(rusqlite::params![
                  r.period_id.0,
                  r.indicator_id.0,
                  r.geography_id.0,
                  r.sex,
                  encode_optional(r.age_group.as_deref()),
                  encode_optional(r.working_time.as_deref()),
                  encode_optional(r.contract_type.as_deref()),
                  r.value,
                ])?);
              }
            }
          }
        }

        tx.commit()?;
        Ok(report)
      })
      .await?;

    tracing::debug!(
      %table,
      inserted = report.inserted,
      ignored = report.ignored,
      "inserted fact batch"
    );
    Ok(report)
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn get_period(&self, id: PeriodId) -> Result<Option<Period>> {
    let raw: Option<RawPeriod> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT period_id, year, month, quarter, canonical_date
             FROM periods WHERE period_id = ?1",
            rusqlite::params![id.0],
            |row| {
              Ok(RawPeriod {
                period_id:      row.get(0)?,
                year:           row.get(1)?,
                month:          row.get(2)?,
                quarter:        row.get(3)?,
                canonical_date: row.get(4)?,
              })
            },
          )
          .optional()?)
      })
      .await?;

    raw.map(RawPeriod::into_period).transpose()
  }

  async fn find_dimension(
    &self,
    kind: DimensionKind,
    name: &str,
  ) -> Result<Option<Dimension>> {
    let name = name.trim().to_owned();
    let sql = match kind {
      DimensionKind::Geography => {
        "SELECT geography_id, name, NULL FROM geographies WHERE name = ?1"
      }
      DimensionKind::Indicator => {
        "SELECT indicator_id, name, unit FROM indicators WHERE name = ?1"
      }
    };

    let raw: Option<RawDimension> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(sql, rusqlite::params![name], |row| {
            Ok(RawDimension {
              id:   row.get(0)?,
              name: row.get(1)?,
              unit: row.get(2)?,
            })
          })
          .optional()?)
      })
      .await?;

    Ok(raw.map(|r| r.into_dimension(kind)))
  }

  async fn list_dimensions(&self, kind: DimensionKind) -> Result<Vec<Dimension>> {
    let sql = match kind {
      DimensionKind::Geography => {
        "SELECT geography_id, name, NULL FROM geographies ORDER BY geography_id"
      }
      DimensionKind::Indicator => {
        "SELECT indicator_id, name, unit FROM indicators ORDER BY indicator_id"
      }
    };

    let raws: Vec<RawDimension> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawDimension {
              id:   row.get(0)?,
              name: row.get(1)?,
              unit: row.get(2)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(raws.into_iter().map(|r| r.into_dimension(kind)).collect())
  }

  async fn count_facts(&self, table: FactTable) -> Result<usize> {
    let sql = format!("SELECT COUNT(*) FROM {}", fact_table_name(table));

    let n: i64 = self
      .conn
      .call(move |conn| Ok(conn.query_row(&sql, [], |r| r.get(0))?))
      .await?;

    Ok(usize::try_from(n).unwrap_or_default())
  }

  async fn list_facts(&self, table: FactTable) -> Result<FactBatch> {
    let batch = self
      .conn
      .call(move |conn| {
        let batch = match table {
          FactTable::Prices => {
            let mut stmt = conn.prepare(
              "SELECT period_id, indicator_id, geography_id, category, value
               FROM price_facts ORDER BY price_fact_id",
            )?;
            let rows = stmt
              .query_map([], |row| {
                Ok(RawPriceFact {
                  period_id:    row.get(0)?,
                  indicator_id: row.get(1)?,
                  geography_id: row.get(2)?,
                  category:     row.get(3)?,
                  value:        row.get(4)?,
                })
              })?
              .collect::<rusqlite::Result<Vec<_>>>()?;
            FactBatch::Prices(rows.into_iter().map(RawPriceFact::into_fact).collect())
          }
          FactTable::Wages => {
            let mut stmt = conn.prepare(
              "SELECT period_id, indicator_id, geography_id,
                      sex, sector, occupation, value
               FROM wage_facts ORDER BY wage_fact_id",
            )?;
            let rows = stmt
              .query_map([], |row| {
                Ok(RawWageFact {
                  period_id:    row.get(0)?,
                  indicator_id: row.get(1)?,
                  geography_id: row.get(2)?,
                  sex:          row.get(3)?,
                  sector:       row.get(4)?,
                  occupation:   row.get(5)?,
                  value:        row.get(6)?,
                })
              })?
              .collect::<rusqlite::Result<Vec<_>>>()?;
            FactBatch::Wages(rows.into_iter().map(RawWageFact::into_fact).collect())
          }
          FactTable::Employment => {
            let mut stmt = conn.prepare(
              "SELECT period_id, indicator_id, geography_id, sex,
                      age_group, working_time, contract_type, value
               FROM employment_facts ORDER BY employment_fact_id",
            )?;
            let rows = stmt
              .query_map([], |row| {
                Ok(RawEmploymentFact {
                  period_id:     row.get(0)?,
                  indicator_id:  row.get(1)?,
                  geography_id:  row.get(2)?,
                  sex:           row.get(3)?,
                  age_group:     row.get(4)?,
                  working_time:  row.get(5)?,
                  contract_type: row.get(6)?,
                  value:         row.get(7)?,
                })
              })?
              .collect::<rusqlite::Result<Vec<_>>>()?;
            FactBatch::Employment(
              rows.into_iter().map(RawEmploymentFact::into_fact).collect(),
            )
          }
        };
        Ok(batch)
      })
      .await?;

    Ok(batch)
  }
}
