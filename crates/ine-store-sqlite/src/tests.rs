//! Integration tests for `SqliteStore` against an in-memory database.

use std::collections::HashSet;

use chrono::{Datelike, NaiveDate};
use ine_core::{
  dimension::{DimensionId, DimensionKind, DimensionRef},
  fact::{EmploymentFact, FactBatch, FactTable, PriceFact, WageFact},
  period::{PeriodId, PeriodKey, Quarter},
  store::StatStore,
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

// ─── Periods ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn resolve_period_is_stable() {
  let s = store().await;

  let key = PeriodKey::monthly(2022, 3).unwrap();
  let a = s.resolve_period(key).await.unwrap();
  let b = s.resolve_period(key).await.unwrap();
  assert_eq!(a, b);

  let period = s.get_period(a).await.unwrap().unwrap();
  assert_eq!(period.year, 2022);
  assert_eq!(period.month, Some(3));
  assert_eq!(period.quarter, None);
  assert_eq!(period.canonical_date, NaiveDate::from_ymd_opt(2022, 3, 1).unwrap());
}

#[tokio::test]
async fn quarterly_period_stores_ordinal() {
  let s = store().await;

  let id = s
    .resolve_period(PeriodKey::quarterly(2021, Quarter::Q4))
    .await
    .unwrap();
  let period = s.get_period(id).await.unwrap().unwrap();
  assert_eq!(period.quarter, Some(Quarter::Q4));
  assert_eq!(period.month, None);
  assert_eq!(period.canonical_date.month(), 10);
}

#[tokio::test]
async fn periods_dedupe_on_canonical_date() {
  let s = store().await;

  // April and Q2 share 2022-04-01; whichever comes first owns the row.
  let monthly = s.resolve_period(PeriodKey::monthly(2022, 4).unwrap()).await.unwrap();
  let quarterly = s
    .resolve_period(PeriodKey::quarterly(2022, Quarter::Q2))
    .await
    .unwrap();
  assert_eq!(monthly, quarterly);

  let annual = s.resolve_period(PeriodKey::annual(2022)).await.unwrap();
  assert_ne!(annual, monthly);
}

#[tokio::test]
async fn get_period_missing_returns_none() {
  let s = store().await;
  let missing = s.get_period(PeriodId(999)).await.unwrap();
  assert!(missing.is_none());
}

// ─── Dimensions ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn same_name_same_id() {
  let s = store().await;

  let a = s.resolve_dimension(DimensionRef::geography("Andalucía").unwrap()).await.unwrap();
  let b = s.resolve_dimension(DimensionRef::geography("Andalucía").unwrap()).await.unwrap();
  let c = s.resolve_dimension(DimensionRef::geography("Galicia").unwrap()).await.unwrap();

  assert_eq!(a, b);
  assert_ne!(a, c);
  assert_eq!(s.list_dimensions(DimensionKind::Geography).await.unwrap().len(), 2);
}

#[tokio::test]
async fn dimension_tables_are_independent() {
  let s = store().await;

  s.resolve_dimension(DimensionRef::geography("Total").unwrap()).await.unwrap();
  s.resolve_dimension(DimensionRef::indicator("Total", "%").unwrap()).await.unwrap();

  assert_eq!(s.list_dimensions(DimensionKind::Geography).await.unwrap().len(), 1);
  assert_eq!(s.list_dimensions(DimensionKind::Indicator).await.unwrap().len(), 1);
}

#[tokio::test]
async fn indicator_unit_is_set_once() {
  let s = store().await;

  let first = s
    .resolve_dimension(DimensionRef::indicator("Tasa_Paro", "%").unwrap())
    .await
    .unwrap();
  let second = s
    .resolve_dimension(DimensionRef::indicator("Tasa_Paro", "Euros").unwrap())
    .await
    .unwrap();
  assert_eq!(first, second);

  let stored = s
    .find_dimension(DimensionKind::Indicator, "Tasa_Paro")
    .await
    .unwrap()
    .unwrap();
  assert_eq!(stored.unit.as_deref(), Some("%"));
}

#[tokio::test]
async fn find_dimension_does_not_create() {
  let s = store().await;
  let found = s.find_dimension(DimensionKind::Geography, "Murcia").await.unwrap();
  assert!(found.is_none());
  assert!(s.list_dimensions(DimensionKind::Geography).await.unwrap().is_empty());
}

#[tokio::test]
async fn concurrent_resolves_leave_one_row() {
  let s = store().await;

  let mut handles = Vec::new();
  for _ in 0..16 {
    let s = s.clone();
    handles.push(tokio::spawn(async move {
      let geo = s
        .resolve_dimension(DimensionRef::geography("Comunitat Valenciana").unwrap())
        .await
        .unwrap();
      let period = s
        .resolve_period(PeriodKey::quarterly(2020, Quarter::Q3))
        .await
        .unwrap();
      (geo, period)
    }));
  }

  let mut ids = HashSet::new();
  for h in handles {
    ids.insert(h.await.unwrap());
  }

  assert_eq!(ids.len(), 1, "every task must see the same identifiers");
  assert_eq!(s.list_dimensions(DimensionKind::Geography).await.unwrap().len(), 1);
}

// ─── Facts ───────────────────────────────────────────────────────────────────

async fn keys(s: &SqliteStore) -> (PeriodId, DimensionId, DimensionId) {
  let period = s.resolve_period(PeriodKey::annual(2021)).await.unwrap();
  let indicator = s
    .resolve_dimension(DimensionRef::indicator("Salario Anual Media", "Euros").unwrap())
    .await
    .unwrap();
  let geography = s
    .resolve_dimension(DimensionRef::geography("Total Nacional").unwrap())
    .await
    .unwrap();
  (period, indicator, geography)
}

#[tokio::test]
async fn duplicate_facts_are_ignored_not_updated() {
  let s = store().await;
  let (period_id, indicator_id, geography_id) = keys(&s).await;

  let fact = |value| PriceFact {
    period_id,
    indicator_id,
    geography_id,
    category: "IPC General".into(),
    value,
  };

  let first = s.insert_facts(FactBatch::Prices(vec![fact(104.2)])).await.unwrap();
  assert_eq!((first.inserted, first.ignored), (1, 0));

  let second = s.insert_facts(FactBatch::Prices(vec![fact(999.0)])).await.unwrap();
  assert_eq!((second.inserted, second.ignored), (0, 1));

  let FactBatch::Prices(rows) = s.list_facts(FactTable::Prices).await.unwrap() else {
    panic!("expected price rows")
  };
  assert_eq!(rows.len(), 1);
  assert_eq!(rows[0].value, 104.2);
}

#[tokio::test]
async fn absent_wage_attributes_still_dedupe() {
  let s = store().await;
  let (period_id, indicator_id, geography_id) = keys(&s).await;

  let fact = WageFact {
    period_id,
    indicator_id,
    geography_id,
    sex: Some("Mujeres".into()),
    sector: None,
    occupation: None,
    value: 21_000.0,
  };

  let report = s
    .insert_facts(FactBatch::Wages(vec![fact.clone(), fact.clone()]))
    .await
    .unwrap();
  assert_eq!((report.inserted, report.ignored), (1, 1));

  let FactBatch::Wages(rows) = s.list_facts(FactTable::Wages).await.unwrap() else {
    panic!("expected wage rows")
  };
  assert_eq!(rows, vec![fact]);
}

#[tokio::test]
async fn employment_facts_roundtrip() {
  let s = store().await;
  let (period_id, indicator_id, geography_id) = keys(&s).await;

  let fact = EmploymentFact {
    period_id,
    indicator_id,
    geography_id,
    sex: "Ambos sexos".into(),
    age_group: Some("Todas las edades".into()),
    working_time: None,
    contract_type: None,
    value: 12.5,
  };

  s.insert_facts(FactBatch::Employment(vec![fact.clone()])).await.unwrap();
  assert_eq!(s.count_facts(FactTable::Employment).await.unwrap(), 1);
  assert_eq!(s.count_facts(FactTable::Prices).await.unwrap(), 0);

  let FactBatch::Employment(rows) = s.list_facts(FactTable::Employment).await.unwrap() else {
    panic!("expected employment rows")
  };
  assert_eq!(rows, vec![fact]);
}

#[tokio::test]
async fn empty_batch_is_a_no_op() {
  let s = store().await;
  let report = s.insert_facts(FactBatch::empty(FactTable::Wages)).await.unwrap();
  assert_eq!((report.inserted, report.ignored), (0, 0));
}

#[tokio::test]
async fn dangling_reference_rolls_back_whole_batch() {
  let s = store().await;
  let (period_id, indicator_id, geography_id) = keys(&s).await;

  let good = PriceFact {
    period_id,
    indicator_id,
    geography_id,
    category: "IPC General".into(),
    value: 100.0,
  };
  let bad = PriceFact {
    geography_id: DimensionId(4242),
    ..good.clone()
  };

  let err = s.insert_facts(FactBatch::Prices(vec![good, bad])).await;
  assert!(err.is_err());
  assert_eq!(s.count_facts(FactTable::Prices).await.unwrap(), 0);
}
