//! The run loop: one source code at a time, fetch → map → insert.

use std::sync::Arc;

use ine_core::store::StatStore;
use tracing::{info, warn};

use crate::{
  error::Error,
  fetch::Fetcher,
  mapper,
  registry::SourceRegistry,
  summary::{RunSummary, SourceOutcome, SourceSummary},
};

/// Drives sources through a store. Every failure is confined to the source
/// code it happened in; the run itself never fails.
pub struct Pipeline<S, F> {
  store:    Arc<S>,
  fetcher:  F,
  registry: SourceRegistry,
}

impl<S: StatStore, F: Fetcher> Pipeline<S, F> {
  pub fn new(store: Arc<S>, fetcher: F, registry: SourceRegistry) -> Self {
    Self { store, fetcher, registry }
  }

  pub fn store(&self) -> &Arc<S> { &self.store }

  pub fn registry(&self) -> &SourceRegistry { &self.registry }

  /// Process every registered source in registration order.
  pub async fn run_all(&self) -> RunSummary {
    let codes: Vec<String> = self.registry.codes().map(str::to_owned).collect();
    self.run(&codes).await
  }

  /// Process `codes` sequentially, in the given order.
  pub async fn run<C: AsRef<str>>(&self, codes: &[C]) -> RunSummary {
    let mut summary = RunSummary::default();
    for code in codes {
      summary.sources.push(self.process(code.as_ref()).await);
    }
    info!(
      sources = summary.sources.len(),
      failed = summary.failed(),
      inserted = summary.inserted(),
      ignored = summary.ignored(),
      "run finished"
    );
    summary
  }

  /// Fetch, map and insert a single source code.
  pub async fn process(&self, code: &str) -> SourceSummary {
    let route = match self.registry.route(code) {
      Ok(route) => route,
      Err(e) => {
        warn!(code, error = %e, "skipping unmapped source code");
        return SourceSummary::new(code, SourceOutcome::Unmapped);
      }
    };

    let mut summary = SourceSummary::new(code, SourceOutcome::Empty);
    summary.family = Some(route.spec.family);
    summary.table = Some(route.table);

    let series = match self.fetcher.fetch(code).await {
      Ok(series) => series,
      Err(e) => {
        warn!(code, error = %e, "fetch failed");
        summary.outcome = SourceOutcome::FetchFailed { error: e.to_string() };
        return summary;
      }
    };

    let check = ine_labels::check_samples(
      &route.spec.schema,
      series.iter().map(|s| s.label.as_str()),
    );
    if !check.is_clean() {
      warn!(
        code,
        sampled = check.sampled,
        short = check.short,
        long = check.long,
        short_examples = ?check.short_examples,
        long_examples = ?check.long_examples,
        "labels do not match the configured schema"
      );
    }

    let mapped = match mapper::map_series(self.store.as_ref(), route, &series).await {
      Ok(mapped) => mapped,
      Err(e) => return self.store_failed(summary, e),
    };

    summary.series_fetched = mapped.series_fetched;
    summary.rows_fetched = mapped.rows_fetched;
    summary.rows_mapped = mapped.batch.len();
    summary.skipped = mapped.skipped;

    if mapped.batch.is_empty() {
      info!(code, family = %route.spec.family, rows_fetched = summary.rows_fetched, "no rows to insert");
      return summary;
    }

    match self.store.insert_facts(mapped.batch).await {
      Ok(report) => {
        summary.inserted = report.inserted;
        summary.ignored = report.ignored;
        summary.outcome = SourceOutcome::Loaded;
        info!(
          code,
          family = %route.spec.family,
          table = %route.table,
          rows_fetched = summary.rows_fetched,
          rows_mapped = summary.rows_mapped,
          rows_skipped = summary.rows_skipped(),
          inserted = report.inserted,
          ignored = report.ignored,
          "source loaded"
        );
        summary
      }
      Err(e) => self.store_failed(summary, e),
    }
  }

  fn store_failed(&self, mut summary: SourceSummary, e: S::Error) -> SourceSummary {
    let e = Error::Store(Box::new(e));
    warn!(code = %summary.code, error = %e, "store failed");
    summary.outcome = SourceOutcome::StoreFailed { error: e.to_string() };
    summary
  }
}
