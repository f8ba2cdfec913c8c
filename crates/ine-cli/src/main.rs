//! `ine-etl` — load INE statistical tables into a local SQLite star schema.
//!
//! # Usage
//!
//! ```
//! ine-etl                                 # every configured table, live API
//! ine-etl --only 50913 25171              # a subset, in the given order
//! ine-etl --from-dir ./saved --json       # replay saved responses
//! ```

mod client;
mod settings;

use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use client::{DirFetcher, HttpFetcher};
use ine_core::store::StatStore;
use ine_pipeline::{Fetcher, Pipeline, RunSummary, SourceRegistry};
use ine_store_sqlite::SqliteStore;
use settings::EtlConfig;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "ine-etl", version, about = "Load INE statistical tables into SQLite")]
struct Args {
  /// Path to the TOML configuration file.
  #[arg(short, long, value_name = "FILE", default_value = "ine-etl.toml")]
  config: PathBuf,

  /// Read `<code>.json` files from this directory instead of the API.
  #[arg(long, value_name = "DIR")]
  from_dir: Option<PathBuf>,

  /// Only process these source codes.
  #[arg(long, value_name = "CODE", num_args = 1..)]
  only: Vec<String>,

  /// Print the run summary as JSON.
  #[arg(long)]
  json: bool,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let args = Args::parse();

  let cfg = EtlConfig::load(&args.config)?;
  let registry = SourceRegistry::from_specs(cfg.source_specs()?)
    .context("invalid source configuration")?;

  let store_path = settings::expand_tilde(&cfg.store_path);
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;
  let store = Arc::new(store);

  let summary = match &args.from_dir {
    Some(dir) => {
      tracing::info!(dir = %dir.display(), "reading saved tables");
      run(store, DirFetcher::new(dir), registry, &args.only).await
    }
    None => {
      let fetcher =
        HttpFetcher::new(&cfg.api_base_url, Duration::from_secs(cfg.timeout_secs))?;
      run(store, fetcher, registry, &args.only).await
    }
  };

  if args.json {
    println!(
      "{}",
      serde_json::to_string_pretty(&summary).context("failed to serialise summary")?
    );
  } else {
    println!("{summary}");
  }

  Ok(())
}

async fn run<S: StatStore, F: Fetcher>(
  store: Arc<S>,
  fetcher: F,
  registry: SourceRegistry,
  only: &[String],
) -> RunSummary {
  let pipeline = Pipeline::new(store, fetcher, registry);
  if only.is_empty() {
    pipeline.run_all().await
  } else {
    pipeline.run(only).await
  }
}
