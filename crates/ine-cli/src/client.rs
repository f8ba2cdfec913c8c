//! Fetcher implementations: the live `DATOS_TABLA` endpoint and a directory
//! of saved responses.

use std::{
  future::Future,
  path::PathBuf,
  time::Duration,
};

use anyhow::Context;
use ine_core::series::Series;
use ine_pipeline::{FetchError, Fetcher};
use reqwest::Client;

// ─── HTTP ─────────────────────────────────────────────────────────────────────

/// Async HTTP client for the statistics API.
#[derive(Clone)]
pub struct HttpFetcher {
  client:   Client,
  base_url: String,
  timeout:  Duration,
}

impl HttpFetcher {
  pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
    let client = Client::builder()
      .timeout(timeout)
      .user_agent(concat!("ine-etl/", env!("CARGO_PKG_VERSION")))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, base_url: base_url.trim_end_matches('/').to_string(), timeout })
  }

  fn url(&self, code: &str) -> String { format!("{}/DATOS_TABLA/{}", self.base_url, code) }

  async fn get(&self, code: &str) -> Result<Vec<Series>, FetchError> {
    let url = self.url(code);
    tracing::debug!(%url, "fetching table");

    let resp = self.client.get(&url).send().await.map_err(|e| self.transport(e))?;
    if !resp.status().is_success() {
      return Err(FetchError::Status(resp.status().as_u16()));
    }
    let body = resp.text().await.map_err(|e| self.transport(e))?;
    Series::parse_batch(&body).map_err(|e| FetchError::Payload(e.to_string()))
  }

  fn transport(&self, e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
      FetchError::Timeout(self.timeout)
    } else {
      FetchError::Transport(e.to_string())
    }
  }
}

impl Fetcher for HttpFetcher {
  fn fetch<'a>(
    &'a self,
    code: &'a str,
  ) -> impl Future<Output = Result<Vec<Series>, FetchError>> + Send + 'a {
    self.get(code)
  }
}

// ─── Directory ────────────────────────────────────────────────────────────────

/// Reads `{dir}/{code}.json`, for offline runs and replays.
#[derive(Debug, Clone)]
pub struct DirFetcher {
  dir: PathBuf,
}

impl DirFetcher {
  pub fn new(dir: impl Into<PathBuf>) -> Self { Self { dir: dir.into() } }

  fn path(&self, code: &str) -> PathBuf { self.dir.join(format!("{code}.json")) }

  async fn read(&self, code: &str) -> Result<Vec<Series>, FetchError> {
    let body = tokio::fs::read_to_string(self.path(code)).await?;
    Series::parse_batch(&body).map_err(|e| FetchError::Payload(e.to_string()))
  }
}

impl Fetcher for DirFetcher {
  fn fetch<'a>(
    &'a self,
    code: &'a str,
  ) -> impl Future<Output = Result<Vec<Series>, FetchError>> + Send + 'a {
    self.read(code)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("ine-etl-{name}-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
  }

  #[test]
  fn url_joins_base_and_code() {
    let f = HttpFetcher::new("https://example.org/api/", Duration::from_secs(1)).unwrap();
    assert_eq!(f.url("50913"), "https://example.org/api/DATOS_TABLA/50913");
  }

  #[tokio::test]
  async fn dir_fetcher_reads_saved_table() {
    let dir = scratch_dir("read");
    std::fs::write(
      dir.join("50913.json"),
      r#"[{ "Nombre": "Total Nacional. Índice general. Índice.",
            "Data": [{ "Anyo": 2022, "FK_Periodo": 3, "Valor": 104.2 }] }]"#,
    )
    .unwrap();

    let series = DirFetcher::new(&dir).fetch("50913").await.unwrap();
    assert_eq!(series.len(), 1);
    assert_eq!(series[0].observations[0].value, Some(104.2));

    std::fs::remove_dir_all(dir).unwrap();
  }

  #[tokio::test]
  async fn dir_fetcher_errors() {
    let dir = scratch_dir("errors");
    std::fs::write(dir.join("1.json"), "{ not json").unwrap();
    let fetcher = DirFetcher::new(&dir);

    assert!(matches!(fetcher.fetch("1").await, Err(FetchError::Payload(_))));
    assert!(matches!(fetcher.fetch("2").await, Err(FetchError::Io(_))));

    std::fs::remove_dir_all(dir).unwrap();
  }
}
