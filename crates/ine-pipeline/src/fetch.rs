//! The fetch collaborator: turns a source code into a list of series.
//!
//! The pipeline only sees this trait. Concrete transports (HTTP, files on
//! disk) live in the binary.

use std::{future::Future, time::Duration};

use ine_core::series::Series;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
  #[error("request timed out after {0:?}")]
  Timeout(Duration),

  #[error("upstream returned HTTP {0}")]
  Status(u16),

  #[error("transport error: {0}")]
  Transport(String),

  #[error("invalid payload: {0}")]
  Payload(String),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
}

/// Retrieves the raw series of one upstream table.
pub trait Fetcher: Send + Sync {
  fn fetch<'a>(
    &'a self,
    code: &'a str,
  ) -> impl Future<Output = Result<Vec<Series>, FetchError>> + Send + 'a;
}
