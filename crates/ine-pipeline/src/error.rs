//! Error types for `ine-pipeline`.

use ine_core::source::Field;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("no source registered for code {0:?}")]
  UnmappedSource(String),

  #[error("source {0:?} is registered twice")]
  DuplicateSource(String),

  #[error("schema for source {code:?} lacks required field {field}")]
  SchemaMissingField { code: String, field: Field },

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
