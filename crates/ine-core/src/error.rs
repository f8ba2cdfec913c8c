//! Error types for `ine-core`.

use thiserror::Error;

use crate::dimension::DimensionKind;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown quarter code: {0}")]
  UnknownQuarterCode(u32),

  #[error("month out of range: {0}")]
  InvalidMonth(u32),

  #[error("year outside the supported calendar: {0}")]
  InvalidYear(i32),

  #[error("empty {0} name")]
  EmptyDimensionName(DimensionKind),

  #[error("unknown label field: {0:?}")]
  UnknownField(String),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
