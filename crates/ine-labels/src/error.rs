//! Error types for the series label parser.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("label has {found} segments, schema needs {required}: {label:?}")]
  TooFewSegments {
    label:    String,
    found:    usize,
    required: usize,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
