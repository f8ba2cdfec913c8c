//! Error type for `ine-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] ine_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date parse error: {0}")]
  DateParse(String),

  #[error("corrupt row in {table}: {detail}")]
  CorruptRow { table: &'static str, detail: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
