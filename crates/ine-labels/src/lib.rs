//! Series label parser for INE time-series names.
//!
//! Upstream labels are period-delimited free text such as
//! `"Tasa de paro de la población. Ambos sexos. Andalucía. Todas las edades. "`.
//! A [`LabelSchema`] says which semantic [`Field`] sits at each position.
//! Pure synchronous; no HTTP or database dependencies.
//!
//! # Quick start
//!
//! ```no_run
//! use ine_core::source::{Field, SourceFamily};
//!
//! let schema = SourceFamily::ConsumerPrices.default_schema();
//! let parsed = ine_labels::parse(&schema, "Total Nacional. Índice general. Índice. ").unwrap();
//! assert_eq!(parsed.get(Field::Category), Some("Índice general"));
//! ```

mod check;
pub mod error;
mod parse;

use std::collections::BTreeMap;

pub use check::{SchemaCheck, check_samples};
pub use error::{Error, Result};
use ine_core::source::{Field, LabelSchema};

// ─── Public types ────────────────────────────────────────────────────────────

/// The attributes extracted from one label.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedLabel {
  fields: BTreeMap<Field, String>,
}

impl ParsedLabel {
  /// The trimmed value of `field`, or `None` if the schema does not extract it.
  pub fn get(&self, field: Field) -> Option<&str> {
    self.fields.get(&field).map(String::as_str)
  }

  pub fn len(&self) -> usize { self.fields.len() }

  pub fn is_empty(&self) -> bool { self.fields.is_empty() }
}

// ─── Public API ──────────────────────────────────────────────────────────────

/// Extract every field of `schema` from `label`.
///
/// Fails with [`Error::TooFewSegments`] when a referenced position does not
/// exist. Extra trailing segments are ignored.
pub fn parse(schema: &LabelSchema, label: &str) -> Result<ParsedLabel> {
  parse::parse_label(schema, label)
}
