//! Positional label extraction.
//!
//! Pipeline:
//!   raw &str
//!     └─ split_segments()  → Vec<&str>   (split on '.', trim, drop empties)
//!          └─ parse_label() → ParsedLabel (position → Field via LabelSchema)

use std::collections::BTreeMap;

use ine_core::source::LabelSchema;

use crate::{
  ParsedLabel,
  error::{Error, Result},
};

pub(crate) fn split_segments(label: &str) -> Vec<&str> {
  label
    .split('.')
    .map(str::trim)
    .filter(|s| !s.is_empty())
    .collect()
}

pub(crate) fn parse_label(schema: &LabelSchema, label: &str) -> Result<ParsedLabel> {
  let segments = split_segments(label);
  let required = schema.required_segments();

  if segments.len() < required {
    return Err(Error::TooFewSegments {
      label: label.to_owned(),
      found: segments.len(),
      required,
    });
  }

  let fields: BTreeMap<_, _> = schema
    .extracted()
    .map(|(pos, field)| (field, segments[pos].to_owned()))
    .collect();

  Ok(ParsedLabel { fields })
}

#[cfg(test)]
mod tests {
  use ine_core::source::{Field, SourceFamily};

  use super::*;

  // ── Segmenting ──────────────────────────────────────────────────────────

  #[test]
  fn segments_are_trimmed_and_empties_dropped() {
    assert_eq!(
      split_segments(" Total Nacional.  Índice general . Índice. "),
      vec!["Total Nacional", "Índice general", "Índice"]
    );
    assert_eq!(split_segments("a..b. ."), vec!["a", "b"]);
    assert!(split_segments("  ").is_empty());
  }

  // ── Family layouts ──────────────────────────────────────────────────────

  #[test]
  fn consumer_price_label() {
    let schema = SourceFamily::ConsumerPrices.default_schema();
    let parsed = parse_label(&schema, "Total Nacional. Índice general. Índice. ").unwrap();
    assert_eq!(parsed.get(Field::Geography), Some("Total Nacional"));
    assert_eq!(parsed.get(Field::Category), Some("Índice general"));
    assert_eq!(parsed.get(Field::DataType), Some("Índice"));
    assert_eq!(parsed.len(), 3);
  }

  #[test]
  fn unemployment_label() {
    let schema = SourceFamily::UnemploymentRate.default_schema();
    let parsed = parse_label(
      &schema,
      "Tasa de paro de la población. Mujeres. Andalucía. De 16 a 19 años. ",
    )
    .unwrap();
    assert_eq!(parsed.get(Field::Indicator), Some("Tasa de paro de la población"));
    assert_eq!(parsed.get(Field::Sex), Some("Mujeres"));
    assert_eq!(parsed.get(Field::Geography), Some("Andalucía"));
    assert_eq!(parsed.get(Field::AgeGroup), Some("De 16 a 19 años"));
  }

  #[test]
  fn skipped_positions_are_not_extracted() {
    let schema = LabelSchema::new(vec![Field::Skip, Field::Sex]);
    let parsed = parse_label(&schema, "Ignored. Hombres.").unwrap();
    assert_eq!(parsed.len(), 1);
    assert_eq!(parsed.get(Field::Sex), Some("Hombres"));
    assert_eq!(parsed.get(Field::Skip), None);
  }

  #[test]
  fn extra_segments_are_tolerated() {
    let schema = SourceFamily::HousingPrices.default_schema();
    let parsed = parse_label(&schema, "Nacional. General. Índice. Base 2015.").unwrap();
    assert_eq!(parsed.get(Field::DataType), Some("Índice"));
  }

  // ── Failures ────────────────────────────────────────────────────────────

  #[test]
  fn too_few_segments_is_an_error() {
    let schema = SourceFamily::UnemploymentRate.default_schema();
    let err = parse_label(&schema, "Tasa de paro. Hombres.").unwrap_err();
    assert!(matches!(
      err,
      Error::TooFewSegments { found: 2, required: 4, .. }
    ));
  }

  #[test]
  fn empty_segments_do_not_count_towards_the_schema() {
    let schema = SourceFamily::ConsumerPrices.default_schema();
    assert!(parse_label(&schema, "Total Nacional. . Índice.").is_err());
  }
}
