//! Price families: consumer prices (IPC) and housing prices (IPV).
//!
//! Only index levels and year-over-year variations are kept. The data-type
//! tokens are matched case-sensitively as upstream spells them.

use ine_core::source::Field;
use ine_labels::ParsedLabel;

use super::{Classification, PriceDetail, SeriesDraft, geography, indicator, require};

const INDEX_TOKEN: &str = "Índice";
const ANNUAL_VARIATION_TOKEN: &str = "Variación anual";

const INDEX_UNIT: &str = "Índice";
const VARIATION_UNIT: &str = "%";

/// Which of the two retained measures a series carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Measure {
  Index,
  AnnualVariation,
}

impl Measure {
  fn of(data_type: &str) -> Option<Self> {
    if data_type.contains(ANNUAL_VARIATION_TOKEN) {
      Some(Self::AnnualVariation)
    } else if data_type.contains(INDEX_TOKEN) {
      Some(Self::Index)
    } else {
      None
    }
  }

  fn unit(self) -> &'static str {
    match self {
      Self::Index => INDEX_UNIT,
      Self::AnnualVariation => VARIATION_UNIT,
    }
  }
}

/// Indicator names for one price family.
struct PriceNames {
  index:            &'static str,
  annual_variation: &'static str,
}

impl PriceNames {
  fn for_measure(&self, m: Measure) -> &'static str {
    match m {
      Measure::Index => self.index,
      Measure::AnnualVariation => self.annual_variation,
    }
  }
}

const CONSUMER: PriceNames = PriceNames {
  index:            "IPC_Indice_Base_2021_INE",
  annual_variation: "IPC_Variacion_Anual",
};

const HOUSING: PriceNames = PriceNames {
  index:            "IPV_Indice",
  annual_variation: "IPV_Variacion_Anual",
};

fn draft(
  label: &ParsedLabel,
  names: &PriceNames,
  measure: Measure,
  category: String,
) -> Classification<PriceDetail> {
  Ok(Some(SeriesDraft {
    indicator: indicator(names.for_measure(measure), measure.unit())?,
    geography: geography(label)?,
    detail:    PriceDetail { category },
  }))
}

/// Consumer prices: every category is kept; the general index is renamed.
pub fn classify_consumer(label: &ParsedLabel) -> Classification<PriceDetail> {
  let Some(measure) = Measure::of(require(label, Field::DataType)?) else {
    return Ok(None);
  };
  let category = match require(label, Field::Category)? {
    "Índice general" => "IPC General".to_owned(),
    other => other.to_owned(),
  };
  draft(label, &CONSUMER, measure, category)
}

/// Housing prices: only the general category survives.
pub fn classify_housing(label: &ParsedLabel) -> Classification<PriceDetail> {
  let Some(measure) = Measure::of(require(label, Field::DataType)?) else {
    return Ok(None);
  };
  if require(label, Field::Category)? != "General" {
    return Ok(None);
  }
  draft(label, &HOUSING, measure, "IPV General".to_owned())
}

#[cfg(test)]
mod tests {
  use ine_core::source::{LabelSchema, SourceFamily};

  use super::*;
  use crate::mapper::SkipReason;

  fn consumer(label: &str) -> Classification<PriceDetail> {
    let schema = SourceFamily::ConsumerPrices.default_schema();
    classify_consumer(&ine_labels::parse(&schema, label).unwrap())
  }

  fn housing(label: &str) -> Classification<PriceDetail> {
    let schema = SourceFamily::HousingPrices.default_schema();
    classify_housing(&ine_labels::parse(&schema, label).unwrap())
  }

  #[test]
  fn general_index_is_renamed() {
    let d = consumer("Total Nacional. Índice general. Índice. ").unwrap().unwrap();
    assert_eq!(d.indicator.name(), "IPC_Indice_Base_2021_INE");
    assert_eq!(d.indicator.unit(), Some("Índice"));
    assert_eq!(d.geography.name(), "Total Nacional");
    assert_eq!(d.detail, PriceDetail { category: "IPC General".into() });
  }

  #[test]
  fn other_categories_pass_through() {
    let d = consumer("Galicia. Alimentos y bebidas no alcohólicas. Variación anual.")
      .unwrap()
      .unwrap();
    assert_eq!(d.indicator.name(), "IPC_Variacion_Anual");
    assert_eq!(d.indicator.unit(), Some("%"));
    assert_eq!(
      d.detail,
      PriceDetail { category: "Alimentos y bebidas no alcohólicas".into() }
    );
  }

  #[test]
  fn monthly_variation_is_discarded() {
    assert_eq!(consumer("Total Nacional. Índice general. Variación mensual."), Ok(None));
    assert_eq!(
      consumer("Total Nacional. Índice general. Variación en lo que va de año."),
      Ok(None)
    );
  }

  #[test]
  fn data_type_match_is_case_sensitive() {
    assert_eq!(consumer("Total Nacional. Índice general. VARIACIÓN ANUAL."), Ok(None));
  }

  #[test]
  fn housing_keeps_only_general() {
    let d = housing("Andalucía. General. Índice.").unwrap().unwrap();
    assert_eq!(d.indicator.name(), "IPV_Indice");
    assert_eq!(d.detail, PriceDetail { category: "IPV General".into() });

    assert_eq!(housing("Andalucía. Vivienda nueva. Índice."), Ok(None));
    assert_eq!(housing("Andalucía. General. Variación trimestral."), Ok(None));
  }

  #[test]
  fn missing_data_type_field_is_malformed() {
    let schema = LabelSchema::from_names(&["geography", "category"]).unwrap();
    let label = ine_labels::parse(&schema, "Total Nacional. Índice general.").unwrap();
    assert_eq!(classify_consumer(&label), Err(SkipReason::MalformedLabel));
  }
}
