//! Employment families from the labour force survey.

use ine_core::source::Field;
use ine_labels::ParsedLabel;

use super::{
  Classification, EmploymentDetail, SeriesDraft, geography, indicator, optional, require,
};

const UNEMPLOYMENT_INDICATOR: &str = "Tasa_Paro";
const UNEMPLOYMENT_UNIT: &str = "%";

const EMPLOYEES_UNIT: &str = "Miles de personas";
const WORKING_TIME_TOTAL: &str = "Total";

/// Contract values kept from the temporariness table, as
/// `(label value, indicator name)`. Compared case-insensitively.
const CONTRACT_INDICATORS: &[(&str, &str)] = &[
  ("Total asalariados", "Asalariados_Total"),
  ("Asalariados con contrato temporal", "Asalariados_Temporal"),
];

/// Unemployment rate: every series is kept.
pub fn classify_unemployment(label: &ParsedLabel) -> Classification<EmploymentDetail> {
  Ok(Some(SeriesDraft {
    indicator: indicator(UNEMPLOYMENT_INDICATOR, UNEMPLOYMENT_UNIT)?,
    geography: geography(label)?,
    detail:    EmploymentDetail {
      sex:           require(label, Field::Sex)?.to_owned(),
      age_group:     optional(label, Field::AgeGroup),
      working_time:  None,
      contract_type: None,
    },
  }))
}

/// Temporariness: total working time only, and only the total and temporary
/// employee counts.
pub fn classify_temporariness(label: &ParsedLabel) -> Classification<EmploymentDetail> {
  let working_time = require(label, Field::WorkingTime)?;
  if !working_time.eq_ignore_ascii_case(WORKING_TIME_TOTAL) {
    return Ok(None);
  }

  let contract = require(label, Field::ContractType)?;
  let Some((_, name)) = CONTRACT_INDICATORS
    .iter()
    .find(|(value, _)| value.to_lowercase() == contract.to_lowercase())
  else {
    return Ok(None);
  };

  Ok(Some(SeriesDraft {
    indicator: indicator(name, EMPLOYEES_UNIT)?,
    geography: geography(label)?,
    detail:    EmploymentDetail {
      sex:           require(label, Field::Sex)?.to_owned(),
      age_group:     optional(label, Field::AgeGroup),
      working_time:  Some(working_time.to_owned()),
      contract_type: Some(contract.to_owned()),
    },
  }))
}

#[cfg(test)]
mod tests {
  use ine_core::source::SourceFamily;

  use super::*;
  use crate::mapper::SkipReason;

  fn temporariness(label: &str) -> Classification<EmploymentDetail> {
    let schema = SourceFamily::Temporariness.default_schema();
    classify_temporariness(&ine_labels::parse(&schema, label).unwrap())
  }

  #[test]
  fn unemployment_is_always_kept() {
    let schema = SourceFamily::UnemploymentRate.default_schema();
    let label = ine_labels::parse(
      &schema,
      "Tasa de paro de la población. Ambos sexos. Andalucía. Todas las edades.",
    )
    .unwrap();
    let d = classify_unemployment(&label).unwrap().unwrap();
    assert_eq!(d.indicator.name(), "Tasa_Paro");
    assert_eq!(d.indicator.unit(), Some("%"));
    assert_eq!(d.geography.name(), "Andalucía");
    assert_eq!(
      d.detail,
      EmploymentDetail {
        sex:           "Ambos sexos".into(),
        age_group:     Some("Todas las edades".into()),
        working_time:  None,
        contract_type: None,
      }
    );
  }

  #[test]
  fn total_and_temporary_employees_are_kept() {
    let d = temporariness("Ambos sexos. Total Nacional. Total. Total asalariados.")
      .unwrap()
      .unwrap();
    assert_eq!(d.indicator.name(), "Asalariados_Total");
    assert_eq!(d.indicator.unit(), Some("Miles de personas"));

    let d = temporariness(
      "Mujeres. Total Nacional. Total. Asalariados con contrato temporal.",
    )
    .unwrap()
    .unwrap();
    assert_eq!(d.indicator.name(), "Asalariados_Temporal");
  }

  #[test]
  fn part_and_full_time_are_discarded() {
    for wt in ["Jornada a tiempo parcial", "Jornada a tiempo completo"] {
      for contract in ["Total asalariados", "Asalariados con contrato temporal"] {
        let label = format!("Ambos sexos. Total Nacional. {wt}. {contract}.");
        assert_eq!(temporariness(&label), Ok(None), "{label}");
      }
    }
  }

  #[test]
  fn other_contracts_are_discarded() {
    assert_eq!(
      temporariness("Ambos sexos. Total Nacional. Total. Asalariados con contrato indefinido."),
      Ok(None)
    );
  }

  #[test]
  fn unemployment_without_sex_is_malformed() {
    let schema = ine_core::source::LabelSchema::from_names(&["indicator", "geography"]).unwrap();
    let label = ine_labels::parse(&schema, "Tasa de paro. Galicia.").unwrap();
    assert_eq!(classify_unemployment(&label), Err(SkipReason::MalformedLabel));
  }
}
