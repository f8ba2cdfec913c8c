//! Wage families: the quarterly labour cost survey and the two annual wage
//! structure tables. All three land in the wage fact table in euros.

use ine_core::source::Field;
use ine_labels::ParsedLabel;

use super::{
  Classification, SeriesDraft, WageDetail, geography, indicator, optional, require,
};

const UNIT: &str = "Euros";

const LABOUR_COST_TOKEN: &str = "Coste laboral total";
const LABOUR_COST_INDICATOR: &str = "Salario_Coste_Trimestral";

const OCCUPATION_INDICATOR: &str = "Salario_Anual_Ocupacion";

/// Distribution statistics kept from the percentile table, as
/// `(label token, indicator name)`. Tokens match case-insensitively as
/// substrings.
pub const PERCENTILE_STATISTICS: &[(&str, &str)] = &[
  ("Media", "Salario Anual Media"),
  ("Mediana", "Salario Anual Mediana"),
  ("Percentil 10", "Salario Anual Percentil 10"),
  ("Cuartil inferior", "Salario Anual Cuartil inferior"),
];

/// The indicator for a statistic field. The longest matching token wins, so
/// `"Mediana"` never falls into `"Media"`.
pub fn match_statistic(field: &str) -> Option<&'static str> {
  let haystack = field.to_lowercase();
  PERCENTILE_STATISTICS
    .iter()
    .filter(|(token, _)| haystack.contains(&token.to_lowercase()))
    .max_by_key(|(token, _)| token.len())
    .map(|(_, name)| *name)
}

fn draft(
  label: &ParsedLabel,
  indicator_name: &str,
  sex: Option<String>,
  sector: Option<String>,
  occupation: Option<String>,
) -> Classification<WageDetail> {
  Ok(Some(SeriesDraft {
    indicator: indicator(indicator_name, UNIT)?,
    geography: geography(label)?,
    detail:    WageDetail { sex, sector, occupation },
  }))
}

/// Quarterly labour cost: only total labour cost per worker is kept.
pub fn classify_labour_cost(label: &ParsedLabel) -> Classification<WageDetail> {
  if !require(label, Field::Indicator)?.contains(LABOUR_COST_TOKEN) {
    return Ok(None);
  }
  draft(
    label,
    LABOUR_COST_INDICATOR,
    optional(label, Field::Sex),
    optional(label, Field::Sector),
    None,
  )
}

/// Annual distribution statistics: only the configured four are kept.
pub fn classify_percentiles(label: &ParsedLabel) -> Classification<WageDetail> {
  let Some(name) = match_statistic(require(label, Field::Indicator)?) else {
    return Ok(None);
  };
  draft(label, name, optional(label, Field::Sex), None, None)
}

/// Annual wages by occupation: always kept.
pub fn classify_occupation(label: &ParsedLabel) -> Classification<WageDetail> {
  let occupation = require(label, Field::Occupation)?.to_owned();
  draft(
    label,
    OCCUPATION_INDICATOR,
    optional(label, Field::Sex),
    None,
    Some(occupation),
  )
}
