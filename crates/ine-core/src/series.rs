//! Upstream series as returned by the statistics API.
//!
//! The field names follow the `DATOS_TABLA` JSON payload: a series is a
//! free-text label (`Nombre`) plus its observations (`Data`).

use serde::{Deserialize, Serialize};

use crate::Result;

/// One upstream time series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
  /// Upstream series code, when the payload carries one.
  #[serde(rename = "COD", default, skip_serializing_if = "Option::is_none")]
  pub code:         Option<String>,
  /// Period-delimited label, e.g. `"Total Nacional. Índice general. Índice. "`.
  #[serde(rename = "Nombre")]
  pub label:        String,
  #[serde(rename = "Data", default)]
  pub observations: Vec<Observation>,
}

/// One dated value of a [`Series`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
  #[serde(rename = "Anyo")]
  pub year:        i32,
  /// Month number, quarter code or annual marker depending on the family.
  #[serde(rename = "FK_Periodo")]
  pub period_code: u32,
  #[serde(rename = "Valor", default)]
  pub value:       Option<f64>,
  /// Statistical secrecy: the value is withheld even if present.
  #[serde(rename = "Secreto", default)]
  pub secret:      bool,
}

impl Observation {
  /// The publishable value, if any. Nulls, secret cells and non-finite
  /// numbers all count as missing.
  pub fn usable_value(&self) -> Option<f64> {
    if self.secret {
      return None;
    }
    self.value.filter(|v| v.is_finite())
  }
}

impl Series {
  /// Decode a `DATOS_TABLA` response body.
  pub fn parse_batch(json: &str) -> Result<Vec<Series>> {
    Ok(serde_json::from_str(json)?)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn decodes_upstream_payload() {
    let json = r#"[
      {
        "COD": "IPC251852",
        "Nombre": "Total Nacional. Índice general. Índice. ",
        "FK_Unidad": 133,
        "Data": [
          { "Fecha": 1646089200000, "FK_TipoDato": 1, "FK_Periodo": 3,
            "Anyo": 2022, "Valor": 104.2, "Secreto": false },
          { "Anyo": 2022, "FK_Periodo": 4, "Valor": null }
        ]
      },
      { "Nombre": "Andalucía. General. Índice." }
    ]"#;

    let batch = Series::parse_batch(json).unwrap();
    assert_eq!(batch.len(), 2);
    assert_eq!(batch[0].code.as_deref(), Some("IPC251852"));
    assert_eq!(batch[0].observations.len(), 2);
    assert_eq!(batch[0].observations[0].usable_value(), Some(104.2));
    assert_eq!(batch[0].observations[1].usable_value(), None);
    assert!(batch[1].observations.is_empty());
  }

  #[test]
  fn secret_values_are_unusable() {
    let obs = Observation { year: 2020, period_code: 19, value: Some(1.0), secret: true };
    assert_eq!(obs.usable_value(), None);
  }
}
