//! Run configuration, deserialised from `ine-etl.toml` and `INE_*`
//! environment variables.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ine_core::source::{LabelSchema, SourceFamily, SourceSpec};
use serde::Deserialize;

pub const DEFAULT_API_BASE_URL: &str = "https://servicios.ine.es/wstempus/jsCache/ES";

#[derive(Debug, Clone, Deserialize)]
pub struct EtlConfig {
  #[serde(default = "default_store_path")]
  pub store_path:   PathBuf,
  #[serde(default = "default_api_base_url")]
  pub api_base_url: String,
  #[serde(default = "default_timeout_secs")]
  pub timeout_secs: u64,
  /// Overrides and additions to the built-in source table.
  #[serde(default)]
  pub sources:      Vec<SourceConfig>,
}

/// One `[[sources]]` entry.
///
/// ```toml
/// [[sources]]
/// code   = "50913"
/// family = "consumer_prices"
/// fields = ["geography", "category", "data_type"]
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
  pub code:   String,
  pub family: SourceFamily,
  /// Label layout; the family default when absent.
  #[serde(default)]
  pub fields: Option<Vec<String>>,
}

fn default_store_path() -> PathBuf { PathBuf::from("ine-etl.db") }

fn default_api_base_url() -> String { DEFAULT_API_BASE_URL.to_string() }

fn default_timeout_secs() -> u64 { 10 }

impl EtlConfig {
  /// Layer the optional file at `path` and the environment.
  pub fn load(path: &Path) -> Result<Self> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("INE"))
      .build()
      .context("failed to read config file")?
      .try_deserialize()
      .context("failed to deserialise EtlConfig")
  }

  /// The built-in sources with configured entries applied on top. An entry
  /// whose code is already known replaces it in place; new codes are
  /// appended.
  pub fn source_specs(&self) -> Result<Vec<SourceSpec>> {
    let mut specs = SourceSpec::defaults();
    for source in &self.sources {
      let mut spec = SourceSpec::new(source.code.trim(), source.family);
      if let Some(fields) = &source.fields {
        let schema = LabelSchema::from_names(fields)
          .with_context(|| format!("invalid fields for source {}", source.code))?;
        spec = spec.with_schema(schema);
      }
      match specs.iter_mut().find(|s| s.code == spec.code) {
        Some(existing) => *existing = spec,
        None => specs.push(spec),
      }
    }
    Ok(specs)
  }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use ine_core::source::{DEFAULT_SOURCES, Field};

  use super::*;

  fn parse(toml: &str) -> EtlConfig {
    config::Config::builder()
      .add_source(config::File::from_str(toml, config::FileFormat::Toml))
      .build()
      .unwrap()
      .try_deserialize()
      .unwrap()
  }

  #[test]
  fn empty_file_uses_defaults() {
    let cfg = parse("");
    assert_eq!(cfg.store_path, PathBuf::from("ine-etl.db"));
    assert_eq!(cfg.api_base_url, DEFAULT_API_BASE_URL);
    assert_eq!(cfg.timeout_secs, 10);
    assert_eq!(cfg.source_specs().unwrap(), SourceSpec::defaults());
  }

  #[test]
  fn source_override_replaces_schema_in_place() {
    let cfg = parse(
      r#"
      timeout_secs = 30

      [[sources]]
      code   = "65334"
      family = "unemployment_rate"
      fields = ["skip", "sex", "geography", "age_group"]

      [[sources]]
      code   = "30000"
      family = "housing_prices"
      "#,
    );
    assert_eq!(cfg.timeout_secs, 30);

    let specs = cfg.source_specs().unwrap();
    assert_eq!(specs.len(), DEFAULT_SOURCES.len() + 1);

    let unemployment = specs.iter().find(|s| s.code == "65334").unwrap();
    assert_eq!(unemployment.schema.positions()[0], Field::Skip);
    assert_eq!(
      specs.iter().position(|s| s.code == "65334"),
      DEFAULT_SOURCES.iter().position(|(c, _)| *c == "65334")
    );

    let added = specs.last().unwrap();
    assert_eq!(added.code, "30000");
    assert_eq!(added.family, SourceFamily::HousingPrices);
    assert_eq!(added.schema, SourceFamily::HousingPrices.default_schema());
  }

  #[test]
  fn unknown_field_name_is_rejected() {
    let cfg = parse(
      r#"
      [[sources]]
      code   = "50913"
      family = "consumer_prices"
      fields = ["geography", "region", "data_type"]
      "#,
    );
    let err = cfg.source_specs().unwrap_err();
    assert!(format!("{err:#}").contains("region"));
  }

  #[test]
  fn tilde_expands_to_home() {
    let Ok(home) = std::env::var("HOME") else { return };
    assert_eq!(expand_tilde(Path::new("~/ine.db")), PathBuf::from(home).join("ine.db"));
    assert_eq!(expand_tilde(Path::new("/tmp/ine.db")), PathBuf::from("/tmp/ine.db"));
  }
}
