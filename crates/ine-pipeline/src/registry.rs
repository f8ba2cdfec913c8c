//! Source code → family rule.

use std::collections::HashMap;

use ine_core::{
  fact::FactTable,
  period::Granularity,
  source::SourceSpec,
};

use crate::{
  error::{Error, Result},
  mapper::{self, Classifier},
};

/// Everything the mapper needs to process one source code.
#[derive(Debug, Clone)]
pub struct Route {
  pub spec:        SourceSpec,
  pub table:       FactTable,
  pub granularity: Granularity,
  pub classify:    Classifier,
}

impl Route {
  pub fn new(spec: SourceSpec) -> Self {
    let classify = mapper::classifier(spec.family);
    Self {
      table: classify.table(),
      granularity: spec.family.granularity(),
      classify,
      spec,
    }
  }
}

/// Registered sources, kept in registration order.
#[derive(Debug, Clone)]
pub struct SourceRegistry {
  routes: Vec<Route>,
  index:  HashMap<String, usize>,
}

impl SourceRegistry {
  /// The built-in source table with default label layouts.
  pub fn defaults() -> Self {
    let routes: Vec<Route> = SourceSpec::defaults().into_iter().map(Route::new).collect();
    let index = routes
      .iter()
      .enumerate()
      .map(|(i, r)| (r.spec.code.clone(), i))
      .collect();
    Self { routes, index }
  }

  /// Build from explicit specs. Codes must be unique and every schema must
  /// expose the fields its family's classifier reads.
  pub fn from_specs(specs: impl IntoIterator<Item = SourceSpec>) -> Result<Self> {
    let mut routes = Vec::new();
    let mut index = HashMap::new();

    for spec in specs {
      if index.contains_key(&spec.code) {
        return Err(Error::DuplicateSource(spec.code));
      }
      if let Some(field) = mapper::required_fields(spec.family)
        .iter()
        .find(|f| !spec.schema.contains(**f))
      {
        return Err(Error::SchemaMissingField { code: spec.code, field: *field });
      }
      index.insert(spec.code.clone(), routes.len());
      routes.push(Route::new(spec));
    }

    Ok(Self { routes, index })
  }

  pub fn route(&self, code: &str) -> Result<&Route> {
    self
      .index
      .get(code)
      .map(|i| &self.routes[*i])
      .ok_or_else(|| Error::UnmappedSource(code.to_owned()))
  }

  pub fn codes(&self) -> impl Iterator<Item = &str> + '_ {
    self.routes.iter().map(|r| r.spec.code.as_str())
  }

  pub fn len(&self) -> usize { self.routes.len() }

  pub fn is_empty(&self) -> bool { self.routes.is_empty() }
}
