use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::resolver::ResolverDef;

pub const DEFAULT_EVENT_BUS: &str = "default";
pub const DEFAULT_REGION: &str = "us-east-1";

/// A complete API definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Definition {
  /// GraphQL schema text. Never inspected.
  pub schema: String,
  #[serde(default)]
  pub resolvers: Resolvers,
  pub config: AppConfig,
}

/// Resolver definitions keyed by operation, then by field name.
///
/// Fields are kept sorted by name so every walk over them is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Resolvers {
  #[serde(rename = "Query", default, skip_serializing_if = "BTreeMap::is_empty")]
  pub query: BTreeMap<String, ResolverDef>,
  #[serde(rename = "Mutation", default, skip_serializing_if = "BTreeMap::is_empty")]
  pub mutation: BTreeMap<String, ResolverDef>,
}

impl Resolvers {
  /// Every field definition, queries first.
  pub fn iter(&self) -> impl Iterator<Item = (Operation, &str, &ResolverDef)> {
    let queries = self
      .query
      .iter()
      .map(|(field, def)| (Operation::Query, field.as_str(), def));
    let mutations = self
      .mutation
      .iter()
      .map(|(field, def)| (Operation::Mutation, field.as_str(), def));
    queries.chain(mutations)
  }

  pub fn len(&self) -> usize {
    self.query.len() + self.mutation.len()
  }

  pub fn is_empty(&self) -> bool {
    self.query.is_empty() && self.mutation.is_empty()
  }
}

/// The GraphQL root operation a field belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Operation {
  Query,
  Mutation,
}

impl Operation {
  pub fn as_str(&self) -> &'static str {
    match self {
      Operation::Query => "Query",
      Operation::Mutation => "Mutation",
    }
  }
}

impl fmt::Display for Operation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Application settings handed through to the provisioning layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
  /// Application name, used for the event source and the table name.
  pub name: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub eventbus: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub region: Option<String>,
}

impl AppConfig {
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      eventbus: None,
      region: None,
    }
  }

  pub fn event_bus(&self) -> &str {
    self.eventbus.as_deref().unwrap_or(DEFAULT_EVENT_BUS)
  }

  pub fn region(&self) -> &str {
    self.region.as_deref().unwrap_or(DEFAULT_REGION)
  }

  /// Logical source stamped on every emitted event.
  pub fn event_source(&self) -> String {
    format!("source.{}", self.name)
  }

  pub fn table_name(&self) -> String {
    format!("{}-db", self.name)
  }
}
