use serde::{Deserialize, Serialize};

/// Opaque identity of an externally provisioned resource.
///
/// Only the name is ever used, to express "must exist before this runs".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Handle(String);

impl Handle {
  pub fn new(name: impl Into<String>) -> Self {
    Self(name.into())
  }

  pub fn name(&self) -> &str {
    &self.0
  }
}

/// The handles a compile is performed against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Handles {
  pub schema: Handle,
  /// Key-value store data source.
  pub store: Handle,
  /// Event bus data source.
  pub bus: Handle,
}

impl Default for Handles {
  fn default() -> Self {
    Self {
      schema: Handle::new("api-schema"),
      store: Handle::new("DynamoDataSource"),
      bus: Handle::new("EventBridgeDataSource"),
    }
  }
}

/// An artifact that must be registered before the dependent one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum Dependency {
  Schema(String),
  DataSource(String),
  Step(String),
}

impl Dependency {
  pub fn schema(handle: &Handle) -> Self {
    Dependency::Schema(handle.name().to_string())
  }

  pub fn data_source(handle: &Handle) -> Self {
    Dependency::DataSource(handle.name().to_string())
  }
}
