use rise_config::Operation;
use serde::Serialize;

use crate::handle::Dependency;
use crate::pipeline::Pipeline;
use crate::step::Step;

/// How a field's resolver is wired.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResolverKind {
  /// Runs directly against one data source.
  Unit { data_source: String },
  /// Chains the pipeline's steps in order.
  Pipeline(Pipeline),
}

/// Everything the provisioning layer needs to register one field's resolver.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledField {
  pub operation: Operation,
  pub field: String,
  pub resolver: ResolverKind,
  pub request_template: String,
  pub response_template: String,
  /// Steps first (in execution order), then data source and schema.
  pub depends_on: Vec<Dependency>,
}

impl CompiledField {
  pub fn pipeline(&self) -> Option<&Pipeline> {
    match &self.resolver {
      ResolverKind::Pipeline(pipeline) => Some(pipeline),
      ResolverKind::Unit { .. } => None,
    }
  }

  /// Names of the chained steps, empty for unit resolvers.
  pub fn functions(&self) -> Vec<String> {
    self
      .pipeline()
      .map(Pipeline::step_names)
      .unwrap_or_default()
  }
}

/// The compiled form of a whole definition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledApi {
  pub name: String,
  pub region: String,
  pub table_name: String,
  pub event_bus: String,
  pub schema: String,
  pub fields: Vec<CompiledField>,
}

impl CompiledApi {
  /// Look up a compiled field.
  pub fn field(&self, operation: Operation, name: &str) -> Option<&CompiledField> {
    self
      .fields
      .iter()
      .find(|f| f.operation == operation && f.field == name)
  }

  /// Every pipeline step across all fields.
  pub fn steps(&self) -> impl Iterator<Item = &Step> {
    self
      .fields
      .iter()
      .filter_map(CompiledField::pipeline)
      .flat_map(|pipeline| pipeline.steps())
  }
}
