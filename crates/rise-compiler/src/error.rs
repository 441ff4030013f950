use rise_config::Operation;
use rise_pipeline::PipelineError;
use thiserror::Error;

/// Errors that can occur while resolving a single reference expression.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReferenceError {
  /// `#name` used by a resolver that has no stash.
  #[error("result reference '{value}' is only valid inside a pipeline")]
  ResultOutsidePipeline { value: String },

  /// `#name` used before any data step has stored a result.
  #[error("result reference '{value}' has no preceding data step")]
  ResultNotAvailable { value: String },

  /// A bare `$` or `#`.
  #[error("reference '{value}' has no field path")]
  EmptyPath { value: String },

  /// Literals and keys are emitted inside double quotes, where the target
  /// runtime would still interpret a quote or a `$`/`#` marker.
  #[error("'{value}' must not contain '{character}'")]
  InvalidCharacter { value: String, character: char },
}

/// Errors scoped to one field's resolver.
#[derive(Debug, Error)]
pub enum FieldError {
  #[error("invalid reference at {location}: {source}")]
  Reference {
    location: String,
    source: ReferenceError,
  },

  #[error("pipeline has no steps")]
  EmptyPipeline,

  #[error("pipeline has no executable steps (only 'add' descriptors)")]
  NoExecutableSteps,

  #[error("'{tag}' descriptors are only supported inside a pipeline")]
  UnsupportedSingleStep { tag: &'static str },

  #[error("'{action}' requires a '{key}' value")]
  MissingKey {
    action: &'static str,
    key: &'static str,
  },

  #[error(transparent)]
  Pipeline(#[from] PipelineError),

  #[error("template rendering failed: {0}")]
  Template(#[from] minijinja::Error),
}

/// Errors that abort a compile.
#[derive(Debug, Error)]
pub enum CompileError {
  #[error("{operation}.{field}: {source}")]
  Field {
    operation: Operation,
    field: String,
    source: FieldError,
  },

  /// A built-in template failed to parse.
  #[error("failed to load templates: {0}")]
  Templates(minijinja::Error),
}

impl CompileError {
  pub fn field(operation: Operation, field: impl Into<String>, source: FieldError) -> Self {
    CompileError::Field {
      operation,
      field: field.into(),
      source,
    }
  }
}
