use rise_config::{FieldMap, Operation};
use serde::Serialize;

use crate::error::PipelineError;
use crate::handle::Dependency;
use crate::stash::{Stash, StashSlot};
use crate::step::Step;

/// Ordered steps for one field plus the extra input fields merged from `add`
/// descriptors.
///
/// Steps are only ever appended, and each append is checked against the
/// stash: a step may only read slots that an earlier step (or the pipeline
/// resolver, for `input`) has written.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pipeline {
  pub operation: Operation,
  pub field: String,
  steps: Vec<Step>,
  extra_fields: FieldMap,
  #[serde(skip)]
  stash: Stash,
}

impl Pipeline {
  pub fn new(operation: Operation, field: impl Into<String>) -> Self {
    Self {
      operation,
      field: field.into(),
      steps: Vec::new(),
      extra_fields: FieldMap::new(),
      stash: Stash::seeded(),
    }
  }

  /// Append a step, recording the slot it writes.
  pub fn push(&mut self, step: Step) -> Result<(), PipelineError> {
    if let Some(slot) = step.reads.iter().find(|slot| !self.stash.has(**slot)) {
      return Err(PipelineError::UnsatisfiedRead {
        step: step.name.clone(),
        slot: *slot,
      });
    }
    if self.steps.iter().any(|existing| existing.name == step.name) {
      return Err(PipelineError::DuplicateStepName(step.name));
    }

    if let Some(slot) = step.writes {
      self.stash.write(slot);
    }
    self.steps.push(step);
    Ok(())
  }

  /// Merge extra input fields, last write wins.
  pub fn merge_extra_fields(&mut self, fields: &FieldMap) {
    self.extra_fields.merge(fields);
  }

  pub fn steps(&self) -> &[Step] {
    &self.steps
  }

  pub fn extra_fields(&self) -> &FieldMap {
    &self.extra_fields
  }

  /// Whether `slot` is populated once every step so far has run.
  pub fn has(&self, slot: StashSlot) -> bool {
    self.stash.has(slot)
  }

  /// Step names in execution order.
  pub fn step_names(&self) -> Vec<String> {
    self.steps.iter().map(|step| step.name.clone()).collect()
  }

  /// One dependency per step, in execution order.
  pub fn step_dependencies(&self) -> Vec<Dependency> {
    self
      .steps
      .iter()
      .map(|step| Dependency::Step(step.name.clone()))
      .collect()
  }

  pub fn len(&self) -> usize {
    self.steps.len()
  }

  pub fn is_empty(&self) -> bool {
    self.steps.is_empty()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::step::StepKind;

  fn step(name: &str, kind: StepKind, reads: Vec<StashSlot>) -> Step {
    Step {
      name: name.to_string(),
      kind,
      data_source: "DynamoDataSource".to_string(),
      request_template: "{}".to_string(),
      response_template: "{}".to_string(),
      reads,
      writes: kind.writes(),
      depends_on: Vec::new(),
    }
  }

  #[test]
  fn test_push_preserves_order() {
    let mut pipeline = Pipeline::new(Operation::Mutation, "createNote");
    pipeline
      .push(step("mcreateNotedbcreate0", StepKind::Create, vec![StashSlot::Input]))
      .unwrap();
    pipeline
      .push(step("mcreateNoteemit1", StepKind::EmitEvent, vec![StashSlot::DbResult]))
      .unwrap();

    assert_eq!(
      pipeline.step_names(),
      vec!["mcreateNotedbcreate0", "mcreateNoteemit1"]
    );
    assert!(pipeline.has(StashSlot::EventResult));
  }

  #[test]
  fn test_read_before_write_is_rejected() {
    let mut pipeline = Pipeline::new(Operation::Mutation, "notify");
    let err = pipeline
      .push(step("mnotifyemit0", StepKind::EmitEvent, vec![StashSlot::DbResult]))
      .unwrap_err();

    assert!(matches!(
      err,
      PipelineError::UnsatisfiedRead { slot: StashSlot::DbResult, .. }
    ));
    assert!(pipeline.is_empty());
  }

  #[test]
  fn test_duplicate_names_are_rejected() {
    let mut pipeline = Pipeline::new(Operation::Mutation, "x");
    pipeline.push(step("mxdbget0", StepKind::Get, vec![])).unwrap();
    let err = pipeline.push(step("mxdbget0", StepKind::Get, vec![])).unwrap_err();
    assert!(matches!(err, PipelineError::DuplicateStepName(_)));
  }

  #[test]
  fn test_has_tracks_written_slots() {
    let mut pipeline = Pipeline::new(Operation::Mutation, "x");
    assert!(pipeline.has(StashSlot::Input));
    assert!(!pipeline.has(StashSlot::DbResult));
    pipeline.push(step("mxdbget0", StepKind::Get, vec![])).unwrap();
    assert!(pipeline.has(StashSlot::DbResult));
    assert!(!pipeline.has(StashSlot::EventResult));
  }
}
