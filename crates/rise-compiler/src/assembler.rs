use rise_config::{AppConfig, Operation, StepDef};
use rise_pipeline::{Handles, Pipeline, StashSlot, StepKind};
use tracing::{debug, warn};

use crate::builder::{EventEnvelope, StepBuilder};
use crate::error::FieldError;
use crate::reference::Scope;
use crate::templates::Templates;

/// Turns a list of step descriptors into an ordered [`Pipeline`].
///
/// `add` descriptors only enrich the extra-fields map; every other descriptor
/// becomes exactly one step, in declaration order.
pub struct Assembler<'a> {
  builder: StepBuilder<'a>,
  handles: &'a Handles,
  app: &'a AppConfig,
}

impl<'a> Assembler<'a> {
  pub fn new(templates: &'a Templates, handles: &'a Handles, app: &'a AppConfig) -> Self {
    Self {
      builder: StepBuilder::new(templates, &handles.schema),
      handles,
      app,
    }
  }

  pub fn assemble(
    &self,
    operation: Operation,
    field: &str,
    descriptors: &[StepDef],
  ) -> Result<Pipeline, FieldError> {
    if descriptors.is_empty() {
      return Err(FieldError::EmptyPipeline);
    }
    if !descriptors.iter().any(StepDef::is_executable) {
      return Err(FieldError::NoExecutableSteps);
    }

    let mut pipeline = Pipeline::new(operation, field);
    // Counts executable steps only; local to this pipeline.
    let mut ordinal = 0usize;

    for descriptor in descriptors {
      let scope = Scope::Pipeline {
        result_available: pipeline.has(StashSlot::DbResult),
      };

      let step = match descriptor {
        StepDef::Add { fields } => {
          pipeline.merge_extra_fields(fields);
          continue;
        }
        StepDef::Guard { pk, sk } => {
          let name = step_name(operation, field, StepKind::Guard, ordinal);
          self.builder.guard(name, pk, sk, scope, &self.handles.store)?
        }
        StepDef::Db(db) => {
          let name = step_name(operation, field, StepKind::from(db.action), ordinal);
          if db.pk.is_some() || db.sk.is_some() {
            warn!(
              step = %name,
              "pk/sk on a pipeline db step are ignored; keys come from the stash input"
            );
          }
          self.builder.data(name, db.action, &self.handles.store)?
        }
        StepDef::Emit { event, data } => {
          let name = step_name(operation, field, StepKind::EmitEvent, ordinal);
          let source = self.app.event_source();
          let envelope = EventEnvelope {
            bus: self.app.event_bus(),
            source: &source,
            event,
            detail: data,
          };
          self.builder.emit(name, &envelope, scope, &self.handles.bus)?
        }
      };

      debug!(step = %step.name, kind = ?step.kind, "step built");
      pipeline.push(step)?;
      ordinal += 1;
    }

    Ok(pipeline)
  }
}

/// `<m|q><field><kind><ordinal>`, unique within one pipeline.
fn step_name(operation: Operation, field: &str, kind: StepKind, ordinal: usize) -> String {
  let prefix = match operation {
    Operation::Mutation => "m",
    Operation::Query => "q",
  };
  format!("{prefix}{field}{}{ordinal}", kind.name_fragment())
}

#[cfg(test)]
mod tests {
  use super::*;
  use rise_config::{ConfigValue, DbAction, DbStepDef, FieldMap};

  fn add(fields: &[(&str, &str)]) -> StepDef {
    StepDef::Add {
      fields: fields.iter().copied().collect(),
    }
  }

  fn db(action: DbAction) -> StepDef {
    StepDef::Db(DbStepDef::new(action))
  }

  fn emit(event: &str, data: &[(&str, &str)]) -> StepDef {
    StepDef::Emit {
      event: event.to_string(),
      data: data.iter().copied().collect(),
    }
  }

  fn assemble(descriptors: &[StepDef]) -> Result<Pipeline, FieldError> {
    let templates = Templates::new().unwrap();
    let handles = Handles::default();
    let app = AppConfig::new("notes");
    Assembler::new(&templates, &handles, &app).assemble(Operation::Mutation, "createNote", descriptors)
  }

  #[test]
  fn test_add_steps_produce_no_steps() {
    let pipeline = assemble(&[
      add(&[("sk", "note_@id")]),
      db(DbAction::Create),
      emit("note-created", &[("sk", "#sk")]),
    ])
    .unwrap();

    assert_eq!(
      pipeline.step_names(),
      vec!["mcreateNotedbcreate0", "mcreateNoteemit1"]
    );
    assert_eq!(
      pipeline.extra_fields().get("sk"),
      Some(&ConfigValue::from("note_@id"))
    );
  }

  #[test]
  fn test_ordinal_skips_add_descriptors() {
    let pipeline = assemble(&[
      add(&[("pk", "notes")]),
      StepDef::Guard {
        pk: "$owner".into(),
        sk: "profile".into(),
      },
      add(&[("sk", "x")]),
      db(DbAction::Get),
    ])
    .unwrap();

    assert_eq!(
      pipeline.step_names(),
      vec!["mcreateNoteguard0", "mcreateNotedbget1"]
    );
  }

  #[test]
  fn test_add_is_last_write_wins() {
    let pipeline = assemble(&[
      add(&[("k", "1"), ("j", "a")]),
      add(&[("k", "2")]),
      db(DbAction::Create),
    ])
    .unwrap();

    let expected: FieldMap = [("k", "2"), ("j", "a")].into_iter().collect();
    assert_eq!(pipeline.extra_fields(), &expected);
  }

  #[test]
  fn test_empty_pipeline_fails() {
    assert!(matches!(assemble(&[]), Err(FieldError::EmptyPipeline)));
  }

  #[test]
  fn test_add_only_pipeline_fails() {
    assert!(matches!(
      assemble(&[add(&[("k", "v")])]),
      Err(FieldError::NoExecutableSteps)
    ));
  }

  #[test]
  fn test_emit_result_reference_needs_prior_data_step() {
    let err = assemble(&[emit("note-created", &[("sk", "#sk")]), db(DbAction::Create)]).unwrap_err();
    let FieldError::Reference { location, .. } = err else {
      panic!("expected reference error");
    };
    assert!(location.contains("mcreateNoteemit0"));
    assert!(location.contains("data.sk"));
  }

  #[test]
  fn test_emit_uses_app_config() {
    let pipeline = assemble(&[db(DbAction::Create), emit("note-created", &[])]).unwrap();
    let request = &pipeline.steps()[1].request_template;
    assert!(request.contains("\"Source\": \"source.notes\""));
    assert!(request.contains("\"EventBusName\": \"default\""));
  }

  #[test]
  fn test_query_steps_use_query_prefix() {
    let templates = Templates::new().unwrap();
    let handles = Handles::default();
    let app = AppConfig::new("notes");
    let pipeline = Assembler::new(&templates, &handles, &app)
      .assemble(Operation::Query, "notes", &[db(DbAction::List)])
      .unwrap();
    assert_eq!(pipeline.step_names(), vec!["qnotesdbquery0"]);
  }
}
