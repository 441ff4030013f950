//! Step builders, one per step kind.
//!
//! Every builder returns a [`Step`] whose templates are fully rendered and
//! whose dependencies name the data source it runs against and the schema.

use minijinja::context;
use rise_config::{ConfigValue, DbAction, FieldMap};
use rise_pipeline::{Dependency, Handle, StashSlot, Step, StepKind};

use crate::error::{FieldError, ReferenceError};
use crate::reference::{Expression, Scope, plain_text, resolve};
use crate::templates::{
  DELETE_ITEM_REQUEST, EMIT_REQUEST, EMIT_RESPONSE, GET_ITEM_REQUEST, GUARD_REQUEST,
  GUARD_RESPONSE, PUT_ITEM_REQUEST, QUERY_REQUEST, STASH_RESULT_RESPONSE, Templates,
};

pub(crate) const PARTITION_KEY: &str = "pk";
pub(crate) const SORT_KEY: &str = "sk";

/// What an emit step publishes.
#[derive(Debug, Clone, Copy)]
pub struct EventEnvelope<'a> {
  pub bus: &'a str,
  pub source: &'a str,
  /// Detail type.
  pub event: &'a str,
  pub detail: &'a FieldMap,
}

pub struct StepBuilder<'a> {
  templates: &'a Templates,
  schema: &'a Handle,
}

impl<'a> StepBuilder<'a> {
  pub fn new(templates: &'a Templates, schema: &'a Handle) -> Self {
    Self { templates, schema }
  }

  /// Consistent point lookup that aborts the pipeline when nothing is found.
  pub fn guard(
    &self,
    name: String,
    pk: &ConfigValue,
    sk: &ConfigValue,
    scope: Scope,
    store: &Handle,
  ) -> Result<Step, FieldError> {
    let pk = resolve_at(&name, PARTITION_KEY, pk.as_str(), scope)?;
    let sk = resolve_at(&name, SORT_KEY, sk.as_str(), scope)?;

    let request = self.templates.render(
      GUARD_REQUEST,
      context! { pk => pk.as_str(), sk => sk.as_str() },
    )?;
    let response = self.templates.render(GUARD_RESPONSE, context! {})?;
    let reads = slots_read([&pk, &sk], scope);

    Ok(self.step(name, StepKind::Guard, store, request, response, reads))
  }

  /// Store operation keyed by `input.pk` / `input.sk` in the stash.
  pub fn data(&self, name: String, action: DbAction, store: &Handle) -> Result<Step, FieldError> {
    let input = StashSlot::Input.path();
    let pk = format!("{input}.{PARTITION_KEY}");
    let sk = format!("{input}.{SORT_KEY}");

    let (request, result) = match action {
      DbAction::Get => (
        self
          .templates
          .render(GET_ITEM_REQUEST, context! { pk => &pk, sk => &sk })?,
        "$ctx.result",
      ),
      DbAction::List => (
        self
          .templates
          .render(QUERY_REQUEST, context! { pk => &pk, sk => &sk })?,
        "$ctx.result.items",
      ),
      DbAction::Create => (
        self.templates.render(
          PUT_ITEM_REQUEST,
          context! { pk => &pk, sk => &sk, item => &input },
        )?,
        "$ctx.result",
      ),
      DbAction::Remove => (
        self
          .templates
          .render(DELETE_ITEM_REQUEST, context! { pk => &pk, sk => &sk })?,
        "$ctx.result",
      ),
    };

    let response = self.templates.render(
      STASH_RESULT_RESPONSE,
      context! { slot => StashSlot::DbResult.key(), value => result },
    )?;

    Ok(self.step(
      name,
      StepKind::from(action),
      store,
      request,
      response,
      vec![StashSlot::Input],
    ))
  }

  /// Publish one event built from the envelope.
  pub fn emit(
    &self,
    name: String,
    envelope: &EventEnvelope<'_>,
    scope: Scope,
    bus: &Handle,
  ) -> Result<Step, FieldError> {
    let mut detail = Vec::with_capacity(envelope.detail.len());
    let mut expressions = Vec::with_capacity(envelope.detail.len());
    for (key, value) in envelope.detail.iter() {
      let location = format!("data.{key}");
      let key = plain_text(key).map_err(|source| reference_error(&name, &location, source))?;
      let expr = resolve_at(&name, &location, value.as_str(), scope)?;
      detail.push((key.to_string(), expr.as_str().to_string()));
      expressions.push(expr);
    }

    let source = plain_text(envelope.source).map_err(|e| reference_error(&name, "source", e))?;
    let bus_name = plain_text(envelope.bus).map_err(|e| reference_error(&name, "bus", e))?;
    let event = plain_text(envelope.event).map_err(|e| reference_error(&name, "event", e))?;

    let request = self.templates.render(
      EMIT_REQUEST,
      context! { detail, source, bus => bus_name, event },
    )?;
    let response = self.templates.render(EMIT_RESPONSE, context! {})?;
    let reads = slots_read(&expressions, scope);

    Ok(self.step(name, StepKind::EmitEvent, bus, request, response, reads))
  }

  fn step(
    &self,
    name: String,
    kind: StepKind,
    data_source: &Handle,
    request_template: String,
    response_template: String,
    reads: Vec<StashSlot>,
  ) -> Step {
    Step {
      name,
      kind,
      data_source: data_source.name().to_string(),
      request_template,
      response_template,
      reads,
      writes: kind.writes(),
      depends_on: vec![
        Dependency::data_source(data_source),
        Dependency::schema(self.schema),
      ],
    }
  }
}

fn resolve_at(
  step: &str,
  location: &str,
  value: &str,
  scope: Scope,
) -> Result<Expression, FieldError> {
  resolve(value, scope).map_err(|source| reference_error(step, location, source))
}

fn reference_error(step: &str, location: &str, source: ReferenceError) -> FieldError {
  FieldError::Reference {
    location: format!("step '{step}' {location}"),
    source,
  }
}

fn slots_read<'e>(exprs: impl IntoIterator<Item = &'e Expression>, scope: Scope) -> Vec<StashSlot> {
  let mut slots = Vec::new();
  for slot in exprs.into_iter().filter_map(|expr| expr.reads(scope)) {
    if !slots.contains(&slot) {
      slots.push(slot);
    }
  }
  slots
}
