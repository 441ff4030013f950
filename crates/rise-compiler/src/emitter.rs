//! Resolver-level template emission.
//!
//! Pipeline resolvers only seed the stash and pick the final result; all data
//! access happens in their steps. Unit resolvers talk to the store directly
//! and never touch the stash.

use minijinja::context;
use rise_config::{DbAction, DbStepDef, Operation};
use rise_pipeline::{Pipeline, StashSlot};
use serde::Serialize;

use crate::builder::{PARTITION_KEY, SORT_KEY};
use crate::error::FieldError;
use crate::reference::{Scope, plain_text, resolve};
use crate::templates::{
  DELETE_ITEM_REQUEST, GET_ITEM_REQUEST, PIPELINE_REQUEST, PIPELINE_RESPONSE, PUT_ITEM_REQUEST,
  QUERY_REQUEST, RESULT_RESPONSE, Templates,
};

/// Request/response pair registered on a schema field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolverTemplates {
  pub request: String,
  pub response: String,
}

/// Emit the resolver templates that wrap a pipeline.
///
/// The request copies the caller arguments into `stash.input`, then applies
/// every extra field in map order. Extra fields run before any step, so they
/// may reference input but never a data result.
///
/// The response returns `stash.dbresult` when present. Otherwise mutations
/// acknowledge with the caller's arguments (the event result is not
/// returned), and queries raise an error.
pub fn pipeline_resolver(
  templates: &Templates,
  pipeline: &Pipeline,
) -> Result<ResolverTemplates, FieldError> {
  let scope = Scope::Pipeline {
    result_available: false,
  };

  let mut fields = Vec::with_capacity(pipeline.extra_fields().len());
  for (key, value) in pipeline.extra_fields().iter() {
    let location = format!("extra field '{key}'");
    let key = plain_text(key).map_err(|source| FieldError::Reference {
      location: location.clone(),
      source,
    })?;
    let expr = resolve(value.as_str(), scope)
      .map_err(|source| FieldError::Reference { location, source })?;
    fields.push((key.to_string(), expr.into_string()));
  }

  let (seed, fallback) = match pipeline.operation {
    Operation::Mutation => ("$ctx.args.input", "$util.toJson($ctx.args)"),
    Operation::Query => (
      "$ctx.args",
      "$util.error(\"Pipeline produced no result\", \"NoResult\")",
    ),
  };

  let request = templates.render(PIPELINE_REQUEST, context! { seed, fields })?;
  let response = templates.render(
    PIPELINE_RESPONSE,
    context! { result => StashSlot::DbResult.path(), fallback },
  )?;

  Ok(ResolverTemplates { request, response })
}

/// Emit templates for a field backed by a single `db` descriptor.
pub fn unit_resolver(templates: &Templates, db: &DbStepDef) -> Result<ResolverTemplates, FieldError> {
  let args_pk = format!("$ctx.args.{PARTITION_KEY}");
  let args_sk = format!("$ctx.args.{SORT_KEY}");

  let (request, result) = match db.action {
    DbAction::List => {
      let pk = direct_key(db, PARTITION_KEY, db.pk.as_ref().map(|v| v.as_str()))?;
      let sk = direct_key(db, SORT_KEY, db.sk.as_ref().map(|v| v.as_str()))?;
      (
        templates.render(QUERY_REQUEST, context! { pk, sk })?,
        "$ctx.result.items",
      )
    }
    DbAction::Get => (
      templates.render(GET_ITEM_REQUEST, context! { pk => args_pk, sk => args_sk })?,
      "$ctx.result",
    ),
    DbAction::Create => {
      let item = "$ctx.args.input";
      (
        templates.render(
          PUT_ITEM_REQUEST,
          context! {
            pk => format!("{item}.{PARTITION_KEY}"),
            sk => format!("{item}.{SORT_KEY}"),
            item,
          },
        )?,
        "$ctx.result",
      )
    }
    DbAction::Remove => (
      templates.render(DELETE_ITEM_REQUEST, context! { pk => args_pk, sk => args_sk })?,
      "$ctx.result",
    ),
  };

  let response = templates.render(RESULT_RESPONSE, context! { value => result })?;
  Ok(ResolverTemplates { request, response })
}

fn direct_key(db: &DbStepDef, key: &'static str, value: Option<&str>) -> Result<String, FieldError> {
  let value = value.ok_or(FieldError::MissingKey {
    action: db.action.as_str(),
    key,
  })?;
  let expr = resolve(value, Scope::Direct).map_err(|source| FieldError::Reference {
    location: format!("{} {key}", db.action.as_str()),
    source,
  })?;
  Ok(expr.into_string())
}
