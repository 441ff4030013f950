//! Built-in resolver template sources.
//!
//! The target dialect (`$ctx`, `$util`, `#if`) is opaque to us; minijinja only
//! fills in the resolved expressions and names. Rendering is a pure function
//! of the context passed in.

use minijinja::{Environment, UndefinedBehavior};
use serde::Serialize;

pub(crate) const GUARD_REQUEST: &str = "guard.request.vtl";
pub(crate) const GUARD_RESPONSE: &str = "guard.response.vtl";
pub(crate) const GET_ITEM_REQUEST: &str = "get_item.request.vtl";
pub(crate) const QUERY_REQUEST: &str = "query.request.vtl";
pub(crate) const PUT_ITEM_REQUEST: &str = "put_item.request.vtl";
pub(crate) const DELETE_ITEM_REQUEST: &str = "delete_item.request.vtl";
pub(crate) const STASH_RESULT_RESPONSE: &str = "stash_result.response.vtl";
pub(crate) const RESULT_RESPONSE: &str = "result.response.vtl";
pub(crate) const EMIT_REQUEST: &str = "emit.request.vtl";
pub(crate) const EMIT_RESPONSE: &str = "emit.response.vtl";
pub(crate) const PIPELINE_REQUEST: &str = "pipeline.request.vtl";
pub(crate) const PIPELINE_RESPONSE: &str = "pipeline.response.vtl";

const SOURCES: &[(&str, &str)] = &[
  (GUARD_REQUEST, include_str!("../templates/guard.request.vtl")),
  (GUARD_RESPONSE, include_str!("../templates/guard.response.vtl")),
  (GET_ITEM_REQUEST, include_str!("../templates/get_item.request.vtl")),
  (QUERY_REQUEST, include_str!("../templates/query.request.vtl")),
  (PUT_ITEM_REQUEST, include_str!("../templates/put_item.request.vtl")),
  (DELETE_ITEM_REQUEST, include_str!("../templates/delete_item.request.vtl")),
  (STASH_RESULT_RESPONSE, include_str!("../templates/stash_result.response.vtl")),
  (RESULT_RESPONSE, include_str!("../templates/result.response.vtl")),
  (EMIT_REQUEST, include_str!("../templates/emit.request.vtl")),
  (EMIT_RESPONSE, include_str!("../templates/emit.response.vtl")),
  (PIPELINE_REQUEST, include_str!("../templates/pipeline.request.vtl")),
  (PIPELINE_RESPONSE, include_str!("../templates/pipeline.response.vtl")),
];

/// The set of resolver templates, parsed once.
pub struct Templates {
  env: Environment<'static>,
}

impl Templates {
  pub fn new() -> Result<Self, minijinja::Error> {
    let mut env = Environment::new();
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);

    for &(name, source) in SOURCES {
      env.add_template(name, source)?;
    }

    Ok(Self { env })
  }

  /// Render a built-in template.
  pub fn render<S: Serialize>(&self, name: &str, context: S) -> Result<String, minijinja::Error> {
    self.env.get_template(name)?.render(context)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use minijinja::context;

  #[test]
  fn test_all_templates_parse() {
    let templates = Templates::new().unwrap();
    for (name, _) in SOURCES {
      assert!(templates.env.get_template(name).is_ok(), "{name} missing");
    }
  }

  #[test]
  fn test_missing_variable_is_an_error() {
    let templates = Templates::new().unwrap();
    let result = templates.render(RESULT_RESPONSE, context! {});
    assert!(result.is_err());
  }

  #[test]
  fn test_loop_leaves_no_blank_lines() {
    let templates = Templates::new().unwrap();
    let rendered = templates
      .render(
        PIPELINE_REQUEST,
        context! {
          seed => "$ctx.args.input",
          fields => vec![("pk", "\"notes\""), ("sk", "$ctx.stash.input.sk")],
        },
      )
      .unwrap();

    assert_eq!(
      rendered,
      "$util.qr($ctx.stash.put(\"input\", $ctx.args.input))\n\
       $util.qr($ctx.stash.input.put(\"pk\", \"notes\"))\n\
       $util.qr($ctx.stash.input.put(\"sk\", $ctx.stash.input.sk))\n\
       {}"
    );
  }

  #[test]
  fn test_values_are_not_escaped() {
    let templates = Templates::new().unwrap();
    let rendered = templates
      .render(RESULT_RESPONSE, context! { value => "$ctx.result.items" })
      .unwrap();
    assert_eq!(rendered, "$util.toJson($ctx.result.items)");
  }
}
