use serde::{Deserialize, Serialize};

use crate::value::{ConfigValue, FieldMap};

/// One entry of a resolver definition.
///
/// Descriptors are tagged by `type`; `db` descriptors are further tagged by
/// `action`. Unknown tags fail deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StepDef {
  /// Extra fields merged into the pipeline input before any step runs.
  Add {
    #[serde(flatten)]
    fields: FieldMap,
  },
  /// Strongly consistent lookup that aborts the pipeline when the record is missing.
  Guard { pk: ConfigValue, sk: ConfigValue },
  /// Key-value store operation.
  Db(DbStepDef),
  /// Publish an event to the event bus.
  Emit {
    /// Event type name (the envelope's detail type).
    event: String,
    #[serde(default)]
    data: FieldMap,
  },
}

impl StepDef {
  /// The descriptor's `type` tag.
  pub fn tag(&self) -> &'static str {
    match self {
      StepDef::Add { .. } => "add",
      StepDef::Guard { .. } => "guard",
      StepDef::Db(_) => "db",
      StepDef::Emit { .. } => "emit",
    }
  }

  /// Whether the descriptor produces a step (everything except `add`).
  pub fn is_executable(&self) -> bool {
    !matches!(self, StepDef::Add { .. })
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DbStepDef {
  pub action: DbAction,
  /// Partition key reference. Only read by single-step `list` resolvers.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub pk: Option<ConfigValue>,
  /// Sort key prefix reference. Only read by single-step `list` resolvers.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub sk: Option<ConfigValue>,
}

impl DbStepDef {
  pub fn new(action: DbAction) -> Self {
    Self {
      action,
      pk: None,
      sk: None,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DbAction {
  Get,
  List,
  Create,
  Remove,
}

impl DbAction {
  pub fn as_str(&self) -> &'static str {
    match self {
      DbAction::Get => "get",
      DbAction::List => "list",
      DbAction::Create => "create",
      DbAction::Remove => "remove",
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn test_add_collects_untagged_fields() {
    let step: StepDef =
      serde_json::from_str(r#"{ "type": "add", "sk": "note_@id", "owner": "$user" }"#).unwrap();

    let StepDef::Add { fields } = step else {
      panic!("expected add step");
    };
    assert_eq!(fields.keys().collect::<Vec<_>>(), vec!["sk", "owner"]);
    assert_eq!(fields.get("owner").map(ConfigValue::as_str), Some("$user"));
  }

  #[test]
  fn test_db_step_with_action() {
    let step: StepDef = serde_json::from_value(json!({
      "type": "db",
      "action": "list",
      "pk": "notes",
      "sk": "note_"
    }))
    .unwrap();

    assert_eq!(
      step,
      StepDef::Db(DbStepDef {
        action: DbAction::List,
        pk: Some("notes".into()),
        sk: Some("note_".into()),
      })
    );
  }

  #[test]
  fn test_emit_data_is_optional() {
    let step: StepDef = serde_json::from_value(json!({
      "type": "emit",
      "event": "note-created"
    }))
    .unwrap();

    assert_eq!(
      step,
      StepDef::Emit {
        event: "note-created".to_string(),
        data: FieldMap::new(),
      }
    );
  }

  #[test]
  fn test_unknown_type_is_rejected() {
    let result: Result<StepDef, _> = serde_json::from_value(json!({ "type": "teleport" }));
    let message = result.unwrap_err().to_string();
    assert!(message.contains("teleport"), "unexpected error: {message}");
  }

  #[test]
  fn test_unknown_db_action_is_rejected() {
    let result: Result<StepDef, _> =
      serde_json::from_value(json!({ "type": "db", "action": "upsert" }));
    let message = result.unwrap_err().to_string();
    assert!(message.contains("upsert"), "unexpected error: {message}");
  }

  #[test]
  fn test_guard_requires_keys() {
    let result: Result<StepDef, _> = serde_json::from_value(json!({ "type": "guard", "pk": "$owner" }));
    assert!(result.is_err());
  }

  #[test]
  fn test_tags() {
    assert_eq!(StepDef::Db(DbStepDef::new(DbAction::Get)).tag(), "db");
    assert!(!StepDef::Add { fields: FieldMap::new() }.is_executable());
  }
}
