use rise_config::DbAction;
use serde::{Deserialize, Serialize};

use crate::handle::Dependency;
use crate::stash::StashSlot;

/// The operation a step performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
  Guard,
  Get,
  List,
  Create,
  Remove,
  EmitEvent,
}

impl StepKind {
  /// Fragment used when deriving the step's unique name.
  pub fn name_fragment(&self) -> &'static str {
    match self {
      StepKind::Guard => "guard",
      StepKind::Get => "dbget",
      StepKind::List => "dbquery",
      StepKind::Create => "dbcreate",
      StepKind::Remove => "dbremove",
      StepKind::EmitEvent => "emit",
    }
  }

  /// The stash slot the step's response template writes, if any.
  pub fn writes(&self) -> Option<StashSlot> {
    match self {
      StepKind::Guard => None,
      StepKind::Get | StepKind::List | StepKind::Create | StepKind::Remove => {
        Some(StashSlot::DbResult)
      }
      StepKind::EmitEvent => Some(StashSlot::EventResult),
    }
  }
}

impl From<DbAction> for StepKind {
  fn from(action: DbAction) -> Self {
    match action {
      DbAction::Get => StepKind::Get,
      DbAction::List => StepKind::List,
      DbAction::Create => StepKind::Create,
      DbAction::Remove => StepKind::Remove,
    }
  }
}

/// One compiled unit of a pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
  /// Unique within its pipeline.
  pub name: String,
  pub kind: StepKind,
  /// Name of the data source the step runs against.
  pub data_source: String,
  pub request_template: String,
  pub response_template: String,
  /// Stash slots the step's templates read.
  pub reads: Vec<StashSlot>,
  /// Stash slot the step's response template writes.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub writes: Option<StashSlot>,
  pub depends_on: Vec<Dependency>,
}
