use thiserror::Error;

use crate::stash::StashSlot;

#[derive(Debug, Error)]
pub enum PipelineError {
  #[error("step '{step}' reads stash slot '{slot}' before any step writes it")]
  UnsatisfiedRead { step: String, slot: StashSlot },

  #[error("duplicate step name: {0}")]
  DuplicateStepName(String),
}
