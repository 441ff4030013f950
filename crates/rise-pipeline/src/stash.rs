//! Compile-time model of the per-invocation stash.
//!
//! At runtime the stash is a string-keyed scope owned by one resolver
//! invocation. The compiler only needs to know which named slots exist and
//! which of them have been written at a given point in a pipeline.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A named slot in the stash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StashSlot {
  /// Working argument bag, seeded from caller arguments.
  Input,
  /// Most recent data-step outcome.
  DbResult,
  /// Most recent event-step outcome.
  EventResult,
}

impl StashSlot {
  /// The key the runtime template addresses the slot by.
  pub fn key(&self) -> &'static str {
    match self {
      StashSlot::Input => "input",
      StashSlot::DbResult => "dbresult",
      StashSlot::EventResult => "eventresult",
    }
  }

  /// Template expression reading the slot, e.g. `$ctx.stash.dbresult`.
  pub fn path(&self) -> String {
    format!("$ctx.stash.{}", self.key())
  }
}

impl fmt::Display for StashSlot {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.key())
  }
}

/// Which slots are populated at a point in a pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Stash {
  input: bool,
  db_result: bool,
  event_result: bool,
}

impl Stash {
  /// The stash as the pipeline resolver leaves it: `input` populated.
  pub fn seeded() -> Self {
    Self {
      input: true,
      ..Self::default()
    }
  }

  pub fn has(&self, slot: StashSlot) -> bool {
    match slot {
      StashSlot::Input => self.input,
      StashSlot::DbResult => self.db_result,
      StashSlot::EventResult => self.event_result,
    }
  }

  pub fn write(&mut self, slot: StashSlot) {
    match slot {
      StashSlot::Input => self.input = true,
      StashSlot::DbResult => self.db_result = true,
      StashSlot::EventResult => self.event_result = true,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_seeded_stash_has_only_input() {
    let stash = Stash::seeded();
    assert!(stash.has(StashSlot::Input));
    assert!(!stash.has(StashSlot::DbResult));
    assert!(!stash.has(StashSlot::EventResult));
  }

  #[test]
  fn test_slot_paths() {
    assert_eq!(StashSlot::DbResult.path(), "$ctx.stash.dbresult");
    assert_eq!(StashSlot::EventResult.to_string(), "eventresult");
  }
}
