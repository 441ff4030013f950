//! Rise Pipeline
//!
//! This crate provides the compiled representation of a Rise definition: what
//! the compiler hands back to the provisioning layer for registration.
//!
//! Key differences from `rise-config`:
//! - Steps carry rendered request/response templates instead of descriptors
//! - Step order is fixed and checked against the stash contract
//! - Every artifact lists the handles and steps it depends on

mod compiled;
mod error;
mod handle;
mod pipeline;
mod stash;
mod step;

pub use compiled::{CompiledApi, CompiledField, ResolverKind};
pub use error::PipelineError;
pub use handle::{Dependency, Handle, Handles};
pub use pipeline::Pipeline;
pub use stash::StashSlot;
pub use step::{Step, StepKind};
