//! Rise Compiler
//!
//! Turns a [`rise_config::Definition`] into a [`rise_pipeline::CompiledApi`]:
//! one request/response template pair per field, and for pipeline fields the
//! ordered steps (each with its own template pair) chained through the stash.
//!
//! Compilation is a single deterministic pass. Nothing here touches a network
//! service or checks field names against the schema.

mod assembler;
mod builder;
mod compiler;
mod emitter;
mod error;
mod reference;
mod templates;

pub use assembler::Assembler;
pub use builder::{EventEnvelope, StepBuilder};
pub use compiler::{Compiler, StandardCompiler};
pub use emitter::{ResolverTemplates, pipeline_resolver, unit_resolver};
pub use error::{CompileError, FieldError, ReferenceError};
pub use reference::{Expression, ReferenceKind, Scope, resolve};
pub use templates::Templates;
