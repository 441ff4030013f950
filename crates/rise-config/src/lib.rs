//! Rise Config
//!
//! This crate contains the serializable definition types for Rise. A definition
//! describes a GraphQL API: its schema text, the resolver behaviour of every
//! `Query` and `Mutation` field, and a few application settings.
//!
//! Each field is either a single step descriptor or an ordered pipeline of step
//! descriptors:
//!
//! ```yaml
//! resolvers:
//!   Mutation:
//!     createNote:
//!       - type: add
//!         sk: note_@id
//!       - type: db
//!         action: create
//!       - type: emit
//!         event: note-created
//!         data:
//!           sk: "#sk"
//! ```
//!
//! Definitions can be loaded from JSON or YAML files. The compiler takes these
//! types and turns them into resolver templates.

mod definition;
mod error;
mod loader;
mod resolver;
mod step;
mod value;

pub use definition::{AppConfig, DEFAULT_EVENT_BUS, DEFAULT_REGION, Definition, Operation, Resolvers};
pub use error::ConfigError;
pub use loader::DefinitionFormat;
pub use resolver::ResolverDef;
pub use step::{DbAction, DbStepDef, StepDef};
pub use value::{ConfigValue, FieldMap};
