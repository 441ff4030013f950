//! Reference expression resolution.
//!
//! A raw step value is one of:
//! - `$name`: caller input. Inside a pipeline this reads the stash input bag
//!   (`$ctx.stash.input.name`), otherwise the direct arguments
//!   (`$ctx.args.name`).
//! - `#name`: the most recent data-step result (`$ctx.stash.dbresult.name`).
//!   Only valid inside a pipeline, after a data step.
//! - anything else: a literal, emitted double-quoted.
//!
//! Independently of the above, a value containing `@id` is wrapped so that
//! every occurrence of the token is replaced with a freshly generated
//! identifier when the template runs.

use rise_pipeline::StashSlot;

use crate::error::ReferenceError;

const INPUT_MARKER: char = '$';
const RESULT_MARKER: char = '#';
const ID_TOKEN: &str = "@id";
const RESERVED: [char; 3] = ['"', INPUT_MARKER, RESULT_MARKER];

/// Where a reference is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
  /// A unit resolver with no stash.
  Direct,
  /// A pipeline step or pipeline resolver.
  Pipeline {
    /// Whether an earlier step has stored a data result.
    result_available: bool,
  },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
  Literal,
  Input,
  Result,
}

/// A resolved reference, ready to be spliced into a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expression {
  kind: ReferenceKind,
  generates_id: bool,
  text: String,
}

impl Expression {
  pub fn kind(&self) -> ReferenceKind {
    self.kind
  }

  /// Whether `@id` is substituted at runtime.
  pub fn generates_id(&self) -> bool {
    self.generates_id
  }

  pub fn as_str(&self) -> &str {
    &self.text
  }

  pub fn into_string(self) -> String {
    self.text
  }

  /// The stash slot the expression reads when evaluated in `scope`.
  pub fn reads(&self, scope: Scope) -> Option<StashSlot> {
    match (self.kind, scope) {
      (ReferenceKind::Input, Scope::Pipeline { .. }) => Some(StashSlot::Input),
      (ReferenceKind::Result, _) => Some(StashSlot::DbResult),
      _ => None,
    }
  }
}

/// Resolve a raw value in the given scope.
pub fn resolve(value: &str, scope: Scope) -> Result<Expression, ReferenceError> {
  let (kind, text) = if let Some(path) = value.strip_prefix(INPUT_MARKER) {
    let path = field_path(value, path)?;
    let base = match scope {
      Scope::Direct => "$ctx.args",
      Scope::Pipeline { .. } => "$ctx.stash.input",
    };
    (ReferenceKind::Input, format!("{base}.{path}"))
  } else if let Some(path) = value.strip_prefix(RESULT_MARKER) {
    match scope {
      Scope::Direct => {
        return Err(ReferenceError::ResultOutsidePipeline {
          value: value.to_string(),
        });
      }
      Scope::Pipeline {
        result_available: false,
      } => {
        return Err(ReferenceError::ResultNotAvailable {
          value: value.to_string(),
        });
      }
      Scope::Pipeline {
        result_available: true,
      } => {}
    }
    let path = field_path(value, path)?;
    (
      ReferenceKind::Result,
      format!("{}.{path}", StashSlot::DbResult.path()),
    )
  } else {
    (ReferenceKind::Literal, quote(value)?)
  };

  let generates_id = value.contains(ID_TOKEN);
  let text = if generates_id {
    format!("$util.str.toReplace({text}, \"{ID_TOKEN}\", $util.autoId())")
  } else {
    text
  };

  Ok(Expression {
    kind,
    generates_id,
    text,
  })
}

/// Wrap a literal in double quotes.
pub(crate) fn quote(value: &str) -> Result<String, ReferenceError> {
  Ok(format!("\"{}\"", plain_text(value)?))
}

/// Text spliced verbatim between double quotes in a template.
///
/// The runtime interpolates `$name` and evaluates `#directive` inside double
/// quotes, so neither marker may appear past the leading one.
pub(crate) fn plain_text(value: &str) -> Result<&str, ReferenceError> {
  match value.chars().find(|c| RESERVED.contains(c)) {
    Some(character) => Err(ReferenceError::InvalidCharacter {
      value: value.to_string(),
      character,
    }),
    None => Ok(value),
  }
}

fn field_path<'a>(value: &str, path: &'a str) -> Result<&'a str, ReferenceError> {
  if path.is_empty() {
    return Err(ReferenceError::EmptyPath {
      value: value.to_string(),
    });
  }
  plain_text(path)
}
