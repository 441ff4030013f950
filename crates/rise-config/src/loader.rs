//! Loading definitions from JSON or YAML.

use std::path::Path;

use tracing::debug;

use crate::definition::Definition;
use crate::error::ConfigError;

/// Serialization format of a definition file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefinitionFormat {
  Json,
  Yaml,
}

impl DefinitionFormat {
  /// Pick the format from a file extension.
  pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
    let extension = path
      .extension()
      .and_then(|ext| ext.to_str())
      .map(str::to_ascii_lowercase)
      .unwrap_or_default();

    match extension.as_str() {
      "json" => Ok(DefinitionFormat::Json),
      "yaml" | "yml" => Ok(DefinitionFormat::Yaml),
      _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
    }
  }
}

impl Definition {
  /// Parse a definition from text in the given format.
  pub fn parse(content: &str, format: DefinitionFormat) -> Result<Self, ConfigError> {
    match format {
      DefinitionFormat::Json => Ok(serde_json::from_str(content)?),
      DefinitionFormat::Yaml => Ok(serde_yaml::from_str(content)?),
    }
  }

  /// Read and parse a definition file, choosing the format by extension.
  pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
    let path = path.as_ref();
    let format = DefinitionFormat::from_path(path)?;
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
      path: path.to_path_buf(),
      source,
    })?;

    let definition = Self::parse(&content, format)?;
    debug!(
      path = %path.display(),
      ?format,
      fields = definition.resolvers.len(),
      "definition loaded"
    );
    Ok(definition)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{ResolverDef, StepDef};
  use std::io::Write;

  const NOTES_YAML: &str = r##"
schema: |
  type Note { pk: String, sk: String, name: String }
resolvers:
  Query:
    notes:
      type: db
      action: list
      pk: notes
      sk: note_
  Mutation:
    createNote:
      - type: add
        pk: notes
        sk: note_@id
      - type: db
        action: create
      - type: emit
        event: note-created
        data:
          sk: "#sk"
config:
  name: notes
"##;

  #[test]
  fn test_parse_yaml_pipeline() {
    let def = Definition::parse(NOTES_YAML, DefinitionFormat::Yaml).unwrap();

    assert_eq!(def.config.name, "notes");
    let Some(ResolverDef::Pipeline(steps)) = def.resolvers.mutation.get("createNote") else {
      panic!("expected createNote pipeline");
    };
    let tags: Vec<&str> = steps.iter().map(StepDef::tag).collect();
    assert_eq!(tags, vec!["add", "db", "emit"]);

    let StepDef::Add { fields } = &steps[0] else {
      panic!("expected add step");
    };
    assert_eq!(fields.keys().collect::<Vec<_>>(), vec!["pk", "sk"]);
  }

  #[test]
  fn test_format_from_extension() {
    assert_eq!(
      DefinitionFormat::from_path(Path::new("api.JSON")).unwrap(),
      DefinitionFormat::Json
    );
    assert_eq!(
      DefinitionFormat::from_path(Path::new("api.yml")).unwrap(),
      DefinitionFormat::Yaml
    );
    assert!(matches!(
      DefinitionFormat::from_path(Path::new("api.toml")),
      Err(ConfigError::UnsupportedFormat(_))
    ));
  }

  #[test]
  fn test_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.yaml");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(NOTES_YAML.as_bytes()).unwrap();

    let def = Definition::load(&path).unwrap();
    assert_eq!(def.resolvers.len(), 2);
  }

  #[test]
  fn test_load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = Definition::load(dir.path().join("missing.json"));
    assert!(matches!(result, Err(ConfigError::Io { .. })));
  }

  #[test]
  fn test_invalid_json_is_reported() {
    let result = Definition::parse(r#"{ "schema": "" "#, DefinitionFormat::Json);
    assert!(matches!(result, Err(ConfigError::Json(_))));
  }
}
