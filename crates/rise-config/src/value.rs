//! Scalar values and ordered field maps used by step descriptors.
//!
//! Every value attached to a step field is a reference expression kept in its
//! raw textual form. Classification (`$input`, `#result`, literal, `@id`) is
//! the compiler's job; this module only guarantees that the text and the
//! declaration order survive deserialization.

use std::fmt;

use indexmap::IndexMap;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A raw reference expression, e.g. `"$owner"`, `"#sk"`, `"note_@id"`.
///
/// Numbers and booleans are accepted and stored in their textual form, so
/// `k: 1` in a definition becomes the literal `"1"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConfigValue(String);

impl ConfigValue {
  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl From<&str> for ConfigValue {
  fn from(value: &str) -> Self {
    Self(value.to_string())
  }
}

impl From<String> for ConfigValue {
  fn from(value: String) -> Self {
    Self(value)
  }
}

impl fmt::Display for ConfigValue {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl Serialize for ConfigValue {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&self.0)
  }
}

struct ConfigValueVisitor;

impl Visitor<'_> for ConfigValueVisitor {
  type Value = ConfigValue;

  fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("a string, number or boolean")
  }

  fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
    Ok(ConfigValue::from(v))
  }

  fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
    Ok(ConfigValue(v))
  }

  fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
    Ok(ConfigValue(v.to_string()))
  }

  fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
    Ok(ConfigValue(v.to_string()))
  }

  fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
    Ok(ConfigValue(v.to_string()))
  }

  fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
    Ok(ConfigValue(v.to_string()))
  }
}

impl<'de> Deserialize<'de> for ConfigValue {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    deserializer.deserialize_any(ConfigValueVisitor)
  }
}

/// An insertion-ordered map of field names to reference expressions.
///
/// Inserting an existing key replaces its value but keeps the key's first
/// position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldMap(IndexMap<String, ConfigValue>);

impl FieldMap {
  pub fn new() -> Self {
    Self::default()
  }

  /// Insert or overwrite a field, returning the previous value if any.
  pub fn insert(&mut self, key: impl Into<String>, value: ConfigValue) -> Option<ConfigValue> {
    self.0.insert(key.into(), value)
  }

  /// Merge every field of `other` into this map, last write wins.
  pub fn merge(&mut self, other: &FieldMap) {
    self
      .0
      .extend(other.0.iter().map(|(k, v)| (k.clone(), v.clone())));
  }

  pub fn get(&self, key: &str) -> Option<&ConfigValue> {
    self.0.get(key)
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigValue)> {
    self.0.iter().map(|(k, v)| (k.as_str(), v))
  }

  pub fn keys(&self) -> impl Iterator<Item = &str> {
    self.0.keys().map(String::as_str)
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }
}

impl<K: Into<String>, V: Into<ConfigValue>> FromIterator<(K, V)> for FieldMap {
  fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
    Self(
      iter
        .into_iter()
        .map(|(key, value)| (key.into(), value.into()))
        .collect(),
    )
  }
}
