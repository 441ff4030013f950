use std::fmt;

use serde::de::value::{MapAccessDeserializer, SeqAccessDeserializer};
use serde::de::{MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::step::StepDef;

/// The resolver behaviour of one schema field.
///
/// A map is a single step compiled directly against the data source. A
/// sequence is a pipeline of descriptors compiled into chained steps.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResolverDef {
  Single(StepDef),
  Pipeline(Vec<StepDef>),
}

impl ResolverDef {
  pub fn is_pipeline(&self) -> bool {
    matches!(self, ResolverDef::Pipeline(_))
  }
}

struct ResolverDefVisitor;

impl<'de> Visitor<'de> for ResolverDefVisitor {
  type Value = ResolverDef;

  fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("a step descriptor or a sequence of step descriptors")
  }

  fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<Self::Value, A::Error> {
    StepDef::deserialize(MapAccessDeserializer::new(map)).map(ResolverDef::Single)
  }

  fn visit_seq<A: SeqAccess<'de>>(self, seq: A) -> Result<Self::Value, A::Error> {
    Vec::<StepDef>::deserialize(SeqAccessDeserializer::new(seq)).map(ResolverDef::Pipeline)
  }
}

// Hand-written so a bad descriptor reports its own error instead of
// "data did not match any variant".
impl<'de> Deserialize<'de> for ResolverDef {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    deserializer.deserialize_any(ResolverDefVisitor)
  }
}
