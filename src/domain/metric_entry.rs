// Metric entry codec - CloudWatch metric rows mixing string tokens and a rendering object
use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Rendering options of a metric row (color, label, id, expression, yAxis, ...).
/// Never interpreted, only carried through.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RenderingProperty(pub Map<String, Value>);

/// One row of a widget's `metrics` list.
///
/// On the wire this is a heterogeneous array:
/// `[Namespace, MetricName, Dim1Name, Dim1Value, ..., {rendering properties}]`.
/// The string tokens keep their order, the rendering object is always written last.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricEntry {
    pub values: Vec<String>,
    pub property: Option<RenderingProperty>,
}

impl MetricEntry {
    /// Metric name is positional: the second token, or "" for shorter rows
    /// (expression rows carry only a rendering object).
    pub fn metric_name(&self) -> &str {
        self.values.get(1).map(String::as_str).unwrap_or("")
    }
}

#[cfg(test)]
impl MetricEntry {
    pub fn new(values: Vec<String>) -> Self {
        Self {
            values,
            property: None,
        }
    }

    pub fn with_property(mut self, property: RenderingProperty) -> Self {
        self.property = Some(property);
        self
    }
}

impl Serialize for MetricEntry {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let len = self.values.len() + usize::from(self.property.is_some());
        let mut seq = serializer.serialize_seq(Some(len))?;
        for value in &self.values {
            seq.serialize_element(value)?;
        }
        if let Some(property) = &self.property {
            seq.serialize_element(property)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for MetricEntry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_seq(MetricEntryVisitor)
    }
}

struct MetricEntryVisitor;

impl<'de> Visitor<'de> for MetricEntryVisitor {
    type Value = MetricEntry;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a metric array")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut entry = MetricEntry::default();
        while let Some(token) = seq.next_element::<MetricToken>()? {
            match token {
                MetricToken::Value(value) => entry.values.push(value),
                // A later object replaces an earlier one; well-formed rows have at most one
                MetricToken::Property(property) => entry.property = Some(property),
            }
        }
        Ok(entry)
    }
}

/// A single element of a metric array.
enum MetricToken {
    Value(String),
    Property(RenderingProperty),
}

impl<'de> Deserialize<'de> for MetricToken {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(MetricTokenVisitor)
    }
}

struct MetricTokenVisitor;

impl<'de> Visitor<'de> for MetricTokenVisitor {
    type Value = MetricToken;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a metric token string or a rendering properties object")
    }

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(MetricToken::Value(value.to_owned()))
    }

    fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(MetricToken::Value(value))
    }

    fn visit_map<A>(self, map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let properties = Map::deserialize(de::value::MapAccessDeserializer::new(map))?;
        Ok(MetricToken::Property(RenderingProperty(properties)))
    }
}
