// Dashboard document model - widgets, properties, metrics and annotations
use super::metric_entry::MetricEntry;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Unable to read dashboard body: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("Unable to write dashboard body: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Root of a dashboard body.
///
/// Every level keeps the fields it does not know in an `unknown` bag so that
/// a decoded document writes back the same keys and values it was read from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub widgets: Option<Vec<Widget>>,
    #[serde(flatten)]
    pub unknown: Map<String, Value>,
}

impl DashboardDocument {
    pub fn parse(body: &str) -> Result<Self, DocumentError> {
        serde_json::from_str(body).map_err(DocumentError::Decode)
    }

    pub fn to_json(&self) -> Result<String, DocumentError> {
        serde_json::to_string(self).map_err(DocumentError::Encode)
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.as_ref().is_none_or(Vec::is_empty)
    }

    pub fn widgets_mut(&mut self) -> &mut [Widget] {
        self.widgets.as_deref_mut().unwrap_or_default()
    }
}

/// Known fields are written before the `unknown` bag, so a re-encoded widget
/// leads with `properties` even when CloudWatch sent `type` and `x` first.
/// Known fields that arrive as `null` are dropped on re-encode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Widget {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Properties>,
    #[serde(flatten)]
    pub unknown: Map<String, Value>,
}

impl Widget {
    pub fn properties_mut(&mut self) -> &mut Properties {
        self.properties.get_or_insert_with(Properties::default)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Properties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<Vec<MetricEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotations: Option<AnnotationsBlock>,
    #[serde(flatten)]
    pub unknown: Map<String, Value>,
}

impl Properties {
    pub fn metrics(&self) -> &[MetricEntry] {
        self.metrics.as_deref().unwrap_or_default()
    }

    /// Annotations block, created empty on first use
    pub fn annotations_mut(&mut self) -> &mut AnnotationsBlock {
        self.annotations.get_or_insert_with(AnnotationsBlock::default)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnnotationsBlock {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vertical: Option<Vec<Annotation>>,
    #[serde(flatten)]
    pub unknown: Map<String, Value>,
}

impl AnnotationsBlock {
    /// Vertical annotations, created empty on first use
    pub fn vertical_mut(&mut self) -> &mut Vec<Annotation> {
        self.vertical.get_or_insert_with(Vec::new)
    }
}

/// A labeled vertical marker at an instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(with = "instant_seconds")]
    pub value: DateTime<Utc>,
    #[serde(flatten)]
    pub unknown: Map<String, Value>,
}

impl Annotation {
    pub fn new(label: impl Into<String>, value: DateTime<Utc>) -> Self {
        Self {
            label: Some(label.into()),
            value,
            unknown: Map::new(),
        }
    }
}

#[cfg(test)]
impl Widget {
    pub fn new(properties: Properties) -> Self {
        Self {
            properties: Some(properties),
            unknown: Map::new(),
        }
    }
}

#[cfg(test)]
impl Properties {
    pub fn with_metrics(mut self, metrics: Vec<MetricEntry>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn with_annotations(mut self, annotations: AnnotationsBlock) -> Self {
        self.annotations = Some(annotations);
        self
    }
}

#[cfg(test)]
impl AnnotationsBlock {
    pub fn with_vertical(vertical: Vec<Annotation>) -> Self {
        Self {
            vertical: Some(vertical),
            unknown: Map::new(),
        }
    }
}

/// Instants are written as `2018-09-24T00:03:25Z`: UTC, whole seconds.
mod instant_seconds {
    use chrono::{DateTime, Utc};
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&value.format(FORMAT))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|instant| instant.with_timezone(&Utc))
            .map_err(D::Error::custom)
    }
}
