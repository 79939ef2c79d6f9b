// Metric data - Key pairs pushed to CloudWatch
use serde::Deserialize;

/// A single metric value, named without the configured prefix
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MetricKeyPair {
    pub name: String,
    pub value: f64,
}

#[cfg(test)]
impl MetricKeyPair {
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
pub struct DimensionKeyPair {
    pub name: String,
    pub value: String,
}

#[cfg(test)]
impl DimensionKeyPair {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}
