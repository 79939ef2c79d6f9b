// Metrics publisher - Use case for pushing metric values to CloudWatch
use crate::application::metrics_gateway::{
    GatewayError, MetricDatum, MetricsGateway, PutMetricData, StandardUnit,
};
use crate::domain::metric_data::{DimensionKeyPair, MetricKeyPair};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("Metrics should at least contain one metric")]
    NoMetrics,

    #[error("Unable to push metrics to CloudWatch")]
    Remote(#[source] GatewayError),
}

/// Immutable once built, so it can be cloned into any number of concurrent callers.
#[derive(Clone)]
pub struct MetricsPublisher {
    gateway: Arc<dyn MetricsGateway>,
    namespace: String,
    metric_prefix: String,
    dimensions: Vec<DimensionKeyPair>,
}

impl MetricsPublisher {
    pub fn new(gateway: Arc<dyn MetricsGateway>, namespace: String, metric_prefix: String) -> Self {
        Self {
            gateway,
            namespace,
            metric_prefix,
            dimensions: Vec::new(),
        }
    }

    pub fn with_dimensions(mut self, dimensions: impl IntoIterator<Item = DimensionKeyPair>) -> Self {
        self.dimensions.extend(dimensions);
        self
    }

    pub async fn push_metrics(&self, metrics: &[MetricKeyPair]) -> Result<(), PublishError> {
        if metrics.is_empty() {
            return Err(PublishError::NoMetrics);
        }

        let mut log_message = String::from("Push metrics to cloudwatch:");
        let metric_data = metrics
            .iter()
            .map(|metric| {
                log_message.push_str(&summary_line(&metric.name, metric.value));
                MetricDatum {
                    metric_name: format!("{}{}", self.metric_prefix, metric.name),
                    unit: StandardUnit::Count,
                    value: metric.value,
                    dimensions: self.dimensions.clone(),
                }
            })
            .collect();

        tracing::info!("{}", log_message);

        let request = PutMetricData {
            namespace: self.namespace.clone(),
            metric_data,
        };

        self.gateway.put_metric_data(request).await.map_err(|e| {
            tracing::error!("Unable to send request to cloudwatch: {}", e);
            PublishError::Remote(e)
        })
    }
}

fn summary_line(name: &str, value: f64) -> String {
    format!("\n{:>25} = {:>13}", name, with_thousands(value))
}

/// One decimal with grouped thousands, e.g. `1,234,567.9`
fn with_thousands(value: f64) -> String {
    let formatted = format!("{:.1}", value);
    if !value.is_finite() {
        return formatted;
    }

    let (sign, unsigned) = match formatted.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", formatted.as_str()),
    };
    let (integer, fraction) = unsigned.split_once('.').unwrap_or((unsigned, "0"));

    let mut grouped = String::with_capacity(formatted.len() + integer.len() / 3);
    grouped.push_str(sign);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped.push('.');
    grouped.push_str(fraction);
    grouped
}
