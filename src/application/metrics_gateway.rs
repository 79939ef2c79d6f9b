// Gateway trait for CloudWatch dashboard and metric operations
use crate::domain::metric_data::DimensionKeyPair;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    /// The dashboard (or other resource) does not exist
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("CloudWatch error ({status}) {code}: {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    #[error(transparent)]
    Transport(#[from] anyhow::Error),
}

/// Non-fatal remark returned by CloudWatch after storing a dashboard
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardValidationMessage {
    pub data_path: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StandardUnit {
    Count,
}

impl StandardUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            StandardUnit::Count => "Count",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetricDatum {
    pub metric_name: String,
    pub unit: StandardUnit,
    pub value: f64,
    pub dimensions: Vec<DimensionKeyPair>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PutMetricData {
    pub namespace: String,
    pub metric_data: Vec<MetricDatum>,
}

#[async_trait]
pub trait MetricsGateway: Send + Sync {
    /// Fetch the JSON body of a dashboard
    async fn get_dashboard(&self, dashboard_name: &str) -> Result<String, GatewayError>;

    /// Replace the body of a dashboard, returning CloudWatch's validation remarks
    async fn put_dashboard(
        &self,
        dashboard_name: &str,
        dashboard_body: &str,
    ) -> Result<Vec<DashboardValidationMessage>, GatewayError>;

    async fn put_metric_data(&self, request: PutMetricData) -> Result<(), GatewayError>;
}
