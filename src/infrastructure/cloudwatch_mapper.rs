// Mapper between gateway types and the CloudWatch JSON wire format
use crate::application::metrics_gateway::{DashboardValidationMessage, MetricDatum, PutMetricData};
use crate::domain::metric_data::DimensionKeyPair;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetDashboardInput<'a> {
    pub dashboard_name: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetDashboardOutput {
    #[serde(default)]
    pub dashboard_body: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PutDashboardInput<'a> {
    pub dashboard_name: &'a str,
    pub dashboard_body: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PutDashboardOutput {
    #[serde(default)]
    pub dashboard_validation_messages: Vec<ValidationMessageWire>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ValidationMessageWire {
    #[serde(default)]
    pub data_path: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PutMetricDataInput {
    pub namespace: String,
    pub metric_data: Vec<MetricDatumWire>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct MetricDatumWire {
    pub metric_name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dimensions: Vec<DimensionWire>,
    pub unit: &'static str,
    pub value: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DimensionWire {
    pub name: String,
    pub value: String,
}

/// Error reply: `{"__type": "com.amazonaws.cloudwatch#ResourceNotFound", "message": "..."}`
#[derive(Debug, Default, Deserialize)]
pub struct ErrorReply {
    #[serde(rename = "__type", default)]
    pub error_type: Option<String>,
    #[serde(alias = "Message", default)]
    pub message: Option<String>,
}

impl ErrorReply {
    /// Error code without the shape namespace
    pub fn code(&self) -> &str {
        self.error_type
            .as_deref()
            .and_then(|t| t.rsplit('#').next())
            .unwrap_or("")
    }
}

pub fn put_metric_data_to_wire(request: PutMetricData) -> PutMetricDataInput {
    PutMetricDataInput {
        namespace: request.namespace,
        metric_data: request
            .metric_data
            .into_iter()
            .map(metric_datum_to_wire)
            .collect(),
    }
}

fn metric_datum_to_wire(datum: MetricDatum) -> MetricDatumWire {
    MetricDatumWire {
        metric_name: datum.metric_name,
        dimensions: datum
            .dimensions
            .into_iter()
            .map(dimension_to_wire)
            .collect(),
        unit: datum.unit.as_str(),
        value: datum.value,
    }
}

fn dimension_to_wire(dimension: DimensionKeyPair) -> DimensionWire {
    DimensionWire {
        name: dimension.name,
        value: dimension.value,
    }
}

pub fn validation_message_from_wire(wire: ValidationMessageWire) -> DashboardValidationMessage {
    DashboardValidationMessage {
        data_path: wire.data_path,
        message: wire.message.unwrap_or_default(),
    }
}
