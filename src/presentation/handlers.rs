// HTTP request handlers
use crate::application::metrics_publisher::PublishError;
use crate::domain::metric_data::MetricKeyPair;
use crate::presentation::app_state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Deserialize)]
pub struct PushMetricsBody {
    #[serde(default)]
    pub metrics: Vec<MetricKeyPair>,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Push a batch of metric values to CloudWatch
pub async fn push_metrics(
    State(state): State<Arc<AppState>>,
    Json(body): Json<PushMetricsBody>,
) -> Response {
    match state.metrics_publisher.push_metrics(&body.metrics).await {
        Ok(()) => StatusCode::ACCEPTED.into_response(),
        Err(e @ PublishError::NoMetrics) => (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
        Err(e @ PublishError::Remote(_)) => {
            (StatusCode::BAD_GATEWAY, e.to_string()).into_response()
        }
    }
}
