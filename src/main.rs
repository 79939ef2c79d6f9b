// Main entry point - Dependency injection, startup annotation and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};
use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::application::dashboard_annotator::{AnnotationOutcome, DashboardAnnotator};
use crate::application::metrics_gateway::MetricsGateway;
use crate::application::metrics_publisher::MetricsPublisher;
use crate::infrastructure::cloudwatch_gateway::CloudWatchGateway;
use crate::infrastructure::config::load_app_config;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{health_check, push_metrics};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration
    let app_config = load_app_config()?;
    let cloudwatch = app_config.cloudwatch;

    // Create gateway (infrastructure layer)
    let gateway: Arc<dyn MetricsGateway> = Arc::new(CloudWatchGateway::new(
        cloudwatch.endpoint.clone(),
        cloudwatch.token.clone(),
    ));

    // Mark this start on the dashboard; a remote failure aborts startup
    let annotator = DashboardAnnotator::new(gateway.clone(), cloudwatch.clone());
    match annotator.annotate_server_start().await? {
        AnnotationOutcome::Annotated {
            validation_messages,
        } => tracing::debug!(
            "Server start annotated with {} validation messages",
            validation_messages.len()
        ),
        outcome => tracing::debug!("Server start not annotated: {:?}", outcome),
    }

    // Create services (application layer)
    let metrics_publisher = MetricsPublisher::new(
        gateway,
        cloudwatch.namespace.clone(),
        cloudwatch.metric_prefix.clone(),
    )
    .with_dimensions(cloudwatch.dimensions.clone());

    let state = Arc::new(AppState { metrics_publisher });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/metrics", post(push_metrics))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = app_config
        .server
        .bind
        .parse()
        .with_context(|| format!("Invalid bind address {}", app_config.server.bind))?;
    tracing::info!("Starting cloudwatch-annotator on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
