// Dashboard annotator - Marks a server start on the widgets showing our metrics
use crate::application::metrics_gateway::{DashboardValidationMessage, GatewayError, MetricsGateway};
use crate::application::widget_selection::{inject, is_owned};
use crate::domain::dashboard::DashboardDocument;
use crate::infrastructure::config::CloudWatchSettings;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnnotationError {
    #[error("Unable to send {operation} request to CloudWatch")]
    Remote {
        operation: &'static str,
        #[source]
        source: GatewayError,
    },
}

/// How an annotation cycle ended, short of a remote failure
#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationOutcome {
    /// No dashboard configured or reporting switched off; nothing was called
    NotConfigured,
    /// The dashboard does not exist (yet)
    NotFound,
    /// Nothing to annotate, or the body could not be understood
    Unchanged,
    Annotated {
        validation_messages: Vec<DashboardValidationMessage>,
    },
}

#[derive(Clone)]
pub struct DashboardAnnotator {
    gateway: Arc<dyn MetricsGateway>,
    settings: CloudWatchSettings,
}

impl DashboardAnnotator {
    pub fn new(gateway: Arc<dyn MetricsGateway>, settings: CloudWatchSettings) -> Self {
        Self { gateway, settings }
    }

    /// Run one fetch, annotate, update cycle. Meant to be called once per process start.
    pub async fn annotate_server_start(&self) -> Result<AnnotationOutcome, AnnotationError> {
        let Some(dashboard_name) = self.settings.dashboard_target() else {
            tracing::debug!("No dashboard configured, skipping server start annotation");
            return Ok(AnnotationOutcome::NotConfigured);
        };

        // 1. Fetch
        let body = match self.gateway.get_dashboard(dashboard_name).await {
            Ok(body) => body,
            Err(GatewayError::NotFound(message)) => {
                tracing::warn!("{}", message);
                return Ok(AnnotationOutcome::NotFound);
            }
            Err(source) => return Err(Self::remote_failure("GetDashboard", source)),
        };

        // 2. Decode, filter, inject, encode
        let annotated = self.annotate_widgets(&body, Utc::now());

        // 3. Only a change in length counts as a change
        if annotated.len() == body.len() {
            tracing::debug!(
                "Dashboard {} left unchanged for prefix {}",
                dashboard_name,
                self.settings.metric_prefix
            );
            return Ok(AnnotationOutcome::Unchanged);
        }

        // 4. Write back
        let validation_messages = self
            .gateway
            .put_dashboard(dashboard_name, &annotated)
            .await
            .map_err(|source| Self::remote_failure("PutDashboard", source))?;

        tracing::info!("Dashboard {} annotated", dashboard_name);
        for validation_message in &validation_messages {
            tracing::warn!(
                "BUT: {} ({})",
                validation_message.message,
                validation_message.data_path.as_deref().unwrap_or("-")
            );
        }

        Ok(AnnotationOutcome::Annotated {
            validation_messages,
        })
    }

    /// Add a start annotation to every owned widget of `body`.
    /// Bodies that cannot be decoded, or that have no widgets, come back untouched.
    pub fn annotate_widgets(&self, body: &str, now: DateTime<Utc>) -> String {
        let mut document = match DashboardDocument::parse(body) {
            Ok(document) => document,
            Err(e) => {
                tracing::debug!("Leaving dashboard as is: {}", e);
                return body.to_string();
            }
        };

        if document.is_empty() {
            return body.to_string();
        }

        let metric_prefix = self.settings.metric_prefix.as_str();
        let label = format!("{} Start", metric_prefix);
        let mut owned = 0;
        for widget in document.widgets_mut() {
            if is_owned(widget, metric_prefix) {
                inject(widget, &label, now);
                owned += 1;
            }
        }

        // Re-encoding drops null fields and reorders keys
        if owned == 0 {
            return body.to_string();
        }

        match document.to_json() {
            Ok(json) => json,
            Err(e) => {
                tracing::error!("Leaving dashboard as is: {}", e);
                body.to_string()
            }
        }
    }

    fn remote_failure(operation: &'static str, source: GatewayError) -> AnnotationError {
        tracing::error!("Unable to send {} request to CloudWatch: {}", operation, source);
        AnnotationError::Remote { operation, source }
    }
}
