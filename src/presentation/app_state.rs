// Application state for HTTP handlers
use crate::application::metrics_publisher::MetricsPublisher;

#[derive(Clone)]
pub struct AppState {
    pub metrics_publisher: MetricsPublisher,
}
