// Application layer - Use cases and the gateway port
pub mod dashboard_annotator;
pub mod metrics_gateway;
pub mod metrics_publisher;
pub mod widget_selection;
