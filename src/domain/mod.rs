// Domain layer - Dashboard documents and metric data
pub mod dashboard;
pub mod metric_data;
pub mod metric_entry;
