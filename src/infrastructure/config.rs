use crate::domain::metric_data::DimensionKeyPair;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,
    pub cloudwatch: CloudWatchSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct CloudWatchSettings {
    /// Base URL of the CloudWatch JSON API, or of a signing proxy in front of it
    pub endpoint: String,
    #[serde(default)]
    pub token: Option<String>,
    pub namespace: String,
    pub metric_prefix: String,
    #[serde(default)]
    pub dashboard_name: Option<String>,
    #[serde(default)]
    pub cluster_name: Option<String>,
    #[serde(default = "default_report_server_start")]
    pub report_server_start: bool,
    #[serde(default)]
    pub dimensions: Vec<DimensionKeyPair>,
}

impl CloudWatchSettings {
    /// Dashboard to annotate on startup. Falls back to the cluster name when
    /// no dashboard name is set; `None` when reporting is switched off.
    pub fn dashboard_target(&self) -> Option<&str> {
        if !self.report_server_start {
            return None;
        }
        non_empty(&self.dashboard_name).or_else(|| non_empty(&self.cluster_name))
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_report_server_start() -> bool {
    true
}

pub fn load_app_config() -> anyhow::Result<AppConfig> {
    read_app_config("config/cloudwatch", environment())
}

/// `APP_CLOUDWATCH__DASHBOARD_NAME` overrides `cloudwatch.dashboard_name`
fn environment() -> config::Environment {
    config::Environment::with_prefix("APP")
        .prefix_separator("_")
        .separator("__")
}

fn read_app_config(file_name: &str, environment: config::Environment) -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name(file_name).required(false))
        .add_source(environment)
        .build()?;

    Ok(settings.try_deserialize()?)
}
