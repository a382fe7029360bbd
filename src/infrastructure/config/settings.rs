use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

use crate::error::Result;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub registry: RegistryConfig,
    #[serde(default)]
    pub aws: AwsConfig,
    #[serde(default)]
    pub otel: OtelConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Path the runtime posts raw gateway events to
    #[serde(default = "default_events_path")]
    pub events_path: String,
    /// Maximum accepted event body size in bytes
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegistryConfig {
    /// Registry backend: "dynamodb" or "memory"
    #[serde(default = "default_registry_backend")]
    pub backend: String,
    /// Backing table name (DYNAMODB_TABLE_NAME)
    #[serde(default)]
    pub table_name: String,
    /// Custom DynamoDB endpoint, e.g. DynamoDB Local
    #[serde(default)]
    pub endpoint_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AwsConfig {
    /// Deployment region (AWS_REGION)
    #[serde(default)]
    pub region: Option<String>,
    /// Management API endpoint used for every push, e.g. a local gateway emulator
    #[serde(default)]
    pub management_endpoint_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OtelConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_otel_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_service_name")]
    pub service_name: String,
    #[serde(default = "default_sampling_ratio")]
    pub sampling_ratio: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_events_path() -> String {
    "/events".to_string()
}

fn default_body_limit() -> usize {
    256 * 1024 // 256 KiB
}

fn default_registry_backend() -> String {
    "dynamodb".to_string()
}

fn default_otel_endpoint() -> String {
    "http://localhost:4317".to_string()
}

fn default_service_name() -> String {
    "ws-connection-service".to_string()
}

fn default_sampling_ratio() -> f64 {
    1.0
}

impl Settings {
    pub fn new() -> Result<Self> {
        // Load .env file if exists
        let _ = dotenvy::dotenv();

        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = Config::builder()
            // Start with default values
            .set_default("server.host", default_host())?
            .set_default("server.port", i64::from(default_port()))?
            .set_default("server.events_path", default_events_path())?
            .set_default("registry.backend", default_registry_backend())?
            // Load config file if exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // WSCONN_SERVER__PORT, WSCONN_REGISTRY__BACKEND, ...
            .add_source(
                Environment::with_prefix("WSCONN")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            // Names set by the deployment and the execution environment
            .set_override_option("registry.table_name", env::var("DYNAMODB_TABLE_NAME").ok())?
            .set_override_option("aws.region", env::var("AWS_REGION").ok())?
            .set_override_option("logging.format", env::var("LOG_FORMAT").ok())?
            .set_override_option("otel.enabled", env::var("OTEL_ENABLED").ok())?
            .set_override_option("otel.endpoint", env::var("OTEL_ENDPOINT").ok())?
            .set_override_option("otel.service_name", env::var("OTEL_SERVICE_NAME").ok())?;

        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject configurations the service cannot run with
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.registry.backend == "dynamodb" && self.registry.table_name.trim().is_empty() {
            return Err(ConfigError::Message(
                "registry.table_name (DYNAMODB_TABLE_NAME) is required for the dynamodb backend"
                    .to_string(),
            ));
        }
        if !self.server.events_path.starts_with('/') {
            return Err(ConfigError::Message(format!(
                "server.events_path must start with '/': {}",
                self.server.events_path
            )));
        }
        Ok(())
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            events_path: default_events_path(),
            body_limit_bytes: default_body_limit(),
        }
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            backend: default_registry_backend(),
            table_name: String::new(),
            endpoint_url: None,
        }
    }
}

impl Default for OtelConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: default_otel_endpoint(),
            service_name: default_service_name(),
            sampling_ratio: default_sampling_ratio(),
        }
    }
}
