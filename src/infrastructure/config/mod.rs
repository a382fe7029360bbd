mod settings;

pub use settings::{
    AwsConfig, LogFormat, LoggingConfig, OtelConfig, RegistryConfig, ServerConfig, Settings,
};
