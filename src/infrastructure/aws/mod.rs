//! AWS SDK configuration and clients
//!
//! Credentials and region come from the standard provider chain of the
//! execution environment; an explicitly configured region takes precedence.

use aws_config::{BehaviorVersion, Region, SdkConfig};

use crate::config::{AwsConfig, RegistryConfig};

/// Load the shared SDK configuration
pub async fn load_sdk_config(aws: &AwsConfig) -> SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());
    if let Some(ref region) = aws.region {
        loader = loader.region(Region::new(region.clone()));
    }
    loader.load().await
}

/// DynamoDB client for the connection registry
pub fn dynamodb_client(sdk_config: &SdkConfig, registry: &RegistryConfig) -> aws_sdk_dynamodb::Client {
    let mut builder = aws_sdk_dynamodb::config::Builder::from(sdk_config);
    if let Some(ref endpoint) = registry.endpoint_url {
        tracing::info!(endpoint = %endpoint, "Using custom DynamoDB endpoint");
        builder = builder.endpoint_url(endpoint);
    }
    aws_sdk_dynamodb::Client::from_conf(builder.build())
}
