//! Connection registry factory

use std::sync::Arc;

use crate::config::RegistryConfig;

use super::dynamo::DynamoConnectionRegistry;
use super::memory::MemoryConnectionRegistry;
use super::traits::{ConnectionRegistry, RegistryError};

/// Create a connection registry based on configuration.
///
/// - `"dynamodb"` (default): requires a DynamoDB client and a table name
/// - `"memory"`: process-local registry for development and tests
///
/// A DynamoDB registry is never silently replaced by the memory one: a
/// process-local map would accept writes that other instances cannot see.
pub fn create_connection_registry(
    config: &RegistryConfig,
    client: Option<aws_sdk_dynamodb::Client>,
) -> Result<Arc<dyn ConnectionRegistry>, RegistryError> {
    match config.backend.as_str() {
        "memory" => {
            tracing::warn!(backend = "memory", "Creating in-memory connection registry");
            Ok(Arc::new(MemoryConnectionRegistry::new()))
        }
        "dynamodb" => {
            let client = client.ok_or_else(|| {
                RegistryError::Misconfigured("DynamoDB backend requires a client".to_string())
            })?;
            if config.table_name.trim().is_empty() {
                return Err(RegistryError::Misconfigured(
                    "DynamoDB table name is not set".to_string(),
                ));
            }
            tracing::info!(
                backend = "dynamodb",
                table = %config.table_name,
                "Creating DynamoDB connection registry"
            );
            Ok(Arc::new(DynamoConnectionRegistry::new(
                client,
                config.table_name.clone(),
            )))
        }
        other => Err(RegistryError::Misconfigured(format!(
            "unknown registry backend: {}",
            other
        ))),
    }
}
