//! DynamoDB-backed connection registry

use std::collections::HashMap;
use std::time::Instant;

use async_trait::async_trait;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;

use crate::connection::Connection;
use crate::metrics::RegistryMetrics;

use super::record::ConnectionRecord;
use super::traits::{ConnectionRegistry, RegistryBackend, RegistryError};

/// Registry storing one item per connection in a DynamoDB table
pub struct DynamoConnectionRegistry {
    client: Client,
    table_name: String,
}

impl DynamoConnectionRegistry {
    pub fn new(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }
}

fn attribute_map(attributes: Vec<(&'static str, String)>) -> HashMap<String, AttributeValue> {
    attributes
        .into_iter()
        .map(|(name, value)| (name.to_string(), AttributeValue::S(value)))
        .collect()
}

#[async_trait]
impl ConnectionRegistry for DynamoConnectionRegistry {
    fn backend_type(&self) -> RegistryBackend {
        RegistryBackend::DynamoDb
    }

    #[tracing::instrument(
        name = "registry.save",
        skip(self, connection),
        fields(connection_id = %connection.connection_id(), table = %self.table_name)
    )]
    async fn save(&self, connection: &Connection) -> Result<(), RegistryError> {
        let record = ConnectionRecord::from(connection);
        let started = Instant::now();

        let result = self
            .client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(attribute_map(record.attributes())))
            .send()
            .await;

        RegistryMetrics::observe("save", started.elapsed(), result.is_ok());
        result.map_err(|e| RegistryError::DynamoDb(DisplayErrorContext(&e).to_string()))?;

        tracing::debug!(pk = %record.pk, "Connection saved");
        Ok(())
    }

    #[tracing::instrument(
        name = "registry.delete",
        skip(self, connection),
        fields(connection_id = %connection.connection_id(), table = %self.table_name)
    )]
    async fn delete(&self, connection: &Connection) -> Result<(), RegistryError> {
        let record = ConnectionRecord::from(connection);
        let started = Instant::now();

        // DeleteItem on a missing key succeeds, which keeps delete idempotent
        let result = self
            .client
            .delete_item()
            .table_name(&self.table_name)
            .set_key(Some(attribute_map(record.key())))
            .send()
            .await;

        RegistryMetrics::observe("delete", started.elapsed(), result.is_ok());
        result.map_err(|e| RegistryError::DynamoDb(DisplayErrorContext(&e).to_string()))?;

        tracing::debug!(pk = %record.pk, "Connection deleted");
        Ok(())
    }
}
