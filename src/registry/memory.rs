//! In-memory connection registry
//!
//! Process-local and lost on restart. Intended for local development and
//! tests; it applies the same record layout and idempotence rules as the
//! DynamoDB registry.

use std::time::Instant;

use async_trait::async_trait;
use dashmap::DashMap;

use crate::connection::Connection;
use crate::metrics::RegistryMetrics;

use super::record::ConnectionRecord;
use super::traits::{ConnectionRegistry, RegistryBackend, RegistryError};

#[derive(Default)]
pub struct MemoryConnectionRegistry {
    /// Records keyed by composite key
    records: DashMap<String, ConnectionRecord>,
}

impl MemoryConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look up a record by its composite key
    pub fn get(&self, key: &str) -> Option<ConnectionRecord> {
        self.records.get(key).map(|r| r.value().clone())
    }

    /// Snapshot of all stored records
    pub fn records(&self) -> Vec<ConnectionRecord> {
        self.records.iter().map(|r| r.value().clone()).collect()
    }
}

#[async_trait]
impl ConnectionRegistry for MemoryConnectionRegistry {
    fn backend_type(&self) -> RegistryBackend {
        RegistryBackend::Memory
    }

    async fn save(&self, connection: &Connection) -> Result<(), RegistryError> {
        let started = Instant::now();
        let record = ConnectionRecord::from(connection);
        self.records.insert(record.pk.clone(), record);
        RegistryMetrics::observe("save", started.elapsed(), true);
        Ok(())
    }

    async fn delete(&self, connection: &Connection) -> Result<(), RegistryError> {
        let started = Instant::now();
        let record = ConnectionRecord::from(connection);
        if self.records.remove(&record.pk).is_none() {
            tracing::debug!(pk = %record.pk, "Delete of absent connection");
        }
        RegistryMetrics::observe("delete", started.elapsed(), true);
        Ok(())
    }
}
