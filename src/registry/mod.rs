//! Connection registry
//!
//! Tracks one record per live gateway connection. The production backend is a
//! DynamoDB table keyed by a composite of connection id, api id and stage; an
//! in-memory backend with identical semantics exists for development.

mod dynamo;
mod factory;
mod memory;
mod record;
mod traits;

pub use dynamo::DynamoConnectionRegistry;
pub use factory::create_connection_registry;
pub use memory::MemoryConnectionRegistry;
pub use record::{composite_key, ConnectionRecord, ENTITY_KEY_PREFIX, ENTITY_TYPE};
pub use traits::{ConnectionRegistry, RegistryBackend, RegistryError};
