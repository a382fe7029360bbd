//! Connection identity and outbound message types

use thiserror::Error;

use crate::event::GatewayEvent;

/// Errors raised while building a connection identity
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectionError {
    /// A mandatory identity attribute was absent or blank
    #[error("missing required connection attribute: {0}")]
    MissingAttribute(&'static str),
}

/// One live push-capable session tracked by the registry.
///
/// The triple (`connection_id`, `api_id`, `stage`) identifies a connection;
/// `region` and `domain_name` are descriptive. Values are immutable once
/// constructed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Connection {
    region: String,
    api_id: String,
    stage: String,
    connection_id: String,
    domain_name: Option<String>,
}

impl Connection {
    pub fn new(
        region: Option<String>,
        api_id: Option<String>,
        stage: Option<String>,
        connection_id: Option<String>,
        domain_name: Option<String>,
    ) -> Result<Self, ConnectionError> {
        Ok(Self {
            region: required("region", region)?,
            api_id: required("apiId", api_id)?,
            stage: required("stage", stage)?,
            connection_id: required("connectionId", connection_id)?,
            domain_name: domain_name.filter(|d| !d.trim().is_empty()),
        })
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn api_id(&self) -> &str {
        &self.api_id
    }

    pub fn stage(&self) -> &str {
        &self.stage
    }

    pub fn connection_id(&self) -> &str {
        &self.connection_id
    }

    pub fn domain_name(&self) -> Option<&str> {
        self.domain_name.as_deref()
    }

    /// Identity triple: (connection_id, api_id, stage)
    pub fn identity(&self) -> (&str, &str, &str) {
        (&self.connection_id, &self.api_id, &self.stage)
    }
}

fn required(name: &'static str, value: Option<String>) -> Result<String, ConnectionError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ConnectionError::MissingAttribute(name)),
    }
}

/// Identity fields as discovered on an inbound event
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionContext {
    pub region: Option<String>,
    pub api_id: Option<String>,
    pub stage: Option<String>,
    pub connection_id: Option<String>,
    pub domain_name: Option<String>,
}

impl ConnectionContext {
    /// Collect identity fields from the event's request context.
    /// The region is not part of the event and comes from the environment.
    pub fn from_event(event: &GatewayEvent, region: Option<&str>) -> Self {
        let ctx = &event.request_context;
        Self {
            region: region.map(str::to_string),
            api_id: ctx.api_id.clone(),
            stage: ctx.stage.clone(),
            connection_id: ctx.connection_id.clone(),
            domain_name: ctx.domain_name.clone(),
        }
    }
}

/// Build the connection identity for an event context
pub fn build_connection(context: &ConnectionContext) -> Result<Connection, ConnectionError> {
    Connection::new(
        context.region.clone(),
        context.api_id.clone(),
        context.stage.clone(),
        context.connection_id.clone(),
        context.domain_name.clone(),
    )
}

/// Outbound content for a single connection. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub connection: Connection,
    pub body: String,
}

impl Message {
    pub fn new(connection: Connection, body: impl Into<String>) -> Self {
        Self {
            connection,
            body: body.into(),
        }
    }
}
