//! Inbound gateway events and their classification.
//!
//! The gateway runtime delivers one JSON document per lifecycle or message
//! event. Only the fields the service acts on are modelled; everything else
//! in the payload is ignored on deserialization.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle event kinds the dispatcher acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EventKind {
    Connect,
    Disconnect,
    Message,
}

impl EventKind {
    /// Map a raw `eventType` token to a known kind.
    ///
    /// Matching is exact and case-sensitive. Unknown, empty or absent tokens
    /// yield `None` rather than an error.
    pub fn classify(token: Option<&str>) -> Option<Self> {
        match token? {
            "CONNECT" => Some(Self::Connect),
            "DISCONNECT" => Some(Self::Disconnect),
            "MESSAGE" => Some(Self::Message),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Connect => "CONNECT",
            Self::Disconnect => "DISCONNECT",
            Self::Message => "MESSAGE",
        }
    }

    /// Lower-case label used for metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Connect => "connect",
            Self::Disconnect => "disconnect",
            Self::Message => "message",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request context attached to every gateway event
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestContext {
    #[serde(default)]
    pub event_type: Option<String>,
    #[serde(default)]
    pub route_key: Option<String>,
    #[serde(default)]
    pub api_id: Option<String>,
    #[serde(default)]
    pub stage: Option<String>,
    #[serde(default)]
    pub connection_id: Option<String>,
    #[serde(default)]
    pub domain_name: Option<String>,
    #[serde(default)]
    pub request_id: Option<String>,
}

/// Raw event as delivered by the gateway runtime
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayEvent {
    #[serde(default)]
    pub request_context: RequestContext,
    #[serde(default)]
    pub body: Option<String>,
}

impl GatewayEvent {
    pub fn kind(&self) -> Option<EventKind> {
        EventKind::classify(self.request_context.event_type.as_deref())
    }
}
