//! Dispatcher integration tests
//!
//! These tests drive the dispatcher with raw gateway events against the
//! in-memory registry and recording collaborators, without AWS access.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;
use tokio_test::{assert_err, assert_ok};

use ws_connection_service::connection::{Connection, Message};
use ws_connection_service::dispatcher::{Acknowledgment, GatewayDispatcher};
use ws_connection_service::error::AppError;
use ws_connection_service::event::GatewayEvent;
use ws_connection_service::registry::{
    composite_key, ConnectionRegistry, MemoryConnectionRegistry, RegistryBackend, RegistryError,
};
use ws_connection_service::sender::{management_endpoint, MessageSender, SendError};

const REGION: &str = "us-east-1";

#[derive(Debug, Clone, PartialEq, Eq)]
enum RegistryCall {
    Save(Connection),
    Delete(Connection),
}

/// Registry that records calls and delegates to the in-memory registry
#[derive(Default)]
struct RecordingRegistry {
    inner: MemoryConnectionRegistry,
    calls: Mutex<Vec<RegistryCall>>,
}

impl RecordingRegistry {
    fn calls(&self) -> Vec<RegistryCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ConnectionRegistry for RecordingRegistry {
    fn backend_type(&self) -> RegistryBackend {
        RegistryBackend::Memory
    }

    async fn save(&self, connection: &Connection) -> Result<(), RegistryError> {
        self.calls
            .lock()
            .unwrap()
            .push(RegistryCall::Save(connection.clone()));
        self.inner.save(connection).await
    }

    async fn delete(&self, connection: &Connection) -> Result<(), RegistryError> {
        self.calls
            .lock()
            .unwrap()
            .push(RegistryCall::Delete(connection.clone()));
        self.inner.delete(connection).await
    }
}

/// Registry whose every operation fails
struct FailingRegistry;

#[async_trait]
impl ConnectionRegistry for FailingRegistry {
    fn backend_type(&self) -> RegistryBackend {
        RegistryBackend::DynamoDb
    }

    async fn save(&self, _connection: &Connection) -> Result<(), RegistryError> {
        Err(RegistryError::DynamoDb("ProvisionedThroughputExceededException".to_string()))
    }

    async fn delete(&self, _connection: &Connection) -> Result<(), RegistryError> {
        Err(RegistryError::DynamoDb("ServiceUnavailable".to_string()))
    }
}

/// Sender that records messages, optionally failing every send
#[derive(Default)]
struct RecordingSender {
    sent: Mutex<Vec<Message>>,
    fail_gone: bool,
}

impl RecordingSender {
    fn gone() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail_gone: true,
        }
    }

    fn sent(&self) -> Vec<Message> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessageSender for RecordingSender {
    async fn send(&self, message: &Message) -> Result<(), SendError> {
        self.sent.lock().unwrap().push(message.clone());
        if self.fail_gone {
            return Err(SendError::Gone {
                connection_id: message.connection.connection_id().to_string(),
            });
        }
        Ok(())
    }
}

struct TestEnvironment {
    registry: Arc<RecordingRegistry>,
    sender: Arc<RecordingSender>,
    dispatcher: GatewayDispatcher,
}

fn create_test_environment(sender: RecordingSender) -> TestEnvironment {
    let registry = Arc::new(RecordingRegistry::default());
    let sender = Arc::new(sender);
    let dispatcher = GatewayDispatcher::new(
        registry.clone(),
        sender.clone(),
        Some(REGION.to_string()),
    );
    TestEnvironment {
        registry,
        sender,
        dispatcher,
    }
}

fn event(event_type: &str, body: Option<&str>) -> GatewayEvent {
    serde_json::from_value(json!({
        "requestContext": {
            "eventType": event_type,
            "apiId": "A1",
            "stage": "prod",
            "connectionId": "C1",
            "domainName": "d1"
        },
        "body": body
    }))
    .unwrap()
}

fn expected_connection() -> Connection {
    Connection::new(
        Some(REGION.to_string()),
        Some("A1".to_string()),
        Some("prod".to_string()),
        Some("C1".to_string()),
        Some("d1".to_string()),
    )
    .unwrap()
}

// =============================================================================
// Lifecycle scenarios
// =============================================================================

mod lifecycle_tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_saves_connection() {
        let env = create_test_environment(RecordingSender::default());

        let ack = assert_ok!(env.dispatcher.dispatch(&event("CONNECT", None)).await);

        assert_eq!(ack, Acknowledgment::ok());
        assert_eq!(env.registry.calls(), vec![RegistryCall::Save(expected_connection())]);
        assert_eq!(env.registry.inner.len(), 1);
        assert!(env.sender.sent().is_empty());
    }

    #[tokio::test]
    async fn test_disconnect_deletes_same_identity() {
        let env = create_test_environment(RecordingSender::default());

        assert_ok!(env.dispatcher.dispatch(&event("CONNECT", None)).await);
        let ack = assert_ok!(env.dispatcher.dispatch(&event("DISCONNECT", None)).await);

        assert_eq!(ack.status_code, 200);
        assert_eq!(
            env.registry.calls(),
            vec![
                RegistryCall::Save(expected_connection()),
                RegistryCall::Delete(expected_connection()),
            ]
        );
        assert!(env.registry.inner.is_empty());
    }

    #[tokio::test]
    async fn test_message_is_echoed_to_connection() {
        let env = create_test_environment(RecordingSender::default());

        let ack = assert_ok!(env.dispatcher.dispatch(&event("MESSAGE", Some("hi"))).await);

        assert_eq!(ack, Acknowledgment::ok());
        let sent = env.sender.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].body, "You said hi");
        assert_eq!(sent[0].connection, expected_connection());
        assert_eq!(management_endpoint(&sent[0].connection), "https://d1/prod");
        assert!(env.registry.calls().is_empty());
    }

    #[tokio::test]
    async fn test_message_without_body_echoes_prefix_only() {
        let env = create_test_environment(RecordingSender::default());

        let ack = assert_ok!(env.dispatcher.dispatch(&event("MESSAGE", None)).await);

        assert_eq!(ack, Acknowledgment::ok());
        let sent = env.sender.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].body, "You said ");
        assert_eq!(sent[0].connection, expected_connection());
    }

    #[tokio::test]
    async fn test_unrecognized_event_is_acknowledged_without_action() {
        let env = create_test_environment(RecordingSender::default());

        let ack = assert_ok!(env.dispatcher.dispatch(&event("PING", None)).await);

        assert_eq!(ack, Acknowledgment::ok());
        assert!(env.registry.calls().is_empty());
        assert!(env.sender.sent().is_empty());
        assert_eq!(env.dispatcher.stats().ignored, 1);
    }

    #[tokio::test]
    async fn test_missing_event_type_is_acknowledged() {
        let env = create_test_environment(RecordingSender::default());
        let event: GatewayEvent = serde_json::from_value(json!({ "body": "x" })).unwrap();

        let ack = assert_ok!(env.dispatcher.dispatch(&event).await);

        assert_eq!(ack, Acknowledgment::ok());
        assert!(env.registry.calls().is_empty());
    }

    #[tokio::test]
    async fn test_connect_missing_connection_id_fails_validation() {
        let env = create_test_environment(RecordingSender::default());
        let mut event = event("CONNECT", None);
        event.request_context.connection_id = None;

        let err = assert_err!(env.dispatcher.dispatch(&event).await);

        assert!(matches!(err, AppError::Validation(_)));
        assert!(env.registry.calls().is_empty());
        assert_eq!(env.dispatcher.stats().failed, 1);
    }

    #[tokio::test]
    async fn test_missing_region_fails_validation() {
        let registry = Arc::new(RecordingRegistry::default());
        let dispatcher = GatewayDispatcher::new(
            registry.clone(),
            Arc::new(RecordingSender::default()),
            None,
        );

        let err = assert_err!(dispatcher.dispatch(&event("CONNECT", None)).await);

        assert!(matches!(err, AppError::Validation(_)));
        assert!(registry.calls().is_empty());
    }
}

// =============================================================================
// Idempotence
// =============================================================================

mod idempotence_tests {
    use super::*;

    #[tokio::test]
    async fn test_repeated_connect_keeps_one_record() {
        let env = create_test_environment(RecordingSender::default());

        assert_ok!(env.dispatcher.dispatch(&event("CONNECT", None)).await);
        assert_ok!(env.dispatcher.dispatch(&event("CONNECT", None)).await);

        assert_eq!(env.registry.inner.len(), 1);
        let record = env
            .registry
            .inner
            .get(&composite_key(&expected_connection()))
            .unwrap();
        assert_eq!(record.pk, "WEBSOCKETCONNECTION#C1#A1#prod");
        assert_eq!(record.domain_name.as_deref(), Some("d1"));
    }

    #[tokio::test]
    async fn test_disconnect_without_connect_succeeds() {
        let env = create_test_environment(RecordingSender::default());

        let ack = assert_ok!(env.dispatcher.dispatch(&event("DISCONNECT", None)).await);

        assert_eq!(ack, Acknowledgment::ok());
        assert!(env.registry.inner.is_empty());
    }

    #[tokio::test]
    async fn test_message_does_not_persist_connection() {
        let env = create_test_environment(RecordingSender::default());

        assert_ok!(env.dispatcher.dispatch(&event("MESSAGE", Some("a"))).await);
        assert_ok!(env.dispatcher.dispatch(&event("MESSAGE", Some("b"))).await);

        assert!(env.registry.inner.is_empty());
        assert_eq!(env.sender.sent().len(), 2);
    }
}

// =============================================================================
// Error propagation
// =============================================================================

mod error_tests {
    use super::*;

    #[tokio::test]
    async fn test_storage_error_is_propagated() {
        let dispatcher = GatewayDispatcher::new(
            Arc::new(FailingRegistry),
            Arc::new(RecordingSender::default()),
            Some(REGION.to_string()),
        );

        let err = assert_err!(dispatcher.dispatch(&event("CONNECT", None)).await);
        assert!(matches!(err, AppError::Storage(_)));

        let err = assert_err!(dispatcher.dispatch(&event("DISCONNECT", None)).await);
        assert!(matches!(err, AppError::Storage(_)));

        assert_eq!(dispatcher.stats().failed, 2);
    }

    #[tokio::test]
    async fn test_send_failure_is_propagated_without_registry_cleanup() {
        let env = create_test_environment(RecordingSender::gone());

        assert_ok!(env.dispatcher.dispatch(&event("CONNECT", None)).await);
        let err = assert_err!(env.dispatcher.dispatch(&event("MESSAGE", Some("hi"))).await);

        assert!(matches!(err, AppError::Send(SendError::Gone { .. })));
        // The stale record stays until the gateway reports the disconnect
        assert_eq!(env.registry.inner.len(), 1);
        assert_eq!(env.registry.calls(), vec![RegistryCall::Save(expected_connection())]);
    }

    #[tokio::test]
    async fn test_stats_track_each_kind() {
        let env = create_test_environment(RecordingSender::default());

        assert_ok!(env.dispatcher.dispatch(&event("CONNECT", None)).await);
        assert_ok!(env.dispatcher.dispatch(&event("MESSAGE", Some("x"))).await);
        assert_ok!(env.dispatcher.dispatch(&event("DISCONNECT", None)).await);
        assert_ok!(env.dispatcher.dispatch(&event("connect", None)).await);

        let stats = env.dispatcher.stats();
        assert_eq!(stats.connects, 1);
        assert_eq!(stats.messages, 1);
        assert_eq!(stats.disconnects, 1);
        assert_eq!(stats.ignored, 1);
        assert_eq!(stats.failed, 0);
    }
}
