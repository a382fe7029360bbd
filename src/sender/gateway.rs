//! API Gateway management API sender

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_apigatewaymanagement::error::{DisplayErrorContext, SdkError};
use aws_sdk_apigatewaymanagement::operation::post_to_connection::PostToConnectionError;
use aws_sdk_apigatewaymanagement::primitives::Blob;
use aws_sdk_apigatewaymanagement::Client;

use crate::connection::{Connection, Message};
use crate::metrics::PushMetrics;

use super::traits::{MessageSender, SendError};

/// Management endpoint for a connection: `https://<domainName>/<stage>`.
///
/// Without a domain name the default execute-api host of the connection's
/// api and region is used.
pub fn management_endpoint(connection: &Connection) -> String {
    match connection.domain_name() {
        Some(domain_name) => format!("https://{}/{}", domain_name, connection.stage()),
        None => format!(
            "https://{}.execute-api.{}.amazonaws.com/{}",
            connection.api_id(),
            connection.region(),
            connection.stage()
        ),
    }
}

/// Sends messages through the gateway's `PostToConnection` operation
pub struct ApiGatewaySender {
    config: aws_sdk_apigatewaymanagement::Config,
    endpoint_override: Option<String>,
}

impl ApiGatewaySender {
    pub fn new(sdk_config: &SdkConfig) -> Self {
        Self::from_conf(aws_sdk_apigatewaymanagement::config::Builder::from(sdk_config).build())
    }

    pub fn from_conf(config: aws_sdk_apigatewaymanagement::Config) -> Self {
        Self {
            config,
            endpoint_override: None,
        }
    }

    /// Address every push at one fixed endpoint instead of the connection's own
    pub fn with_endpoint_url(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint_override = Some(endpoint.into());
        self
    }

    fn endpoint_for(&self, connection: &Connection) -> String {
        self.endpoint_override
            .clone()
            .unwrap_or_else(|| management_endpoint(connection))
    }

    fn client_for(&self, connection: &Connection) -> Client {
        let config = self
            .config
            .to_builder()
            .endpoint_url(self.endpoint_for(connection))
            .build();
        Client::from_conf(config)
    }
}

/// `GoneException` means the gateway already dropped the connection
fn send_error(connection_id: &str, err: &SdkError<PostToConnectionError>) -> SendError {
    let gone = err
        .as_service_error()
        .map(|se| se.is_gone_exception())
        .unwrap_or(false);

    if gone {
        SendError::Gone {
            connection_id: connection_id.to_string(),
        }
    } else {
        SendError::Gateway(DisplayErrorContext(err).to_string())
    }
}

#[async_trait]
impl MessageSender for ApiGatewaySender {
    #[tracing::instrument(
        name = "sender.send",
        skip(self, message),
        fields(connection_id = %message.connection.connection_id())
    )]
    async fn send(&self, message: &Message) -> Result<(), SendError> {
        let connection = &message.connection;

        let result = self
            .client_for(connection)
            .post_to_connection()
            .connection_id(connection.connection_id())
            .data(Blob::new(message.body.as_bytes()))
            .send()
            .await;

        match result {
            Ok(_) => {
                PushMetrics::record_success();
                tracing::debug!(bytes = message.body.len(), "Message pushed to connection");
                Ok(())
            }
            Err(e) => match send_error(connection.connection_id(), &e) {
                err @ SendError::Gone { .. } => {
                    PushMetrics::record_gone();
                    tracing::warn!("Target connection is gone");
                    Err(err)
                }
                err => {
                    PushMetrics::record_error();
                    Err(err)
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_apigatewaymanagement::config::retry::RetryConfig;
    use aws_sdk_apigatewaymanagement::config::{BehaviorVersion, Credentials, Region};
    use serde_json::json;
    use tokio_test::{assert_err, assert_ok};
    use wiremock::matchers::{body_string, method, path_regex};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sender(server: &MockServer) -> ApiGatewaySender {
        let config = aws_sdk_apigatewaymanagement::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .credentials_provider(Credentials::new("AKIDTEST", "secret", None, None, "test"))
            .retry_config(RetryConfig::disabled())
            .build();
        ApiGatewaySender::from_conf(config).with_endpoint_url(format!("{}/prod", server.uri()))
    }

    fn message(body: &str) -> Message {
        Message::new(connection(Some("d1"), "prod"), body.to_string())
    }

    fn connection(domain_name: Option<&str>, stage: &str) -> Connection {
        Connection::new(
            Some("us-east-1".to_string()),
            Some("ydvi4h9bvd".to_string()),
            Some(stage.to_string()),
            Some("x94eGsoAMCLig=".to_string()),
            domain_name.map(str::to_string),
        )
        .unwrap()
    }

    #[test]
    fn test_endpoint_from_domain_name() {
        assert_eq!(
            management_endpoint(&connection(Some("d1.example.com"), "production")),
            "https://d1.example.com/production"
        );
        assert_eq!(
            management_endpoint(&connection(
                Some("ydvi4h9bvd.execute-api.us-east-1.amazonaws.com"),
                "production"
            )),
            "https://ydvi4h9bvd.execute-api.us-east-1.amazonaws.com/production"
        );
    }

    #[test]
    fn test_endpoint_without_domain_name() {
        assert_eq!(
            management_endpoint(&connection(None, "prod")),
            "https://ydvi4h9bvd.execute-api.us-east-1.amazonaws.com/prod"
        );
    }

    #[test]
    fn test_endpoint_override_applies_to_every_connection() {
        let config = aws_sdk_apigatewaymanagement::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .build();
        let sender = ApiGatewaySender::from_conf(config.clone());
        assert_eq!(
            sender.endpoint_for(&connection(Some("d1"), "prod")),
            "https://d1/prod"
        );

        let sender = ApiGatewaySender::from_conf(config).with_endpoint_url("http://localhost:4510");
        assert_eq!(
            sender.endpoint_for(&connection(Some("d1"), "prod")),
            "http://localhost:4510"
        );
    }

    #[tokio::test]
    async fn test_send_posts_body_to_connection() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path_regex("^/prod/.*connections/.+$"))
            .and(body_string("You said hi"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        assert_ok!(sender(&server).send(&message("You said hi")).await);
    }

    #[tokio::test]
    async fn test_gone_exception_maps_to_gone() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(410)
                    .insert_header("x-amzn-errortype", "GoneException")
                    .set_body_json(json!({ "message": "Connection is gone" })),
            )
            .mount(&server)
            .await;

        let err = assert_err!(sender(&server).send(&message("You said hi")).await);
        assert_eq!(
            err,
            SendError::Gone {
                connection_id: "x94eGsoAMCLig=".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_other_gateway_errors_map_to_gateway() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(403)
                    .insert_header("x-amzn-errortype", "ForbiddenException")
                    .set_body_json(json!({ "message": "Forbidden" })),
            )
            .mount(&server)
            .await;

        let err = assert_err!(sender(&server).send(&message("You said hi")).await);
        assert!(matches!(err, SendError::Gateway(_)));
    }
}
