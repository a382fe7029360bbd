use std::sync::Arc;

use anyhow::Result;
use tokio::net::TcpListener;
use tokio::signal;

use ws_connection_service::aws::{dynamodb_client, load_sdk_config};
use ws_connection_service::config::Settings;
use ws_connection_service::dispatcher::GatewayDispatcher;
use ws_connection_service::registry::create_connection_registry;
use ws_connection_service::sender::ApiGatewaySender;
use ws_connection_service::server::{create_app, AppState};
use ws_connection_service::telemetry::init_telemetry;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let settings = Settings::new()?;

    // Initialize tracing
    let _telemetry = init_telemetry(&settings.logging, &settings.otel)?;
    tracing::info!("Configuration loaded");

    // AWS clients
    let sdk_config = load_sdk_config(&settings.aws).await;
    let region = settings
        .aws
        .region
        .clone()
        .or_else(|| sdk_config.region().map(|r| r.to_string()));
    if region.is_none() {
        tracing::warn!("No AWS region configured; connection events will fail validation");
    }

    let dynamodb = match settings.registry.backend.as_str() {
        "dynamodb" => Some(dynamodb_client(&sdk_config, &settings.registry)),
        _ => None,
    };
    let registry = create_connection_registry(&settings.registry, dynamodb)?;
    let mut sender = ApiGatewaySender::new(&sdk_config);
    if let Some(ref endpoint) = settings.aws.management_endpoint_url {
        tracing::info!(endpoint = %endpoint, "Using custom management API endpoint");
        sender = sender.with_endpoint_url(endpoint.clone());
    }
    let sender = Arc::new(sender);

    let dispatcher = Arc::new(GatewayDispatcher::new(registry, sender, region));
    let state = AppState::new(settings.clone(), dispatcher);
    tracing::info!("Application state initialized");

    let app = create_app(state);

    // Start server
    let addr = settings.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(
        events_path = %settings.server.events_path,
        "Server listening on {}",
        addr
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received terminate signal, initiating graceful shutdown");
        }
    }
}
