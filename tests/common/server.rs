//! Test server lifecycle management
//!
//! This module manages spawning and shutting down test HTTP servers.
//! Each test gets an isolated copier server in front of its own pair of
//! fake n8n instances.

use super::constants::*;
use super::fixtures::{destination_workflow, source_workflows, FakeN8n};
use chrono::{TimeZone, Utc};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use workflow_copier::backend::Clock;
use workflow_copier::server::{make_app, RequestsLoggingLevel, ServerConfig};
use workflow_copier::{CopierApi, CopierService, HttpCopierApi, N8nClient};

/// Clock frozen at [`FROZEN_TIMESTAMP`]
fn frozen_clock() -> Clock {
    Arc::new(|| Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap())
}

/// Test server instance with isolated n8n instances
///
/// When dropped, the server gracefully shuts down along with its fake
/// instances.
pub struct TestServer {
    /// Base URL for making requests (e.g., "http://127.0.0.1:12345")
    pub base_url: String,

    /// The port the server is listening on
    pub port: u16,

    /// Source instance, for inspecting what the copier read
    pub source: Arc<FakeN8n>,

    /// Destination instance, for inspecting what the copier wrote
    pub destination: Arc<FakeN8n>,

    // Private fields - keep resources alive until drop
    _backend_server: Option<Box<TestServer>>,
    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestServer {
    /// Spawns a server whose destination does not hold any workflow yet
    pub async fn spawn() -> Self {
        Self::spawn_with(source_workflows(), Vec::new()).await
    }

    /// Spawns a server whose destination already holds the invoices workflow
    pub async fn spawn_with_existing_destination() -> Self {
        Self::spawn_with(source_workflows(), vec![destination_workflow()]).await
    }

    /// Spawns a server in local mode: pages and `/api` both use an in-process
    /// copier service talking to fake instances seeded with the given
    /// workflows.
    ///
    /// # Panics
    ///
    /// Panics if:
    /// - Port binding fails
    /// - Server fails to start
    /// - Server doesn't become ready within timeout
    pub async fn spawn_with(source_workflows: Vec<Value>, destination_workflows: Vec<Value>) -> Self {
        let source = Arc::new(FakeN8n::spawn(SOURCE_API_KEY, source_workflows).await);
        let destination =
            Arc::new(FakeN8n::spawn(DESTINATION_API_KEY, destination_workflows).await);

        let source_client = N8nClient::new(
            source.base_url.clone(),
            SOURCE_API_KEY.to_string(),
            REQUEST_TIMEOUT_SECS,
        )
        .expect("Failed to create source client");
        let destination_client = N8nClient::new(
            destination.base_url.clone(),
            DESTINATION_API_KEY.to_string(),
            REQUEST_TIMEOUT_SECS,
        )
        .expect("Failed to create destination client");

        let backend: Arc<dyn CopierApi> = Arc::new(CopierService::with_clock(
            Arc::new(source_client),
            Arc::new(destination_client),
            frozen_clock(),
        ));

        Self::start(backend.clone(), Some(backend), source, destination, None).await
    }

    /// Spawns a server in remote mode: its pages drive the `/api` of a second,
    /// local-mode server, and it serves no `/api` of its own.
    pub async fn spawn_remote(destination_workflows: Vec<Value>) -> Self {
        Self::spawn_remote_with(source_workflows(), destination_workflows).await
    }

    /// Same as [`TestServer::spawn_remote`], with custom source workflows
    pub async fn spawn_remote_with(
        source_workflows: Vec<Value>,
        destination_workflows: Vec<Value>,
    ) -> Self {
        let backend_server = Self::spawn_with(source_workflows, destination_workflows).await;

        let ui_api: Arc<dyn CopierApi> = Arc::new(
            HttpCopierApi::new(backend_server.base_url.clone(), REQUEST_TIMEOUT_SECS)
                .expect("Failed to create backend client"),
        );

        let source = backend_server.source.clone();
        let destination = backend_server.destination.clone();
        Self::start(
            ui_api,
            None,
            source,
            destination,
            Some(Box::new(backend_server)),
        )
        .await
    }

    async fn start(
        ui_api: Arc<dyn CopierApi>,
        backend: Option<Arc<dyn CopierApi>>,
        source: Arc<FakeN8n>,
        destination: Arc<FakeN8n>,
        backend_server: Option<Box<TestServer>>,
    ) -> Self {
        // Bind to random port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");

        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();

        let base_url = format!("http://127.0.0.1:{}", port);

        // Create shutdown channel
        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        let config = ServerConfig {
            requests_logging_level: RequestsLoggingLevel::None,
            port,
            session_ttl_sec: 3600,
        };
        let app = make_app(config, ui_api, backend, frozen_clock());

        // Spawn server in background task with graceful shutdown
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Server failed");
        });

        let server = Self {
            base_url,
            port,
            source,
            destination,
            _backend_server: backend_server,
            _shutdown_tx: Some(shutdown_tx),
        };

        server.wait_for_ready().await;

        server
    }

    /// Waits for the server to become ready by polling the /health endpoint
    async fn wait_for_ready(&self) {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(100))
            .build()
            .expect("Failed to build reqwest client");

        let start = std::time::Instant::now();
        let timeout = Duration::from_millis(SERVER_READY_TIMEOUT_MS);

        loop {
            if start.elapsed() > timeout {
                panic!(
                    "Server did not become ready within {}ms",
                    SERVER_READY_TIMEOUT_MS
                );
            }

            match client.get(format!("{}/health", self.base_url)).send().await {
                Ok(response) if response.status().is_success() => {
                    return;
                }
                _ => {
                    // Server not ready yet, wait and retry
                    tokio::time::sleep(Duration::from_millis(SERVER_READY_POLL_INTERVAL_MS)).await;
                }
            }
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        // Send shutdown signal
        if let Some(tx) = self._shutdown_tx.take() {
            let _ = tx.send(());
        }
        // Fake instances shut down when their last handle is dropped
    }
}
