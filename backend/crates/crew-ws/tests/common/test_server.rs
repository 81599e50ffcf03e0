#![allow(dead_code)]

use crew_ws::{AppState, ConnectionConfig, ConnectionLimits, PresenceRegistry};

use axum::{Router, routing::get};
use axum_test::TestServer;
use tokio::time::{Duration, sleep};

/// Configuration for test server instances
#[derive(Debug, Clone)]
pub struct TestServerConfig {
    pub max_connections_total: usize,
    pub send_buffer_size: usize,
}

impl Default for TestServerConfig {
    fn default() -> Self {
        Self {
            max_connections_total: 100,
            send_buffer_size: 16,
        }
    }
}

impl TestServerConfig {
    /// Create config with strict connection limits (for limit tests)
    pub fn with_strict_limits() -> Self {
        Self {
            max_connections_total: 2,
            ..Default::default()
        }
    }
}

/// Test server with access to AppState for testing
pub struct TestServerWithState {
    pub server: TestServer,
    pub app_state: AppState,
}

/// Create a TestServer with default configuration
pub fn create_test_server() -> TestServerWithState {
    create_test_server_with_config(TestServerConfig::default())
}

/// Create a TestServer with custom configuration
pub fn create_test_server_with_config(config: TestServerConfig) -> TestServerWithState {
    let (app, app_state) = create_app(config);
    let server = TestServer::builder()
        .http_transport()
        .build(app)
        .expect("Failed to create test server");

    TestServerWithState { server, app_state }
}

/// Build the Axum Router with AppState
fn create_app(config: TestServerConfig) -> (Router, AppState) {
    let limits = ConnectionLimits {
        max_total: config.max_connections_total,
    };
    let connection_config = ConnectionConfig {
        send_buffer_size: config.send_buffer_size,
    };

    let app_state = AppState::new(connection_config, limits);

    let router = Router::new()
        .route("/ws/notifications", get(crew_ws::notification_handler))
        .route("/ws/chat", get(crew_ws::chat_handler))
        .with_state(app_state.clone());

    (router, app_state)
}

/// Poll until the registry holds `expected` registered identities.
///
/// Register events are processed by the socket task after the frame crosses
/// the transport, so tests wait for the state change instead of sleeping a
/// fixed interval.
pub async fn wait_for_sessions(registry: &PresenceRegistry, expected: usize) {
    for _ in 0..100 {
        if registry.session_count().await == expected {
            return;
        }
        sleep(Duration::from_millis(10)).await;
    }
    panic!(
        "registry never reached {expected} sessions (currently {})",
        registry.session_count().await
    );
}
