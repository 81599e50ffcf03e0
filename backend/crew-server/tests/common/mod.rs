#![allow(dead_code)]

//! Test infrastructure for crew-server API tests

use crew_server::{NotificationStore, Notifier, ServerState, SqliteNotificationStore, build_router};
use crew_ws::{AppState, ConnectionConfig, ConnectionLimits, PresenceRegistry};

use std::sync::Arc;

use axum_test::TestServer;
use serde_json::{Value, json};
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use tokio::time::{Duration, sleep, timeout};

/// Create a test pool with in-memory SQLite.
/// Single connection so every query sees the same in-memory database.
pub async fn create_test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(":memory:")
        .await
        .expect("Failed to create test database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

/// Create ServerState for testing (no Prometheus recorder)
pub async fn create_test_state() -> ServerState {
    let pool = create_test_pool().await;
    let ws = AppState::new(ConnectionConfig::default(), ConnectionLimits::default());
    let store: Arc<dyn NotificationStore> = Arc::new(SqliteNotificationStore::new(pool.clone()));
    let notifier = Notifier::new(store.clone(), ws.notifications.clone());

    ServerState {
        ws,
        pool,
        store,
        notifier,
        prometheus: None,
    }
}

/// Test server with access to ServerState
pub struct TestServerWithState {
    pub server: TestServer,
    pub state: ServerState,
}

pub async fn create_test_server() -> TestServerWithState {
    let state = create_test_state().await;
    let server = TestServer::builder()
        .http_transport()
        .build(build_router(state.clone()))
        .expect("Failed to create test server");

    TestServerWithState { server, state }
}

/// WebSocket client for the notification namespace
pub struct NotificationClient {
    ws: axum_test::TestWebSocket,
}

impl NotificationClient {
    pub async fn connect(server: &TestServer) -> Self {
        let ws = server
            .get_websocket("/ws/notifications")
            .await
            .into_websocket()
            .await;
        Self { ws }
    }

    pub async fn register(&mut self, user_id: i64) {
        self.ws
            .send_text(json!({"event": "register", "data": {"user_id": user_id}}).to_string())
            .await;
    }

    pub async fn receive_event(&mut self) -> Value {
        let text = self.ws.receive_text().await;
        serde_json::from_str(&text).expect("server frames are valid JSON")
    }

    /// Assert that no frame arrives within a short grace period
    pub async fn expect_silence(&mut self) {
        if let Ok(text) = timeout(Duration::from_millis(150), self.ws.receive_text()).await {
            panic!("expected no frames, received: {text}");
        }
    }

    pub async fn close(self) {
        self.ws.close().await;
    }
}

/// Poll until the registry holds `expected` registered identities
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
