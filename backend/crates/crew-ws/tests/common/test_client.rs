#![allow(dead_code)]

use axum_test::{TestServer, TestWebSocket};
use serde_json::{Value, json};
use tokio::time::{Duration, timeout};

/// WebSocket test client speaking the JSON event protocol
pub struct WsTestClient {
    ws: TestWebSocket,
}

impl WsTestClient {
    /// Connect to the notification namespace
    pub async fn connect_notifications(server: &TestServer) -> Self {
        Self::connect(server, "/ws/notifications").await
    }

    /// Connect to the chat namespace
    pub async fn connect_chat(server: &TestServer) -> Self {
        Self::connect(server, "/ws/chat").await
    }

    async fn connect(server: &TestServer, path: &str) -> Self {
        let ws = server.get_websocket(path).await.into_websocket().await;
        Self { ws }
    }

    /// Claim an identity on this connection
    pub async fn register(&mut self, user_id: i64) {
        self.send_event(json!({
            "event": "register",
            "data": { "user_id": user_id }
        }))
        .await;
    }

    /// Send a chat message to another user
    pub async fn send_chat(&mut self, target_user_id: i64, message: &str) {
        self.send_event(json!({
            "event": "send_message",
            "data": { "targetUserId": target_user_id, "message": message }
        }))
        .await;
    }

    /// Send a raw JSON event frame
    pub async fn send_event(&mut self, event: Value) {
        self.ws.send_text(event.to_string()).await;
    }

    /// Send an arbitrary text frame (for malformed-input tests)
    pub async fn send_text(&mut self, text: impl std::fmt::Display) {
        self.ws.send_text(text).await;
    }

    /// Receive the next event frame as JSON
    pub async fn receive_event(&mut self) -> Value {
        let text = self.ws.receive_text().await;
        serde_json::from_str(&text).expect("server frames are valid JSON")
    }

    /// Receive the next event frame, or None if nothing arrives within `wait`
    pub async fn try_receive_event(&mut self, wait: Duration) -> Option<Value> {
        match timeout(wait, self.ws.receive_text()).await {
            Ok(text) => Some(serde_json::from_str(&text).expect("server frames are valid JSON")),
            Err(_) => None,
        }
    }

    /// Assert that no frame arrives within a short grace period
    pub async fn expect_silence(&mut self) {
        if let Some(event) = self.try_receive_event(Duration::from_millis(150)).await {
            panic!("expected no frames, received: {event}");
        }
    }

    /// Close the WebSocket connection
    pub async fn close(self) {
        self.ws.close().await;
    }
}
