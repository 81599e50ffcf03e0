use crate::{
    ChatRouter, ChatSocket, ConnectionConfig, ConnectionLimits, FanoutPolicy, Metrics,
    NotificationChannel, NotificationSocket, PresenceRegistry, ShutdownCoordinator,
};

use std::collections::HashMap;

use axum::{
    extract::{
        Query, State,
        ws::{Message, WebSocketUpgrade},
    },
    http::StatusCode,
    response::Response,
};
use log::{debug, error};
use tokio::sync::mpsc;

/// Shared application state for both socket namespaces.
///
/// Constructed once per process and handed to the HTTP layer and the socket
/// layer by reference, so there is a single ownership point for the presence
/// maps instead of module-level globals.
#[derive(Clone)]
pub struct AppState {
    /// Group-based presence, one group per user identity (notifications)
    pub notification_registry: PresenceRegistry,
    /// Single-slot presence, most recent registration wins (chat)
    pub chat_registry: PresenceRegistry,
    pub notifications: NotificationChannel,
    pub chat: ChatRouter,
    pub metrics: Metrics,
    pub shutdown: ShutdownCoordinator,
    pub config: ConnectionConfig,
}

impl AppState {
    pub fn new(config: ConnectionConfig, limits: ConnectionLimits) -> Self {
        let metrics = Metrics::new();
        let notification_registry =
            PresenceRegistry::new(FanoutPolicy::AllSessions, limits.clone());
        let chat_registry = PresenceRegistry::new(FanoutPolicy::LatestSession, limits);
        let notifications =
            NotificationChannel::new(notification_registry.clone(), metrics.clone());
        let chat = ChatRouter::new(chat_registry.clone(), metrics.clone());

        Self {
            notification_registry,
            chat_registry,
            notifications,
            chat,
            metrics,
            shutdown: ShutdownCoordinator::new(),
            config,
        }
    }
}

/// WebSocket upgrade handler for the notification namespace.
pub async fn notification_handler(
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
) -> Result<Response, StatusCode> {
    let (tx, rx) = mpsc::channel::<Message>(state.config.send_buffer_size);

    let connection_id = state
        .notification_registry
        .connect(tx.clone())
        .await
        .map_err(|e| {
            error!("Failed to admit notification connection: {e}");
            StatusCode::SERVICE_UNAVAILABLE
        })?;

    let shutdown_guard = state.shutdown.subscribe_guard();
    let socket_task = NotificationSocket::new(
        connection_id,
        state.notification_registry.clone(),
        state.metrics.clone(),
    );

    Ok(ws.on_upgrade(move |socket| async move {
        if let Err(e) = socket_task.handle(socket, tx, rx, shutdown_guard).await {
            error!("Notification connection {connection_id} ended with error: {e}");
        }
    }))
}

/// WebSocket upgrade handler for the chat namespace.
///
/// The handshake may carry `user_id` as a query parameter; it is read once
/// for logging only and never used for routing (routing identity comes from
/// the `register` event).
pub async fn chat_handler(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
    ws: WebSocketUpgrade,
) -> Result<Response, StatusCode> {
    if let Some(claimed) = params.get("user_id") {
        debug!("Chat handshake from claimed user {claimed}");
    }

    let (tx, rx) = mpsc::channel::<Message>(state.config.send_buffer_size);

    let connection_id = state.chat_registry.connect(tx.clone()).await.map_err(|e| {
        error!("Failed to admit chat connection: {e}");
        StatusCode::SERVICE_UNAVAILABLE
    })?;

    let shutdown_guard = state.shutdown.subscribe_guard();
    let socket_task = ChatSocket::new(connection_id, state.chat.clone(), state.metrics.clone());

    Ok(ws.on_upgrade(move |socket| async move {
        if let Err(e) = socket_task.handle(socket, tx, rx, shutdown_guard).await {
            error!("Chat connection {connection_id} ended with error: {e}");
        }
    }))
}
