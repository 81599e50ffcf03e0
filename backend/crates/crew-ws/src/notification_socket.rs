use crate::protocol::NotificationClientEvent;
use crate::{
    ConnectionId, Metrics, PresenceRegistry, Result as WsErrorResult, ShutdownGuard, WsError,
};

use crew_core::UserId;

use std::panic::Location;

use axum::extract::ws::{Message, WebSocket};
use error_location::ErrorLocation;
use futures::{SinkExt, StreamExt};
use log::{debug, info, warn};
use tokio::sync::mpsc;

const NAMESPACE: &str = "notifications";

/// Event-handling state for one notification connection. Joins the caller's
/// connection to the group named after the claimed identity; the claim is
/// trusted as-is (same security gap as the chat namespace, kept on purpose).
pub struct NotificationSession {
    connection_id: ConnectionId,
    user_id: Option<UserId>,
    registry: PresenceRegistry,
    metrics: Metrics,
}

impl NotificationSession {
    pub fn new(connection_id: ConnectionId, registry: PresenceRegistry, metrics: Metrics) -> Self {
        Self {
            connection_id,
            user_id: None,
            registry,
            metrics,
        }
    }

    pub fn user_id(&self) -> Option<UserId> {
        self.user_id
    }

    /// Apply one client event. The notification namespace is push-only from
    /// the server side, so nothing is ever echoed back.
    pub async fn handle_event(&mut self, event: NotificationClientEvent) {
        match event {
            NotificationClientEvent::Register { user_id } => {
                self.metrics.event_received(NAMESPACE, "register");
                match self.registry.register(self.connection_id, user_id).await {
                    Ok(()) => {
                        self.user_id = Some(user_id);
                        debug!(
                            "Connection {} joined group {}",
                            self.connection_id,
                            user_id.group_name()
                        );
                    }
                    Err(e) => {
                        warn!(
                            "Notification register failed on connection {}: {e}",
                            self.connection_id
                        );
                        self.metrics.error_occurred("notification_register");
                    }
                }
            }
        }
    }
}

/// Manages a single notification WebSocket connection lifecycle.
pub struct NotificationSocket {
    connection_id: ConnectionId,
    registry: PresenceRegistry,
    metrics: Metrics,
}

impl NotificationSocket {
    pub fn new(connection_id: ConnectionId, registry: PresenceRegistry, metrics: Metrics) -> Self {
        Self {
            connection_id,
            registry,
            metrics,
        }
    }

    pub async fn handle(
        self,
        socket: WebSocket,
        outbound_tx: mpsc::Sender<Message>,
        outbound_rx: mpsc::Receiver<Message>,
        mut shutdown_guard: ShutdownGuard,
    ) -> WsErrorResult<()> {
        let connection_id = self.connection_id;
        info!("Notification connection {connection_id} established");
        self.metrics.connection_established(NAMESPACE);

        let (mut ws_sender, mut ws_receiver) = socket.split();

        let mut rx = outbound_rx;
        let send_task = tokio::spawn(async move {
            while let Some(msg) = rx.recv().await {
                if ws_sender.send(msg).await.is_err() {
                    break;
                }
            }
        });

        let mut session =
            NotificationSession::new(connection_id, self.registry.clone(), self.metrics.clone());

        let result = loop {
            tokio::select! {
                msg = ws_receiver.next() => {
                    match msg {
                        Some(Ok(msg)) => {
                            if let Err(e) = handle_frame(&mut session, msg, &outbound_tx).await {
                                log::error!(
                                    "Error handling frame on notification connection {connection_id}: {e}"
                                );
                                self.metrics.error_occurred("notification_frame");
                                break Err(e);
                            }
                        }
                        Some(Err(e)) => {
                            log::error!(
                                "WebSocket error on notification connection {connection_id}: {e}"
                            );
                            break Err(WsError::ConnectionClosed {
                                reason: format!("WebSocket error: {}", e),
                                location: ErrorLocation::from(Location::caller()),
                            });
                        }
                        None => {
                            info!("Notification connection {connection_id} closed by client");
                            break Ok(());
                        }
                    }
                }

                _ = shutdown_guard.wait() => {
                    info!("Shutting down notification connection {connection_id} gracefully");
                    break Ok(());
                }
            }
        };

        self.registry.disconnect(connection_id).await;
        drop(outbound_tx);
        let _ = send_task.await;

        self.metrics
            .connection_closed(NAMESPACE, if result.is_ok() { "normal" } else { "error" });

        result
    }
}

/// Handle one inbound frame for a notification session. Malformed events are
/// logged and dropped; this namespace has no error event in its contract.
async fn handle_frame(
    session: &mut NotificationSession,
    msg: Message,
    tx: &mpsc::Sender<Message>,
) -> WsErrorResult<()> {
    match msg {
        Message::Text(text) => {
            match serde_json::from_str::<NotificationClientEvent>(&text) {
                Ok(event) => session.handle_event(event).await,
                Err(e) => debug!("Ignoring malformed notification event: {e}"),
            }
            Ok(())
        }
        Message::Binary(data) => {
            debug!(
                "Ignoring binary frame ({} bytes) on notification namespace",
                data.len()
            );
            Ok(())
        }
        Message::Ping(data) => {
            tx.send(Message::Pong(data))
                .await
                .map_err(|_| WsError::ConnectionClosed {
                    reason: "outbound queue closed".to_string(),
                    location: ErrorLocation::from(Location::caller()),
                })
        }
        Message::Pong(_) => Ok(()),
        Message::Close(_) => Ok(()),
    }
}
