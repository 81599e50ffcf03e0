use crate::protocol::{ChatClientEvent, ServerEvent};
use crate::{
    ChatRouter, ConnectionId, Metrics, Result as WsErrorResult, ShutdownGuard, WsError,
};

use crew_core::UserId;

use std::panic::Location;

use axum::extract::ws::{Message, WebSocket};
use error_location::ErrorLocation;
use futures::{SinkExt, StreamExt};
use log::{debug, info, warn};
use tokio::sync::mpsc;

const NAMESPACE: &str = "chat";

/// Per-connection state on the chat namespace.
///
/// A connection starts unregistered and transitions once the client sends
/// its `register` event. The claimed identity is trusted as-is - it is NOT
/// re-verified against the HTTP session, which is a known security gap kept
/// from the source system rather than silently fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unregistered,
    Registered(UserId),
}

/// Event-handling state machine for one chat connection, independent of the
/// transport so it can be exercised directly in tests.
pub struct ChatSession {
    connection_id: ConnectionId,
    state: SessionState,
    router: ChatRouter,
    metrics: Metrics,
}

impl ChatSession {
    pub fn new(connection_id: ConnectionId, router: ChatRouter, metrics: Metrics) -> Self {
        Self {
            connection_id,
            state: SessionState::Unregistered,
            router,
            metrics,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn user_id(&self) -> Option<UserId> {
        match self.state {
            SessionState::Registered(user_id) => Some(user_id),
            SessionState::Unregistered => None,
        }
    }

    /// Apply one client event; returns the events to echo back to this
    /// connection (delivery to other connections happens via the router).
    pub async fn handle_event(&mut self, event: ChatClientEvent) -> Vec<ServerEvent> {
        match event {
            ChatClientEvent::Register { user_id } => {
                self.metrics.event_received(NAMESPACE, "register");
                match self.router.register(self.connection_id, user_id).await {
                    Ok(()) => {
                        self.state = SessionState::Registered(user_id);
                        debug!(
                            "Chat connection {} registered as user {user_id}",
                            self.connection_id
                        );
                        Vec::new()
                    }
                    Err(e) => {
                        warn!(
                            "Chat register failed on connection {}: {e}",
                            self.connection_id
                        );
                        self.metrics.error_occurred("chat_register");
                        vec![ServerEvent::Error(e.to_error_event())]
                    }
                }
            }
            ChatClientEvent::SendMessage(msg) => {
                self.metrics.event_received(NAMESPACE, "send_message");
                let SessionState::Registered(sender_id) = self.state else {
                    let err = WsError::NotRegistered {
                        message: "send_message requires a prior register event".to_string(),
                        location: ErrorLocation::from(Location::caller()),
                    };
                    return vec![ServerEvent::Error(err.to_error_event())];
                };

                match self.router.send(sender_id, msg).await {
                    // Offline recipient is silent by design; the sender only
                    // ever sees its own locally-echoed copy
                    Ok(_outcome) => Vec::new(),
                    Err(e) => {
                        warn!(
                            "Chat delivery failed from connection {}: {e}",
                            self.connection_id
                        );
                        self.metrics.error_occurred("chat_delivery");
                        vec![ServerEvent::Error(e.to_error_event())]
                    }
                }
            }
        }
    }
}

/// Manages a single chat WebSocket connection lifecycle.
pub struct ChatSocket {
    connection_id: ConnectionId,
    router: ChatRouter,
    metrics: Metrics,
}

impl ChatSocket {
    pub fn new(connection_id: ConnectionId, router: ChatRouter, metrics: Metrics) -> Self {
        Self {
            connection_id,
            router,
            metrics,
        }
    }

    /// Drive the connection until the client disconnects or shutdown fires.
    ///
    /// `outbound_tx`/`outbound_rx` are the two ends of the bounded frame
    /// queue whose sender was handed to the registry at connect time.
    pub async fn handle(
        self,
        socket: WebSocket,
        outbound_tx: mpsc::Sender<Message>,
        outbound_rx: mpsc::Receiver<Message>,
        mut shutdown_guard: ShutdownGuard,
    ) -> WsErrorResult<()> {
        let connection_id = self.connection_id;
        info!("Chat connection {connection_id} established");
        self.metrics.connection_established(NAMESPACE);

        let (mut ws_sender, mut ws_receiver) = socket.split();

        // Send task: drains the outbound queue onto the wire
        let mut rx = outbound_rx;
        let send_task = tokio::spawn(async move {
            while let Some(msg) = rx.recv().await {
                if ws_sender.send(msg).await.is_err() {
                    break;
                }
            }
        });

        let mut session = ChatSession::new(connection_id, self.router.clone(), self.metrics.clone());

        let result = loop {
            tokio::select! {
                msg = ws_receiver.next() => {
                    match msg {
                        Some(Ok(msg)) => {
                            if let Err(e) = handle_frame(&mut session, msg, &outbound_tx).await {
                                log::error!(
                                    "Error handling frame on chat connection {connection_id}: {e}"
                                );
                                self.metrics.error_occurred("chat_frame");
                                break Err(e);
                            }
                        }
                        Some(Err(e)) => {
                            log::error!("WebSocket error on chat connection {connection_id}: {e}");
                            break Err(WsError::ConnectionClosed {
                                reason: format!("WebSocket error: {}", e),
                                location: ErrorLocation::from(Location::caller()),
                            });
                        }
                        None => {
                            info!("Chat connection {connection_id} closed by client");
                            break Ok(());
                        }
                    }
                }

                _ = shutdown_guard.wait() => {
                    info!("Shutting down chat connection {connection_id} gracefully");
                    break Ok(());
                }
            }
        };

        // Cleanup: stale-safe, a newer registration for the same identity
        // survives this disconnect
        self.router.disconnect(connection_id).await;
        drop(outbound_tx);
        let _ = send_task.await;

        self.metrics
            .connection_closed(NAMESPACE, if result.is_ok() { "normal" } else { "error" });

        result
    }
}

/// Handle one inbound frame for a chat session.
async fn handle_frame(
    session: &mut ChatSession,
    msg: Message,
    tx: &mpsc::Sender<Message>,
) -> WsErrorResult<()> {
    match msg {
        Message::Text(text) => {
            let responses = match serde_json::from_str::<ChatClientEvent>(&text) {
                Ok(event) => session.handle_event(event).await,
                Err(e) => {
                    // Malformed payload: tell the sender, keep the session
                    debug!("Malformed chat event: {e}");
                    let err = WsError::InvalidEvent {
                        message: format!("Malformed event: {}", e),
                        location: ErrorLocation::from(Location::caller()),
                    };
                    vec![ServerEvent::Error(err.to_error_event())]
                }
            };

            for event in responses {
                send_event(tx, event).await?;
            }
            Ok(())
        }
        Message::Binary(_) => {
            let err = WsError::InvalidEvent {
                message: "Binary frames are not supported on the chat namespace".to_string(),
                location: ErrorLocation::from(Location::caller()),
            };
            send_event(tx, ServerEvent::Error(err.to_error_event())).await
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

async fn send_event(tx: &mpsc::Sender<Message>, event: ServerEvent) -> WsErrorResult<()> {
    let frame = event.to_ws_message()?;
    tx.send(frame)
        .await
        .map_err(|_| WsError::ConnectionClosed {
            reason: "outbound queue closed".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })
}
