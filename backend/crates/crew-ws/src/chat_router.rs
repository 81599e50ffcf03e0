use crate::protocol::{ReceiveMessage, SendMessage, ServerEvent};
use crate::{ConnectionId, Metrics, PresenceRegistry, Result as WsErrorResult, WsError};

use crew_core::UserId;

use std::panic::Location;

use chrono::Utc;
use error_location::ErrorLocation;
use log::debug;

const NAMESPACE: &str = "chat";

/// Outcome of a chat delivery attempt. Neither variant is an error: an
/// offline recipient is dropped silently by design.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Delivered,
    RecipientOffline,
}

/// Point-to-point message delivery between two registered identities.
/// Nothing is persisted; messages are ephemeral, at-most-once, best-effort.
#[derive(Clone)]
pub struct ChatRouter {
    registry: PresenceRegistry,
    metrics: Metrics,
}

impl ChatRouter {
    pub fn new(registry: PresenceRegistry, metrics: Metrics) -> Self {
        Self { registry, metrics }
    }

    /// Single-slot registration: the latest register for an identity wins.
    pub async fn register(
        &self,
        connection_id: ConnectionId,
        user_id: UserId,
    ) -> WsErrorResult<()> {
        self.registry.register(connection_id, user_id).await
    }

    pub async fn disconnect(&self, connection_id: ConnectionId) {
        self.registry.disconnect(connection_id).await;
    }

    /// Route one message to the target's most recent live connection.
    ///
    /// An offline target completes without error and emits nothing anywhere.
    /// `Err` is reserved for delivery-path exceptions (encode failure, full
    /// send queue) that the caller reports back to the sender.
    pub async fn send(
        &self,
        sender_id: UserId,
        msg: SendMessage,
    ) -> WsErrorResult<DeliveryOutcome> {
        let target = msg.target_user_id;

        let Some(handle) = self.registry.resolve(target).await.into_iter().next() else {
            debug!("User {target} has no live chat connection, dropping message from {sender_id}");
            self.metrics.event_dropped(NAMESPACE, "recipient_offline");
            return Ok(DeliveryOutcome::RecipientOffline);
        };

        // Server-assigned timestamp when the client omitted one, so every
        // delivered event carries the display-layer dedup key in full
        let timestamp = msg.timestamp.unwrap_or_else(Utc::now);

        let event = ServerEvent::ReceiveMessage(ReceiveMessage {
            message: msg.message,
            sender_id,
            timestamp,
        });

        let frame = event.to_ws_message()?;

        handle.sender.try_send(frame).map_err(|_| {
            self.metrics.event_dropped(NAMESPACE, "send_queue");
            WsError::SendBufferFull {
                location: ErrorLocation::from(Location::caller()),
            }
        })?;

        debug!(
            "Routed chat message {sender_id} -> {target} (connection {})",
            handle.connection_id
        );
        self.metrics.event_delivered(NAMESPACE, "receive_message");

        Ok(DeliveryOutcome::Delivered)
    }
}
