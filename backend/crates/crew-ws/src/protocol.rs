//! Wire protocol for both socket namespaces.
//!
//! Frames are JSON text with an `{"event": ..., "data": ...}` envelope.
//! Field casing is part of the browser contract: the chat routing fields are
//! camelCase (`targetUserId`, `senderId`), everything else snake_case, and
//! the notification push event is named `new-notification`.

use crate::error::Result;

use crew_core::UserId;

use axum::extract::ws::Message;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Client-to-server events on the notification namespace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum NotificationClientEvent {
    #[serde(rename = "register")]
    Register { user_id: UserId },
}

/// Client-to-server events on the chat namespace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ChatClientEvent {
    #[serde(rename = "register")]
    Register { user_id: UserId },
    #[serde(rename = "send_message")]
    SendMessage(SendMessage),
}

/// Payload of a `send_message` event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendMessage {
    #[serde(rename = "targetUserId")]
    pub target_user_id: UserId,
    pub message: String,
    /// Client-supplied send time; the server assigns one when absent so
    /// every delivered event carries a timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

/// Payload of a `receive_message` event. All three fields are mandatory:
/// the display layer deduplicates on (timestamp, sender, text).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiveMessage {
    pub message: String,
    #[serde(rename = "senderId")]
    pub sender_id: UserId,
    pub timestamp: DateTime<Utc>,
}

/// Transient copy of a just-persisted notification. The target identity is
/// not in the payload; it is implied by the connection the event is pushed to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationEvent {
    pub title: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
    /// Always 0 at emission time.
    pub is_read: i64,
}

impl NotificationEvent {
    pub fn unread(title: String, message: String, created_at: DateTime<Utc>) -> Self {
        Self {
            title,
            message,
            created_at,
            is_read: 0,
        }
    }
}

/// Payload of an `error` event sent back to the offending client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEvent {
    pub message: String,
}

/// Server-to-client events across both namespaces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ServerEvent {
    #[serde(rename = "new-notification")]
    NewNotification(NotificationEvent),
    #[serde(rename = "receive_message")]
    ReceiveMessage(ReceiveMessage),
    #[serde(rename = "error")]
    Error(ErrorEvent),
}

impl ServerEvent {
    /// Serialize into a WebSocket text frame.
    pub fn to_ws_message(&self) -> Result<Message> {
        let json = serde_json::to_string(self)?;
        Ok(Message::Text(json.into()))
    }

    /// Event name for logging and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NewNotification(_) => "new-notification",
            Self::ReceiveMessage(_) => "receive_message",
            Self::Error(_) => "error",
        }
    }
}
