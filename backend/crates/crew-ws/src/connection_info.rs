use crate::ConnectionId;

use crew_core::UserId;

use axum::extract::ws::Message;
use chrono::{DateTime, Utc};
use tokio::sync::mpsc;

/// Information about an active connection. Owned exclusively by the
/// registry that tracks it.
#[derive(Debug, Clone)]
pub struct ConnectionInfo {
    pub connection_id: ConnectionId,
    /// None until the client sends its `register` event.
    pub user_id: Option<UserId>,
    pub connected_at: DateTime<Utc>,
    pub sender: mpsc::Sender<Message>,
}
