use crate::ConnectionId;

use axum::extract::ws::Message;
use tokio::sync::mpsc;

/// A resolved delivery target: the connection id plus the bounded sender
/// feeding its outbound frame queue.
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    pub connection_id: ConnectionId,
    pub sender: mpsc::Sender<Message>,
}
