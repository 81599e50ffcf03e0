use crate::{
    ConnectionHandle, ConnectionId, ConnectionInfo, ConnectionLimits, FanoutPolicy,
    Result as WsErrorResult, WsError,
};

use crew_core::UserId;

use std::collections::HashMap;
use std::panic::Location;
use std::sync::Arc;

use axum::extract::ws::Message;
use error_location::ErrorLocation;
use log::{debug, info, warn};
use tokio::sync::{RwLock, mpsc};

/// Registry tracking which user identities currently have live connections.
///
/// One instance per namespace, each with its own fan-out policy. Every
/// operation takes the inner lock exactly once, so each is atomic with
/// respect to concurrent connects and disconnects.
pub struct PresenceRegistry {
    inner: Arc<RwLock<RegistryInner>>,
    policy: FanoutPolicy,
    limits: ConnectionLimits,
}

struct RegistryInner {
    /// All active connections by connection_id, registered or not
    connections: HashMap<ConnectionId, ConnectionInfo>,
    /// Identity -> live connections, most recent registration last
    sessions: HashMap<UserId, Vec<ConnectionId>>,
}

impl PresenceRegistry {
    pub fn new(policy: FanoutPolicy, limits: ConnectionLimits) -> Self {
        Self {
            inner: Arc::new(RwLock::new(RegistryInner {
                connections: HashMap::new(),
                sessions: HashMap::new(),
            })),
            policy,
            limits,
        }
    }

    /// Admit a new transport connection (no identity yet), returns its id
    pub async fn connect(&self, sender: mpsc::Sender<Message>) -> WsErrorResult<ConnectionId> {
        let mut inner = self.inner.write().await;

        if inner.connections.len() >= self.limits.max_total {
            warn!(
                "Total connection limit reached: {}/{}",
                inner.connections.len(),
                self.limits.max_total
            );
            return Err(WsError::ConnectionLimitExceeded {
                current: inner.connections.len(),
                max: self.limits.max_total,
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let connection_id = ConnectionId::new();
        let info = ConnectionInfo {
            connection_id,
            user_id: None,
            connected_at: chrono::Utc::now(),
            sender,
        };

        inner.connections.insert(connection_id, info);
        info!(
            "Connection {connection_id} established ({} total)",
            inner.connections.len()
        );

        Ok(connection_id)
    }

    /// Bind a user identity to a connection.
    ///
    /// AllSessions: idempotent group join, many connections per identity.
    /// LatestSession: overwrite - the new connection becomes the only
    /// resolvable one, previous registrations stay connected but unroutable.
    pub async fn register(
        &self,
        connection_id: ConnectionId,
        user_id: UserId,
    ) -> WsErrorResult<()> {
        let mut inner = self.inner.write().await;

        let Some(info) = inner.connections.get_mut(&connection_id) else {
            return Err(WsError::UnknownConnection {
                connection_id,
                location: ErrorLocation::from(Location::caller()),
            });
        };

        let previous = info.user_id.replace(user_id);

        // Re-registering under a different identity drops the old binding
        if let Some(old) = previous
            && old != user_id
        {
            Self::remove_session(&mut inner.sessions, old, connection_id);
        }

        let entry = inner.sessions.entry(user_id).or_default();
        match self.policy {
            FanoutPolicy::AllSessions => {
                if !entry.contains(&connection_id) {
                    entry.push(connection_id);
                }
            }
            FanoutPolicy::LatestSession => {
                // Last register wins; older connections lose their slot
                entry.clear();
                entry.push(connection_id);
            }
        }

        debug!(
            "Connection {connection_id} registered as user {user_id} ({} sessions for user)",
            inner.sessions.get(&user_id).map(Vec::len).unwrap_or(0)
        );

        Ok(())
    }

    /// Remove a connection on disconnect.
    ///
    /// Stale-safe: the identity binding is removed only where it still points
    /// at this exact connection, so an old connection's delayed disconnect
    /// never evicts a newer registration.
    pub async fn disconnect(&self, connection_id: ConnectionId) {
        let mut inner = self.inner.write().await;

        let Some(info) = inner.connections.remove(&connection_id) else {
            return;
        };

        if let Some(user_id) = info.user_id {
            Self::remove_session(&mut inner.sessions, user_id, connection_id);
        }

        info!(
            "Connection {connection_id} removed ({} total remaining)",
            inner.connections.len()
        );
    }

    /// Resolve the live delivery targets for an identity.
    /// Never fails; unknown identities resolve to an empty vec.
    pub async fn resolve(&self, user_id: UserId) -> Vec<ConnectionHandle> {
        let inner = self.inner.read().await;

        let Some(connection_ids) = inner.sessions.get(&user_id) else {
            return Vec::new();
        };

        let to_handle = |id: &ConnectionId| {
            inner.connections.get(id).map(|info| ConnectionHandle {
                connection_id: info.connection_id,
                sender: info.sender.clone(),
            })
        };

        match self.policy {
            FanoutPolicy::AllSessions => connection_ids.iter().filter_map(to_handle).collect(),
            FanoutPolicy::LatestSession => {
                connection_ids.last().and_then(to_handle).into_iter().collect()
            }
        }
    }

    /// Get information about a specific connection
    pub async fn get(&self, connection_id: ConnectionId) -> Option<ConnectionInfo> {
        let inner = self.inner.read().await;
        inner.connections.get(&connection_id).cloned()
    }

    /// Get total connection count
    pub async fn connection_count(&self) -> usize {
        let inner = self.inner.read().await;
        inner.connections.len()
    }

    /// Get the number of identities with at least one live connection
    pub async fn session_count(&self) -> usize {
        let inner = self.inner.read().await;
        inner.sessions.len()
    }

    fn remove_session(
        sessions: &mut HashMap<UserId, Vec<ConnectionId>>,
        user_id: UserId,
        connection_id: ConnectionId,
    ) {
        if let Some(entry) = sessions.get_mut(&user_id) {
            entry.retain(|id| *id != connection_id);
            if entry.is_empty() {
                sessions.remove(&user_id);
            }
        }
    }
}

impl Clone for PresenceRegistry {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            policy: self.policy,
            limits: self.limits.clone(),
        }
    }
}
