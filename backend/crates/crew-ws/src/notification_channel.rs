use crate::protocol::{NotificationEvent, ServerEvent};
use crate::{Metrics, PresenceRegistry};

use crew_core::UserId;

use log::{debug, warn};

const NAMESPACE: &str = "notifications";

/// Pushes a transient copy of a just-persisted notification to every live
/// connection of the target user.
///
/// Delivery is best-effort and non-blocking: callers invoke `publish` only
/// after the durable write has succeeded, and nothing that happens here can
/// fail the triggering HTTP action.
#[derive(Clone)]
pub struct NotificationChannel {
    registry: PresenceRegistry,
    metrics: Metrics,
}

impl NotificationChannel {
    pub fn new(registry: PresenceRegistry, metrics: Metrics) -> Self {
        Self { registry, metrics }
    }

    /// Emit the event to every member of the target user's group.
    /// Returns the number of connections the event was handed to.
    pub async fn publish(&self, user_id: UserId, event: NotificationEvent) -> usize {
        let handles = self.registry.resolve(user_id).await;

        if handles.is_empty() {
            debug!(
                "No live connections in group {}, notification stays durable-only",
                user_id.group_name()
            );
            return 0;
        }

        let frame = match ServerEvent::NewNotification(event).to_ws_message() {
            Ok(frame) => frame,
            Err(e) => {
                warn!("Failed to encode notification event: {e}");
                self.metrics.error_occurred("notification_encode");
                return 0;
            }
        };

        let mut delivered = 0;
        for handle in &handles {
            match handle.sender.try_send(frame.clone()) {
                Ok(()) => {
                    delivered += 1;
                    self.metrics.event_delivered(NAMESPACE, "new-notification");
                }
                Err(e) => {
                    // Slow or closing client; the durable row is unaffected
                    warn!(
                        "Dropping notification for connection {}: {e}",
                        handle.connection_id
                    );
                    self.metrics.event_dropped(NAMESPACE, "send_queue");
                }
            }
        }

        debug!(
            "Published notification to group {} ({delivered}/{} connections)",
            user_id.group_name(),
            handles.len()
        );

        delivered
    }
}
