use crate::store::{NotificationStore, Result as StoreResult};

use crew_core::{Notification, UserId};
use crew_ws::{NotificationChannel, protocol::NotificationEvent};

use std::sync::Arc;

use log::debug;

/// Write-then-push glue between the durable store and the live channel.
///
/// The insert must succeed before anything is pushed; live delivery is
/// best-effort and cannot fail the calling operation.
#[derive(Clone)]
pub struct Notifier {
    store: Arc<dyn NotificationStore>,
    channel: NotificationChannel,
}

impl Notifier {
    pub fn new(store: Arc<dyn NotificationStore>, channel: NotificationChannel) -> Self {
        Self { store, channel }
    }

    /// Persist a notification, then push it to the user's live sessions.
    /// Returns the stored row and how many connections received a copy.
    pub async fn notify(
        &self,
        user_id: UserId,
        title: &str,
        message: &str,
    ) -> StoreResult<(Notification, usize)> {
        let row = self.store.insert(user_id, title, message).await?;

        let event =
            NotificationEvent::unread(row.title.clone(), row.message.clone(), row.created_at);
        let delivered = self.channel.publish(user_id, event).await;

        debug!(
            "Notification {} for user {user_id} stored, pushed to {delivered} connection(s)",
            row.id
        );

        Ok((row, delivered))
    }
}
