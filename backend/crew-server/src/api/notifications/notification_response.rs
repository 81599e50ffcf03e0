use crate::api::notifications::notification_dto::NotificationDto;

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct NotificationResponse {
    pub notification: NotificationDto,
    /// How many live connections received a copy (0 when the user is offline)
    pub delivered: usize,
}
