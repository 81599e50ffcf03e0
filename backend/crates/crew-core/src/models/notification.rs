use crate::models::user_id::UserId;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Durable notification row. The live channel only ever pushes a transient
/// copy of a row that has already been written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: i64,
    pub user_id: UserId,

    pub title: String,
    pub message: String,

    /// 0 = unread, 1 = read. Always 0 at emission time.
    pub is_read: i64,
    pub created_at: DateTime<Utc>,
}
