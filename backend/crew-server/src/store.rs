//! Durable notification storage.
//!
//! Live fan-out is transient; the row written here is the source of truth a
//! client reads back after reconnecting.

use crew_core::{Notification, UserId};

use std::panic::Location;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use error_location::ErrorLocation;
use sqlx::{Row, SqlitePool, sqlite::SqliteRow};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {source} {location}")]
    Sqlx {
        #[source]
        source: sqlx::Error,
        location: ErrorLocation,
    },
}

impl From<sqlx::Error> for StoreError {
    fn from(source: sqlx::Error) -> Self {
        StoreError::Sqlx {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Persistence seam for notifications, behind a trait so handlers and the
/// notifier can be exercised against a fake in tests.
#[async_trait]
pub trait NotificationStore: Send + Sync {
    /// Insert an unread notification and return the stored row.
    async fn insert(&self, user_id: UserId, title: &str, message: &str) -> Result<Notification>;

    /// Most recent rows for a user, newest first.
    async fn recent_for_user(&self, user_id: UserId, limit: i64) -> Result<Vec<Notification>>;
}

pub struct SqliteNotificationStore {
    pool: SqlitePool,
}

impl SqliteNotificationStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn row_to_notification(row: SqliteRow) -> Notification {
    Notification {
        id: row.get("id"),
        user_id: UserId::new(row.get("user_id")),
        title: row.get("title"),
        message: row.get("message"),
        is_read: row.get("is_read"),
        created_at: DateTime::from_timestamp(row.get("created_at"), 0).unwrap_or_default(),
    }
}

#[async_trait]
impl NotificationStore for SqliteNotificationStore {
    async fn insert(&self, user_id: UserId, title: &str, message: &str) -> Result<Notification> {
        let created_at = Utc::now();
        let created_at_ts = created_at.timestamp();

        let result = sqlx::query(
            r#"
              INSERT INTO notifications (user_id, title, message, is_read, created_at)
              VALUES (?, ?, ?, 0, ?)
              "#,
        )
        .bind(user_id.as_i64())
        .bind(title)
        .bind(message)
        .bind(created_at_ts)
        .execute(&self.pool)
        .await?;

        Ok(Notification {
            id: result.last_insert_rowid(),
            user_id,
            title: title.to_string(),
            message: message.to_string(),
            is_read: 0,
            // Second precision, matching what a later read returns
            created_at: DateTime::from_timestamp(created_at_ts, 0).unwrap_or_default(),
        })
    }

    async fn recent_for_user(&self, user_id: UserId, limit: i64) -> Result<Vec<Notification>> {
        let rows = sqlx::query(
            r#"
              SELECT id, user_id, title, message, is_read, created_at
              FROM notifications
              WHERE user_id = ?
              ORDER BY created_at DESC, id DESC
              LIMIT ?
              "#,
        )
        .bind(user_id.as_i64())
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(row_to_notification).collect())
    }
}
