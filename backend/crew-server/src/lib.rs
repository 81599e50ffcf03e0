pub mod api;
pub mod error;
pub mod health;
pub mod logger;
pub mod notifier;
pub mod routes;
pub mod state;
pub mod store;

#[cfg(test)]
mod tests;

pub use api::{
    error::ApiError,
    error::Result as ApiResult,
    notifications::{
        create_notification_request::CreateNotificationRequest,
        list_notifications_query::ListNotificationsQuery,
        notification_dto::NotificationDto,
        notification_list_response::NotificationListResponse,
        notification_response::NotificationResponse,
        notifications::{create_notification, list_notifications},
    },
};
pub use error::{Result, ServerError};
pub use notifier::Notifier;
pub use state::ServerState;
pub use store::{NotificationStore, SqliteNotificationStore, StoreError};

pub use crate::routes::build_router;
