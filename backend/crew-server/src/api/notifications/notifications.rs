//! Notification REST API handlers

use crate::{
    ApiError, ApiResult, CreateNotificationRequest, ListNotificationsQuery,
    NotificationDto, NotificationListResponse, NotificationResponse,
};
use crate::state::ServerState;

use crew_core::UserId;

use std::panic::Location;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use error_location::ErrorLocation;

/// POST /api/users/{user_id}/notifications
///
/// Producer endpoint for the CRUD side of the application: persists the
/// notification, then pushes it to the user's live sessions. A user with no
/// live session still gets the durable row.
pub async fn create_notification(
    State(state): State<ServerState>,
    Path(user_id): Path<i64>,
    Json(req): Json<CreateNotificationRequest>,
) -> ApiResult<(StatusCode, Json<NotificationResponse>)> {
    if req.title.trim().is_empty() {
        return Err(ApiError::Validation {
            message: "title must not be empty".to_string(),
            field: Some("title".into()),
            location: ErrorLocation::from(Location::caller()),
        });
    }
    if req.message.trim().is_empty() {
        return Err(ApiError::Validation {
            message: "message must not be empty".to_string(),
            field: Some("message".into()),
            location: ErrorLocation::from(Location::caller()),
        });
    }

    let user_id = UserId::new(user_id);
    let (row, delivered) = state
        .notifier
        .notify(user_id, &req.title, &req.message)
        .await?;

    log::info!(
        "Created notification {} for user {user_id} via REST API ({delivered} live deliveries)",
        row.id
    );

    Ok((
        StatusCode::CREATED,
        Json(NotificationResponse {
            notification: row.into(),
            delivered,
        }),
    ))
}

/// GET /api/users/{user_id}/notifications
pub async fn list_notifications(
    State(state): State<ServerState>,
    Path(user_id): Path<i64>,
    Query(query): Query<ListNotificationsQuery>,
) -> ApiResult<Json<NotificationListResponse>> {
    let rows = state
        .store
        .recent_for_user(UserId::new(user_id), query.effective_limit())
        .await?;

    Ok(Json(NotificationListResponse {
        notifications: rows.into_iter().map(NotificationDto::from).collect(),
    }))
}
