use crate::ApiError;

use std::panic::Location;

use axum::body::to_bytes;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use error_location::ErrorLocation;

#[tokio::test]
async fn test_not_found_returns_404_with_json_body() {
    let error = ApiError::NotFound {
        message: "Notification not found".into(),
        location: ErrorLocation::from(Location::caller()),
    };
    let response = error.into_response();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json["error"]["code"], "NOT_FOUND");
    assert_eq!(json["error"]["message"], "Notification not found");
}

#[tokio::test]
async fn test_validation_error_returns_400_with_field() {
    let error = ApiError::Validation {
        message: "title must not be empty".into(),
        field: Some("title".into()),
        location: ErrorLocation::from(Location::caller()),
    };
    let response = error.into_response();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"]["field"], "title");
}

#[tokio::test]
async fn test_internal_error_returns_500() {
    let error = ApiError::Internal {
        message: "Database connection failed".into(),
        location: ErrorLocation::from(Location::caller()),
    };
    let response = error.into_response();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json["error"]["code"], "INTERNAL_ERROR");
}

#[test]
fn test_store_error_converts_to_internal_without_details() {
    let store_error = crate::StoreError::from(sqlx::Error::PoolClosed);

    let api_error = ApiError::from(store_error);

    let ApiError::Internal { message, .. } = api_error else {
        panic!("expected Internal");
    };
    // Internal database details never reach the client
    assert_eq!(message, "Database operation failed");
}

#[test]
fn test_core_error_converts_to_validation() {
    let core_error = "not-a-number".parse::<crew_core::UserId>().unwrap_err();

    let api_error = ApiError::from(core_error);

    assert!(matches!(api_error, ApiError::Validation { .. }));
}
