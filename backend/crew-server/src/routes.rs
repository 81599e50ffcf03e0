use crate::api::notifications::notifications::{create_notification, list_notifications};
use crate::health;
use crate::state::ServerState;

use axum::{
    Router,
    extract::State,
    routing::{get, post},
};
use tower_http::cors::{Any, CorsLayer};

/// Build the application router with all endpoints
pub fn build_router(state: ServerState) -> Router {
    Router::new()
        // WebSocket namespaces
        .route("/ws/notifications", get(crew_ws::notification_handler))
        .route("/ws/chat", get(crew_ws::chat_handler))
        // Health check endpoints
        .route("/health", get(health::health_check))
        .route("/live", get(health::liveness_check))
        .route("/ready", get(health::readiness_check))
        // Prometheus scrape endpoint
        .route("/metrics", get(metrics_handler))
        // Notification producer/consumer endpoints
        .route(
            "/api/users/{user_id}/notifications",
            post(create_notification).get(list_notifications),
        )
        // Add shared state
        .with_state(state)
        // CORS middleware (allow all origins for WebSocket/browser clients)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

/// GET /metrics - render the installed Prometheus recorder
async fn metrics_handler(State(state): State<ServerState>) -> String {
    match state.prometheus {
        Some(handle) => handle.render(),
        None => String::new(),
    }
}
