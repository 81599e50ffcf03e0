use crate::notifier::Notifier;
use crate::store::NotificationStore;

use std::sync::Arc;

use axum::extract::FromRef;
use metrics_exporter_prometheus::PrometheusHandle;
use sqlx::SqlitePool;

/// Everything the HTTP layer needs, one clone per handler invocation.
#[derive(Clone)]
pub struct ServerState {
    pub ws: crew_ws::AppState,
    pub pool: SqlitePool,
    pub store: Arc<dyn NotificationStore>,
    pub notifier: Notifier,
    /// None when no Prometheus recorder is installed (tests)
    pub prometheus: Option<PrometheusHandle>,
}

/// Lets the WebSocket upgrade handlers extract their own state from ours.
impl FromRef<ServerState> for crew_ws::AppState {
    fn from_ref(state: &ServerState) -> Self {
        state.ws.clone()
    }
}
