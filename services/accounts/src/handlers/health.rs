use axum::extract::State;
use axum::http::StatusCode;

use crate::state::AppState;

/// GET /readyz — ready once the database answers a ping.
pub async fn readyz(State(state): State<AppState>) -> StatusCode {
    match state.db.ping().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "readiness probe: database ping failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
