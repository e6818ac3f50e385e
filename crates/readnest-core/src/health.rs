use axum::http::StatusCode;

/// Handler for `GET /healthz` — liveness check. Readiness is service-specific
/// (it depends on the service's backing stores), so each service provides its
/// own `/readyz` handler.
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}
