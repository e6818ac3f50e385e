use axum::Router;
use axum::routing::{get, post};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use readnest_core::health::healthz;
use readnest_core::middleware::request_id_layer;

use crate::handlers::health::readyz;
use crate::handlers::password_reset::{request_password_reset, submit_password_reset};
use crate::handlers::registration::{activate_account, register};
use crate::handlers::session::{authenticate, check_session};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Registration + activation
        .route("/auth/register", post(register))
        .route("/auth/activate-account", get(activate_account))
        // Login + session
        .route("/auth/authenticate", post(authenticate))
        .route("/auth/session", get(check_session))
        // Password reset
        .route("/auth/reset-password/request", post(request_password_reset))
        .route("/auth/reset-password/submit", post(submit_password_reset))
        .layer(
            ServiceBuilder::new()
                .layer(request_id_layer())
                .layer(TraceLayer::new_for_http()),
        )
        .with_state(state)
}
