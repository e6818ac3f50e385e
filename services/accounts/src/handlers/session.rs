use axum::Json;
use axum::extract::{Query, State};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use readnest_core::serde::to_rfc3339_ms;
use readnest_session::token::validate_session_token;

use crate::error::AccountsServiceError;
use crate::state::AppState;
use crate::usecase::login::{LoginInput, LoginUseCase};

#[derive(Deserialize)]
pub struct AuthenticateRequest {
    pub email: String,
    pub password: String,
    pub login_page: String,
}

#[derive(Serialize)]
pub struct AuthenticateResponse {
    pub session_token: String,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub logged_in_at: DateTime<Utc>,
    pub login_page: String,
    pub attempt_count: u32,
}

/// POST /auth/authenticate
pub async fn authenticate(
    State(state): State<AppState>,
    Json(body): Json<AuthenticateRequest>,
) -> Result<Json<AuthenticateResponse>, AccountsServiceError> {
    let usecase = LoginUseCase {
        users: state.user_repo(),
        hasher: state.password_hasher(),
        minter: state.session_minter(),
        attempts: state.attempts.clone(),
        events: state.events.clone(),
    };
    let result = usecase
        .execute(LoginInput {
            email: body.email,
            password: body.password,
            login_page: body.login_page,
        })
        .await?;
    Ok(Json(AuthenticateResponse {
        session_token: result.session_token,
        logged_in_at: result.logged_in_at,
        login_page: result.login_page,
        attempt_count: result.attempt_count,
    }))
}

#[derive(Deserialize)]
pub struct CheckSessionQuery {
    pub token: String,
}

#[derive(Serialize)]
pub struct CheckSessionResponse {
    pub user_id: Uuid,
    pub display_name: String,
    pub roles: Vec<String>,
    /// Unix seconds at which the session expires.
    pub session_exp: u64,
}

/// GET /auth/session?token=...
pub async fn check_session(
    State(state): State<AppState>,
    Query(query): Query<CheckSessionQuery>,
) -> Result<Json<CheckSessionResponse>, AccountsServiceError> {
    let info = validate_session_token(&query.token, &state.jwt_secret)
        .map_err(|_| AccountsServiceError::InvalidSession)?;
    Ok(Json(CheckSessionResponse {
        user_id: info.user_id,
        display_name: info.display_name,
        roles: info.roles,
        session_exp: info.session_exp,
    }))
}
