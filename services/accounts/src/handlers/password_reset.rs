use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

use crate::error::AccountsServiceError;
use crate::state::AppState;
use crate::usecase::password_reset::{
    RequestPasswordResetUseCase, ResetPasswordInput, ResetPasswordUseCase,
};

#[derive(Deserialize)]
pub struct RequestResetRequest {
    pub email: String,
}

/// POST /auth/reset-password/request
pub async fn request_password_reset(
    State(state): State<AppState>,
    Json(body): Json<RequestResetRequest>,
) -> Result<StatusCode, AccountsServiceError> {
    let usecase = RequestPasswordResetUseCase {
        users: state.user_repo(),
        notifier: state.notifier.clone(),
        reset_url: state.reset_password_url.clone(),
    };
    usecase.execute(&body.email).await?;
    Ok(StatusCode::ACCEPTED)
}

#[derive(Deserialize)]
pub struct SubmitResetRequest {
    pub code: String,
    pub signature: String,
    pub new_password: String,
}

/// POST /auth/reset-password/submit
pub async fn submit_password_reset(
    State(state): State<AppState>,
    Json(body): Json<SubmitResetRequest>,
) -> Result<StatusCode, AccountsServiceError> {
    let usecase = ResetPasswordUseCase {
        users: state.user_repo(),
        hasher: state.password_hasher(),
        attempts: state.attempts.clone(),
    };
    usecase
        .execute(ResetPasswordInput {
            code: body.code,
            signature: body.signature,
            new_password: body.new_password,
        })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
