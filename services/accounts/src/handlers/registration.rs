use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::error::AccountsServiceError;
use crate::state::AppState;
use crate::usecase::activate::ActivateAccountUseCase;
use crate::usecase::register::{RegisterInput, RegisterUseCase};

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

/// POST /auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<StatusCode, AccountsServiceError> {
    let usecase = RegisterUseCase {
        users: state.user_repo(),
        codes: state.activation_code_repo(),
        hasher: state.password_hasher(),
        notifier: state.notifier.clone(),
    };
    usecase
        .execute(RegisterInput {
            first_name: body.first_name,
            last_name: body.last_name,
            email: body.email,
            password: body.password,
        })
        .await?;
    // The account exists but stays disabled until the emailed code comes back
    Ok(StatusCode::ACCEPTED)
}

#[derive(Deserialize)]
pub struct ActivateQuery {
    pub code: String,
}

#[derive(Serialize)]
pub struct ActivateResponse {
    pub activated: bool,
}

/// GET /auth/activate-account?code=...
pub async fn activate_account(
    State(state): State<AppState>,
    Query(query): Query<ActivateQuery>,
) -> Result<Json<ActivateResponse>, AccountsServiceError> {
    let usecase = ActivateAccountUseCase {
        users: state.user_repo(),
        codes: state.activation_code_repo(),
        notifier: state.notifier.clone(),
        events: state.events.clone(),
    };
    let activated = usecase.execute(&query.code).await?;
    Ok(Json(ActivateResponse { activated }))
}
