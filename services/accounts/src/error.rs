use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Accounts service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum AccountsServiceError {
    #[error("email already registered")]
    DuplicateEmail,
    #[error("user not found")]
    UserNotFound,
    #[error("invalid credentials")]
    InvalidCredentials { attempts: u32 },
    #[error("account locked")]
    AccountLocked { attempts: u32 },
    #[error("invalid token")]
    InvalidToken,
    #[error("invalid token signature")]
    InvalidSignature,
    #[error("token expired")]
    TokenExpired,
    #[error("session invalid or expired")]
    InvalidSession,
    #[error("invalid email address")]
    InvalidEmail,
    #[error("password too short")]
    WeakPassword,
    #[error("first and last name are required")]
    MissingName,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl AccountsServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::DuplicateEmail => "DUPLICATE_EMAIL",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::InvalidCredentials { .. } => "INVALID_CREDENTIALS",
            Self::AccountLocked { .. } => "ACCOUNT_LOCKED",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::InvalidSignature => "INVALID_SIGNATURE",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::InvalidSession => "INVALID_SESSION",
            Self::InvalidEmail => "INVALID_EMAIL",
            Self::WeakPassword => "WEAK_PASSWORD",
            Self::MissingName => "MISSING_NAME",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for AccountsServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::DuplicateEmail => StatusCode::CONFLICT,
            Self::UserNotFound => StatusCode::NOT_FOUND,
            Self::InvalidCredentials { .. }
            | Self::InvalidToken
            | Self::InvalidSignature
            | Self::TokenExpired
            | Self::InvalidSession => StatusCode::UNAUTHORIZED,
            Self::AccountLocked { .. } => StatusCode::LOCKED,
            Self::InvalidEmail | Self::WeakPassword | Self::MissingName => {
                StatusCode::BAD_REQUEST
            }
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // Only 500s are logged: tower-http's TraceLayer already records
        // method/uri/status for every request, and 4xx responses are expected
        // client errors. Internal errors carry an anyhow chain worth keeping.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %e, kind = "INTERNAL", "internal error");
        }
        let mut body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        // Failure responses carry the running count so clients can warn
        // before the lockout hits.
        if let Self::InvalidCredentials { attempts } | Self::AccountLocked { attempts } = &self {
            body["attempts"] = serde_json::json!(attempts);
        }
        (status, axum::Json(body)).into_response()
    }
}
