//! JWT session-token validation.

use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::Deserialize;
#[cfg(any(feature = "USE_ONLY_IN_ACCOUNTS_SERVICE", test))]
use serde::Serialize;
use uuid::Uuid;

/// Session-token JWT lifetime in seconds (24 hours).
pub const SESSION_TOKEN_EXP: u64 = 86400;

/// User identity extracted from a validated session token.
#[derive(Debug, Clone)]
pub struct SessionInfo {
    pub user_id: Uuid,
    pub display_name: String,
    pub roles: Vec<String>,
    pub session_exp: u64,
}

/// Errors returned by [`validate_session_token`].
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("invalid signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("malformed token")]
    Malformed,
}

/// JWT claims payload shared by token minting (accounts service) and
/// validation (everyone else).
///
/// # Fields
///
/// | Field | JWT claim | Rust type | Meaning |
/// |-------|-----------|-----------|---------|
/// | `sub` | `sub` | UUID string | user ID |
/// | `name` | custom | string | display name at mint time |
/// | `roles` | custom | uppercase role names | see `readnest_domain::role::Role` |
/// | `exp` | `exp` | seconds since epoch | token expiration |
///
/// # Feature gate
///
/// Every consumer gets [`Deserialize`], since everyone validates tokens.
/// [`Serialize`] requires the **`USE_ONLY_IN_ACCOUNTS_SERVICE`** cargo
/// feature. Only the accounts service enables it because it is the sole
/// token minter.
#[derive(Debug, Deserialize)]
#[cfg_attr(any(feature = "USE_ONLY_IN_ACCOUNTS_SERVICE", test), derive(Serialize))]
pub struct SessionClaims {
    /// User ID (UUID string).
    pub sub: String,
    /// Display name embedded at mint time.
    pub name: String,
    /// Uppercase role names.
    pub roles: Vec<String>,
    /// Expiration timestamp (seconds since UNIX epoch).
    pub exp: u64,
}

/// Decode and validate a session JWT, returning parsed identity.
///
/// HS256 with expiry verification; `exp` and `sub` are required claims. The
/// library's default 60s leeway absorbs clock skew between services.
pub fn validate_session_token(token: &str, secret: &str) -> Result<SessionInfo, SessionError> {
    let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
    validation.validate_exp = true;
    validation.required_spec_claims.clear();
    validation.set_required_spec_claims(&["exp", "sub"]);

    let data = decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => SessionError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidSignature
        | jsonwebtoken::errors::ErrorKind::InvalidEcdsaKey
        | jsonwebtoken::errors::ErrorKind::InvalidRsaKey(_) => SessionError::InvalidSignature,
        _ => SessionError::Malformed,
    })?;

    let claims = data.claims;
    let user_id = claims
        .sub
        .parse::<Uuid>()
        .map_err(|_| SessionError::Malformed)?;
    Ok(SessionInfo {
        user_id,
        display_name: claims.name,
        roles: claims.roles,
        session_exp: claims.exp,
    })
}
