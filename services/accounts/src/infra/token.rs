use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{EncodingKey, Header, encode};
use uuid::Uuid;

use readnest_domain::role::RoleSet;
use readnest_session::token::{SESSION_TOKEN_EXP, SessionClaims};

use crate::domain::repository::SessionTokenMinter;
use crate::error::AccountsServiceError;

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before UNIX epoch")
        .as_secs()
}

/// HS256 session-token minting. Validation lives in `readnest-session` so
/// other services can check tokens without this crate.
#[derive(Clone)]
pub struct JwtSessionMinter {
    pub secret: String,
}

impl SessionTokenMinter for JwtSessionMinter {
    fn mint(
        &self,
        subject: Uuid,
        display_name: &str,
        roles: RoleSet,
    ) -> Result<String, AccountsServiceError> {
        let claims = SessionClaims {
            sub: subject.to_string(),
            name: display_name.to_owned(),
            roles: roles.names(),
            exp: now_secs() + SESSION_TOKEN_EXP,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AccountsServiceError::Internal(e.into()))
    }
}
