use chrono::{DateTime, Duration, Utc};
use rand::RngExt;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::domain::repository::{ActivationCodeRepository, Notifier};
use crate::domain::types::{ACTIVATION_CODE_TTL_SECS, ActivationCode, CODE_LEN, User};
use crate::error::AccountsServiceError;

/// Charset for generating credential codes (digits only, mirroring what the
/// notification emails spell out).
const CHARSET: &[u8] = b"0123456789";

pub fn generate_code() -> String {
    let mut rng = rand::rng();
    (0..CODE_LEN)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect()
}

/// Signature accompanying a reset code in the emailed link: lowercase hex of
/// the code's SHA-256. Both sides derive it the same way, so possession of
/// the code alone is not enough to submit a reset.
pub fn reset_signature(code: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(code.as_bytes());
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

/// Compare a presented signature against the expected one in constant time.
pub fn signature_matches(expected: &str, presented: &str) -> bool {
    let expected = expected.as_bytes();
    let presented = presented.as_bytes();
    if expected.len() != presented.len() {
        return false;
    }
    let mut diff = 0u8;
    for (a, b) in expected.iter().zip(presented) {
        diff |= a ^ b;
    }
    diff == 0
}

/// Check a presented reset code + signature against the user's stored reset
/// fields. Failures rank: unknown code, then bad signature, then expiry.
pub fn validate_reset(
    user: &User,
    code: &str,
    signature: &str,
    now: DateTime<Utc>,
) -> Result<(), AccountsServiceError> {
    let (Some(stored_code), Some(expires_at)) = (&user.reset_code, user.reset_code_expires_at)
    else {
        return Err(AccountsServiceError::InvalidToken);
    };
    if stored_code != code {
        return Err(AccountsServiceError::InvalidToken);
    }
    if !signature_matches(&reset_signature(stored_code), signature) {
        return Err(AccountsServiceError::InvalidSignature);
    }
    if expires_at <= now {
        return Err(AccountsServiceError::TokenExpired);
    }
    Ok(())
}

/// Issue a fresh activation code for `user`: persist the record, then send
/// the notification. Delivery failure is logged, not surfaced — the code is
/// already on file and can be reissued.
pub async fn issue_activation<A, N>(
    codes: &A,
    notifier: &N,
    user: &User,
) -> Result<String, AccountsServiceError>
where
    A: ActivationCodeRepository,
    N: Notifier,
{
    let code_str = generate_code();
    let now = Utc::now();
    let code = ActivationCode {
        id: Uuid::now_v7(),
        user_id: user.id,
        code: code_str.clone(),
        expires_at: now + Duration::seconds(ACTIVATION_CODE_TTL_SECS),
        validated_at: None,
        created_at: now,
    };
    codes.create(&code).await?;

    if let Err(e) = notifier.send_activation(user, &code_str).await {
        tracing::warn!(error = %e, "activation email delivery failed");
    }
    Ok(code_str)
}
