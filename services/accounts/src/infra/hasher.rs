use anyhow::Context as _;
use argon2::Argon2;
use argon2::password_hash::{
    PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString, rand_core::OsRng,
};
use tokio::task;

use crate::domain::repository::PasswordHasher;
use crate::error::AccountsServiceError;

/// Argon2id hashing behind the `PasswordHasher` port. Both operations run
/// under `spawn_blocking`: the KDF is deliberately slow and would stall the
/// async runtime inline.
#[derive(Clone)]
pub struct Argon2PasswordHasher;

impl PasswordHasher for Argon2PasswordHasher {
    async fn hash(&self, plaintext: &str) -> Result<String, AccountsServiceError> {
        let password = plaintext.to_owned();
        let hash = task::spawn_blocking(move || {
            let salt = SaltString::generate(&mut OsRng);
            Argon2::default()
                .hash_password(password.as_bytes(), &salt)
                .map(|hash| hash.to_string())
                .map_err(|e| anyhow::anyhow!("hash password: {e}"))
        })
        .await
        .context("password hashing task panicked")??;
        Ok(hash)
    }

    async fn verify(&self, plaintext: &str, hash: &str) -> Result<bool, AccountsServiceError> {
        let password = plaintext.to_owned();
        let hash = hash.to_owned();
        let matches = task::spawn_blocking(move || {
            let parsed = PasswordHash::new(&hash)
                .map_err(|e| anyhow::anyhow!("parse stored password hash: {e}"))?;
            Ok::<_, anyhow::Error>(
                Argon2::default()
                    .verify_password(password.as_bytes(), &parsed)
                    .is_ok(),
            )
        })
        .await
        .context("password verification task panicked")??;
        Ok(matches)
    }
}
