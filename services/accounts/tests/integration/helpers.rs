use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use readnest_accounts::domain::repository::{
    ActivationCodeRepository, Notifier, PasswordHasher, SessionTokenMinter, UserRepository,
};
use readnest_accounts::domain::types::{ActivationCode, User};
use readnest_accounts::error::AccountsServiceError;
use readnest_accounts::events::{AccountEvent, AccountEvents};
use readnest_domain::role::RoleSet;

// ── MockUserRepo ─────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockUserRepo {
    pub users: Arc<Mutex<Vec<User>>>,
    pub find_by_email_calls: Arc<AtomicU32>,
}

impl MockUserRepo {
    pub fn new(users: Vec<User>) -> Self {
        Self {
            users: Arc::new(Mutex::new(users)),
            find_by_email_calls: Arc::new(AtomicU32::new(0)),
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }

    /// Shared handle to the stored users for post-execution inspection.
    pub fn users_handle(&self) -> Arc<Mutex<Vec<User>>> {
        Arc::clone(&self.users)
    }

    /// How many email lookups ran — the tracker gate must keep a capped key
    /// away from the store entirely.
    pub fn find_by_email_call_count(&self) -> u32 {
        self.find_by_email_calls.load(Ordering::SeqCst)
    }
}

impl UserRepository for MockUserRepo {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AccountsServiceError> {
        self.find_by_email_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.users.lock().unwrap().iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AccountsServiceError> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_reset_code(&self, code: &str) -> Result<Option<User>, AccountsServiceError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.reset_code.as_deref() == Some(code))
            .cloned())
    }

    async fn create(&self, user: &User) -> Result<(), AccountsServiceError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == user.email) {
            return Err(AccountsServiceError::DuplicateEmail);
        }
        users.push(user.clone());
        Ok(())
    }

    async fn set_enabled(&self, id: Uuid, enabled: bool) -> Result<(), AccountsServiceError> {
        if let Some(u) = self.users.lock().unwrap().iter_mut().find(|u| u.id == id) {
            u.enabled = enabled;
        }
        Ok(())
    }

    async fn set_locked(
        &self,
        id: Uuid,
        locked_at: DateTime<Utc>,
        unlock_at: DateTime<Utc>,
    ) -> Result<(), AccountsServiceError> {
        if let Some(u) = self.users.lock().unwrap().iter_mut().find(|u| u.id == id) {
            u.account_locked = true;
            u.locked_at = Some(locked_at);
            u.unlock_at = Some(unlock_at);
        }
        Ok(())
    }

    async fn set_reset_code(
        &self,
        id: Uuid,
        code: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AccountsServiceError> {
        if let Some(u) = self.users.lock().unwrap().iter_mut().find(|u| u.id == id) {
            u.reset_code = Some(code.to_owned());
            u.reset_code_expires_at = Some(expires_at);
        }
        Ok(())
    }

    async fn finish_reset(
        &self,
        id: Uuid,
        expected_code: &str,
        new_password_hash: &str,
    ) -> Result<bool, AccountsServiceError> {
        let mut users = self.users.lock().unwrap();
        let Some(u) = users.iter_mut().find(|u| u.id == id) else {
            return Ok(false);
        };
        if u.reset_code.as_deref() != Some(expected_code) {
            return Ok(false);
        }
        u.password_hash = new_password_hash.to_owned();
        u.reset_code = None;
        u.reset_code_expires_at = None;
        u.account_locked = false;
        u.locked_at = None;
        u.unlock_at = None;
        Ok(true)
    }
}

// ── MockActivationCodeRepo ───────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockActivationCodeRepo {
    pub codes: Arc<Mutex<Vec<ActivationCode>>>,
}

impl MockActivationCodeRepo {
    pub fn new(codes: Vec<ActivationCode>) -> Self {
        Self { codes: Arc::new(Mutex::new(codes)) }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }

    /// Shared handle to the internal code list for post-execution inspection.
    pub fn codes_handle(&self) -> Arc<Mutex<Vec<ActivationCode>>> {
        Arc::clone(&self.codes)
    }
}

impl ActivationCodeRepository for MockActivationCodeRepo {
    async fn create(&self, code: &ActivationCode) -> Result<(), AccountsServiceError> {
        self.codes.lock().unwrap().push(code.clone());
        Ok(())
    }

    async fn find_by_code(
        &self,
        code: &str,
    ) -> Result<Option<ActivationCode>, AccountsServiceError> {
        Ok(self
            .codes
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.code == code)
            .max_by_key(|c| c.created_at)
            .cloned())
    }

    async fn consume(&self, id: Uuid) -> Result<bool, AccountsServiceError> {
        // Single lock, so the read-then-set is as atomic as the real guarded
        // update statement.
        let mut codes = self.codes.lock().unwrap();
        let Some(c) = codes.iter_mut().find(|c| c.id == id) else {
            return Ok(false);
        };
        if c.validated_at.is_some() {
            return Ok(false);
        }
        c.validated_at = Some(Utc::now());
        Ok(true)
    }
}

// ── MockHasher ───────────────────────────────────────────────────────────────

/// Deterministic stand-in for Argon2: hash is "hashed:" + plaintext.
#[derive(Clone)]
pub struct MockHasher;

impl PasswordHasher for MockHasher {
    async fn hash(&self, plaintext: &str) -> Result<String, AccountsServiceError> {
        Ok(format!("hashed:{plaintext}"))
    }

    async fn verify(&self, plaintext: &str, hash: &str) -> Result<bool, AccountsServiceError> {
        Ok(hash == format!("hashed:{plaintext}"))
    }
}

// ── MockMinter ───────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockMinter {
    pub minted: Arc<AtomicBool>,
}

impl MockMinter {
    pub fn new() -> Self {
        Self { minted: Arc::new(AtomicBool::new(false)) }
    }

    pub fn was_minted(&self) -> bool {
        self.minted.load(Ordering::SeqCst)
    }
}

impl SessionTokenMinter for MockMinter {
    fn mint(
        &self,
        subject: Uuid,
        display_name: &str,
        roles: RoleSet,
    ) -> Result<String, AccountsServiceError> {
        self.minted.store(true, Ordering::SeqCst);
        Ok(format!("token:{subject}:{display_name}:{}", roles.names().join(",")))
    }
}

// ── Notifiers ────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct RecordingNotifier {
    /// (recipient email, activation code)
    pub activations: Arc<Mutex<Vec<(String, String)>>>,
    /// (recipient email, reset link)
    pub resets: Arc<Mutex<Vec<(String, String)>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self {
            activations: Arc::new(Mutex::new(vec![])),
            resets: Arc::new(Mutex::new(vec![])),
        }
    }

    pub fn activations_handle(&self) -> Arc<Mutex<Vec<(String, String)>>> {
        Arc::clone(&self.activations)
    }

    pub fn resets_handle(&self) -> Arc<Mutex<Vec<(String, String)>>> {
        Arc::clone(&self.resets)
    }
}

impl Notifier for RecordingNotifier {
    async fn send_activation(&self, user: &User, code: &str) -> Result<(), AccountsServiceError> {
        self.activations
            .lock()
            .unwrap()
            .push((user.email.clone(), code.to_owned()));
        Ok(())
    }

    async fn send_password_reset(
        &self,
        user: &User,
        reset_link: &str,
    ) -> Result<(), AccountsServiceError> {
        self.resets
            .lock()
            .unwrap()
            .push((user.email.clone(), reset_link.to_owned()));
        Ok(())
    }
}

/// Every send fails. Flows treat delivery as best-effort and must survive.
#[derive(Clone)]
pub struct FailingNotifier;

impl Notifier for FailingNotifier {
    async fn send_activation(&self, _user: &User, _code: &str) -> Result<(), AccountsServiceError> {
        Err(AccountsServiceError::Internal(anyhow::anyhow!("smtp down")))
    }

    async fn send_password_reset(
        &self,
        _user: &User,
        _reset_link: &str,
    ) -> Result<(), AccountsServiceError> {
        Err(AccountsServiceError::Internal(anyhow::anyhow!("smtp down")))
    }
}

// ── RecordingEvents ──────────────────────────────────────────────────────────

pub struct RecordingEvents {
    pub events: Arc<Mutex<Vec<AccountEvent>>>,
}

impl RecordingEvents {
    pub fn new() -> Self {
        Self { events: Arc::new(Mutex::new(vec![])) }
    }

    pub fn events_handle(&self) -> Arc<Mutex<Vec<AccountEvent>>> {
        Arc::clone(&self.events)
    }
}

impl AccountEvents for RecordingEvents {
    fn emit(&self, event: AccountEvent) {
        self.events.lock().unwrap().push(event);
    }
}

// ── Test fixture helpers ─────────────────────────────────────────────────────

pub fn test_user() -> User {
    User {
        id: Uuid::parse_str("00000000-0000-0000-0000-000000000001").unwrap(),
        first_name: "Jane".to_owned(),
        last_name: "Doe".to_owned(),
        email: "user@example.com".to_owned(),
        password_hash: "hashed:correct-horse".to_owned(),
        enabled: true,
        account_locked: false,
        locked_at: None,
        unlock_at: None,
        reset_code: None,
        reset_code_expires_at: None,
        roles: RoleSet::base(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn test_activation_code(user_id: Uuid) -> ActivationCode {
    ActivationCode {
        id: Uuid::new_v4(),
        user_id,
        code: "123456".to_owned(),
        expires_at: Utc::now() + chrono::Duration::seconds(900),
        validated_at: None,
        created_at: Utc::now(),
    }
}

pub const TEST_JWT_SECRET: &str = "test-jwt-secret-for-unit-tests-only";
