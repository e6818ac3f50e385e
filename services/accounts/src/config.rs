/// Accounts service configuration loaded from environment variables.
#[derive(Debug)]
pub struct AccountsConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// HMAC secret for signing session tokens.
    pub jwt_secret: String,
    /// TCP port to listen on (default 3120). Env var: `ACCOUNTS_PORT`.
    pub accounts_port: u16,
    /// Page where users enter their activation code, spelled out in
    /// activation emails.
    pub activation_url: String,
    /// Reset-page base URL; code and signature are appended as query
    /// parameters in reset emails.
    pub reset_password_url: String,
    /// Transactional-mail API endpoint. Unset means log-only mail. Env var:
    /// `MAIL_API_URL`.
    pub mail_api_url: Option<String>,
    /// Transactional-mail API key. Env var: `MAIL_API_KEY`.
    pub mail_api_key: Option<String>,
    /// Sender address for outbound mail. Env var: `MAIL_SENDER`.
    pub mail_sender: Option<String>,
    /// Admin seed email. Unset means no admin bootstrap. Env var: `ADMIN_EMAIL`.
    pub admin_email: Option<String>,
    /// Admin seed password. Env var: `ADMIN_PASSWORD`.
    pub admin_password: Option<String>,
}

impl AccountsConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL"),
            jwt_secret: std::env::var("JWT_SECRET").expect("JWT_SECRET"),
            accounts_port: std::env::var("ACCOUNTS_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3120),
            activation_url: std::env::var("ACTIVATION_URL").expect("ACTIVATION_URL"),
            reset_password_url: std::env::var("RESET_PASSWORD_URL").expect("RESET_PASSWORD_URL"),
            mail_api_url: std::env::var("MAIL_API_URL").ok(),
            mail_api_key: std::env::var("MAIL_API_KEY").ok(),
            mail_sender: std::env::var("MAIL_SENDER").ok(),
            admin_email: std::env::var("ADMIN_EMAIL").ok(),
            admin_password: std::env::var("ADMIN_PASSWORD").ok(),
        }
    }
}
