use std::sync::Arc;

use sea_orm::Database;
use tracing::info;

use readnest_accounts::attempts::LoginAttemptTracker;
use readnest_accounts::config::AccountsConfig;
use readnest_accounts::events::TracingEvents;
use readnest_accounts::infra::mailer::{HttpMailer, LogMailer, Mailer};
use readnest_accounts::router::build_router;
use readnest_accounts::state::AppState;
use readnest_accounts::usecase::bootstrap::EnsureAdminUseCase;

#[tokio::main]
async fn main() {
    readnest_core::tracing::init_tracing();

    let config = AccountsConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let notifier = match (&config.mail_api_url, &config.mail_api_key, &config.mail_sender) {
        (Some(api_url), Some(api_key), Some(sender)) => Mailer::Http(
            HttpMailer::new(
                api_url.clone(),
                api_key.clone(),
                sender.clone(),
                config.activation_url.clone(),
            )
            .expect("failed to build mailer"),
        ),
        _ => {
            info!("mail API not configured, logging outbound email instead");
            Mailer::Log(LogMailer)
        }
    };

    let state = AppState {
        db,
        attempts: Arc::new(LoginAttemptTracker::new()),
        events: Arc::new(TracingEvents),
        notifier,
        jwt_secret: config.jwt_secret,
        reset_password_url: config.reset_password_url,
    };

    if let (Some(email), Some(password)) = (&config.admin_email, &config.admin_password) {
        EnsureAdminUseCase {
            users: state.user_repo(),
            hasher: state.password_hasher(),
        }
        .execute(email, password)
        .await
        .expect("failed to seed admin account");
    }

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.accounts_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("accounts service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
