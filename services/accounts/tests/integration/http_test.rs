use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use sea_orm::DatabaseConnection;
use serde_json::{Value, json};
use uuid::Uuid;

use readnest_accounts::attempts::LoginAttemptTracker;
use readnest_accounts::domain::repository::SessionTokenMinter;
use readnest_accounts::events::TracingEvents;
use readnest_accounts::infra::mailer::{LogMailer, Mailer};
use readnest_accounts::infra::token::JwtSessionMinter;
use readnest_accounts::router::build_router;
use readnest_accounts::state::AppState;
use readnest_domain::role::RoleSet;

use crate::helpers::TEST_JWT_SECRET;

/// State with a disconnected database: good for every route that fails
/// before its first query.
fn test_state() -> AppState {
    AppState {
        db: DatabaseConnection::default(),
        attempts: Arc::new(LoginAttemptTracker::new()),
        events: Arc::new(TracingEvents),
        notifier: Mailer::Log(LogMailer),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
        reset_password_url: "https://readnest.app/reset-password".to_owned(),
    }
}

#[tokio::test]
async fn should_answer_liveness_probe() {
    let server = TestServer::new(build_router(test_state())).unwrap();
    server.get("/healthz").await.assert_status(StatusCode::OK);
}

#[tokio::test]
async fn should_report_unready_while_database_is_down() {
    let server = TestServer::new(build_router(test_state())).unwrap();
    server
        .get("/readyz")
        .await
        .assert_status(StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn should_reject_short_password_at_the_edge() {
    let server = TestServer::new(build_router(test_state())).unwrap();
    let response = server
        .post("/auth/register")
        .json(&json!({
            "first_name": "Jane",
            "last_name": "Doe",
            "email": "jane@example.com",
            "password": "short77",
        }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["kind"], "WEAK_PASSWORD");
}

#[tokio::test]
async fn should_reject_invalid_email_at_the_edge() {
    let server = TestServer::new(build_router(test_state())).unwrap();
    let response = server
        .post("/auth/register")
        .json(&json!({
            "first_name": "Jane",
            "last_name": "Doe",
            "email": "not-an-email",
            "password": "password123",
        }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["kind"], "INVALID_EMAIL");
}

#[tokio::test]
async fn should_reject_blank_name_at_the_edge() {
    let server = TestServer::new(build_router(test_state())).unwrap();
    let response = server
        .post("/auth/register")
        .json(&json!({
            "first_name": "",
            "last_name": "Doe",
            "email": "jane@example.com",
            "password": "password123",
        }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["kind"], "MISSING_NAME");
}

#[tokio::test]
async fn should_refuse_capped_key_before_any_query() {
    let state = test_state();
    for _ in 0..5 {
        state.attempts.record_failure("locked@example.com");
    }

    // The database is disconnected: reaching it would 500. A 423 proves the
    // tracker gate answered first.
    let server = TestServer::new(build_router(state)).unwrap();
    let response = server
        .post("/auth/authenticate")
        .json(&json!({
            "email": "locked@example.com",
            "password": "whatever",
            "login_page": "web-login",
        }))
        .await;
    response.assert_status(StatusCode::LOCKED);
    let body: Value = response.json();
    assert_eq!(body["kind"], "ACCOUNT_LOCKED");
    assert_eq!(body["attempts"], 5);
}

#[tokio::test]
async fn should_reject_garbage_session_token() {
    let server = TestServer::new(build_router(test_state())).unwrap();
    let response = server
        .get("/auth/session")
        .add_query_param("token", "garbage")
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["kind"], "INVALID_SESSION");
}

#[tokio::test]
async fn should_check_minted_session_round_trip() {
    let minter = JwtSessionMinter { secret: TEST_JWT_SECRET.to_owned() };
    let user_id = Uuid::new_v4();
    let token = minter.mint(user_id, "Jane Doe", RoleSet::base()).unwrap();

    let server = TestServer::new(build_router(test_state())).unwrap();
    let response = server.get("/auth/session").add_query_param("token", &token).await;
    response.assert_status(StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["user_id"], user_id.to_string());
    assert_eq!(body["display_name"], "Jane Doe");
    assert_eq!(body["roles"], json!(["USER"]));
}

#[tokio::test]
async fn should_require_code_parameter_on_activation() {
    let server = TestServer::new(build_router(test_state())).unwrap();
    let response = server.get("/auth/activate-account").await;
    response.assert_status(StatusCode::BAD_REQUEST);
}
