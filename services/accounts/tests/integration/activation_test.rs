use std::sync::Arc;

use chrono::Utc;

use readnest_accounts::error::AccountsServiceError;
use readnest_accounts::events::AccountEvent;
use readnest_accounts::usecase::activate::ActivateAccountUseCase;

use crate::helpers::{
    MockActivationCodeRepo, MockUserRepo, RecordingEvents, RecordingNotifier,
    test_activation_code, test_user,
};

#[tokio::test]
async fn should_activate_account_with_fresh_code() {
    let mut user = test_user();
    user.enabled = false;
    let code = test_activation_code(user.id);

    let users = MockUserRepo::new(vec![user.clone()]);
    let users_handle = users.users_handle();
    let codes = MockActivationCodeRepo::new(vec![code.clone()]);
    let codes_handle = codes.codes_handle();

    let uc = ActivateAccountUseCase {
        users,
        codes,
        notifier: RecordingNotifier::new(),
        events: Arc::new(RecordingEvents::new()),
    };
    let activated = uc.execute("123456").await.unwrap();
    assert!(activated);

    assert!(users_handle.lock().unwrap()[0].enabled, "account should be enabled");
    assert!(
        codes_handle.lock().unwrap()[0].validated_at.is_some(),
        "code should be consumed"
    );
}

#[tokio::test]
async fn should_reject_replayed_activation_code() {
    let mut user = test_user();
    user.enabled = false;

    let users = MockUserRepo::new(vec![user.clone()]);
    let users_handle = users.users_handle();

    let uc = ActivateAccountUseCase {
        users,
        codes: MockActivationCodeRepo::new(vec![test_activation_code(user.id)]),
        notifier: RecordingNotifier::new(),
        events: Arc::new(RecordingEvents::new()),
    };

    uc.execute("123456").await.unwrap();
    let result = uc.execute("123456").await;
    assert!(
        matches!(result, Err(AccountsServiceError::InvalidToken)),
        "a consumed code must not validate again, got {result:?}"
    );
    assert!(users_handle.lock().unwrap()[0].enabled, "first activation stays in effect");
}

#[tokio::test]
async fn should_reissue_and_surface_expiry_for_expired_code() {
    let mut user = test_user();
    user.enabled = false;
    let mut code = test_activation_code(user.id);
    code.expires_at = Utc::now() - chrono::Duration::seconds(1);

    let users = MockUserRepo::new(vec![user.clone()]);
    let users_handle = users.users_handle();
    let codes = MockActivationCodeRepo::new(vec![code]);
    let codes_handle = codes.codes_handle();
    let notifier = RecordingNotifier::new();
    let activations = notifier.activations_handle();
    let events = RecordingEvents::new();
    let events_handle = events.events_handle();

    let uc = ActivateAccountUseCase {
        users,
        codes,
        notifier,
        events: Arc::new(events),
    };
    let result = uc.execute("123456").await;
    assert!(
        matches!(result, Err(AccountsServiceError::TokenExpired)),
        "expected TokenExpired, got {result:?}"
    );

    // The failure reissued a fresh code and notified the user.
    let codes = codes_handle.lock().unwrap();
    assert_eq!(codes.len(), 2, "a fresh code should be on file next to the stale one");
    let fresh = &codes[1];
    assert!(fresh.expires_at > Utc::now());
    assert!(fresh.validated_at.is_none());
    assert_eq!(activations.lock().unwrap().len(), 1);

    let events = events_handle.lock().unwrap();
    assert!(
        matches!(
            events.as_slice(),
            [AccountEvent::ActivationExpiredReissued { user_id }] if *user_id == user.id
        ),
        "expected a single reissue event, got {events:?}"
    );

    assert!(!users_handle.lock().unwrap()[0].enabled, "account must stay disabled");
}

#[tokio::test]
async fn should_reject_unknown_activation_code() {
    let uc = ActivateAccountUseCase {
        users: MockUserRepo::new(vec![test_user()]),
        codes: MockActivationCodeRepo::empty(),
        notifier: RecordingNotifier::new(),
        events: Arc::new(RecordingEvents::new()),
    };

    let result = uc.execute("999999").await;
    assert!(
        matches!(result, Err(AccountsServiceError::InvalidToken)),
        "expected InvalidToken, got {result:?}"
    );
}

#[tokio::test]
async fn should_let_only_one_concurrent_activation_win() {
    let mut user = test_user();
    user.enabled = false;
    let code = test_activation_code(user.id);

    let users = MockUserRepo::new(vec![user.clone()]);
    let codes = MockActivationCodeRepo::new(vec![code]);

    let first = ActivateAccountUseCase {
        users: users.clone(),
        codes: codes.clone(),
        notifier: RecordingNotifier::new(),
        events: Arc::new(RecordingEvents::new()),
    };
    let second = ActivateAccountUseCase {
        users,
        codes,
        notifier: RecordingNotifier::new(),
        events: Arc::new(RecordingEvents::new()),
    };

    let (r1, r2) = tokio::join!(first.execute("123456"), second.execute("123456"));
    let wins = [&r1, &r2].iter().filter(|r| r.is_ok()).count();
    assert_eq!(wins, 1, "exactly one submission may win, got {r1:?} / {r2:?}");
}
