use std::time::Duration;

use contactlist_client::types::UserPatch;
use contactlist_client::{ApiError, ContactApi, ContactClient, UserApi, UserClient};
use contactlist_testing::data;
use contactlist_testing::mock_api::MockApi;

const TIMEOUT: Duration = Duration::from_secs(5);

const PASSWORD: &str = "Sup3rSecret!";

// ── register ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_register_and_fetch_profile() {
    let mock = MockApi::spawn().await;
    let mut client = UserClient::new(mock.base_url(), TIMEOUT).unwrap();

    let new_user = data::test_user("qa", PASSWORD);
    let auth = client.register(&new_user).await.unwrap();
    assert_eq!(auth.user.email, new_user.email);
    assert!(!auth.token.is_empty());
    assert_eq!(client.token(), Some(auth.token.as_str()));

    let profile = client.profile().await.unwrap();
    assert_eq!(profile, auth.user);
}

#[tokio::test]
async fn should_reject_duplicate_email_registration() {
    let mock = MockApi::spawn().await;
    let mut client = UserClient::new(mock.base_url(), TIMEOUT).unwrap();

    let new_user = data::test_user("qa", PASSWORD);
    client.register(&new_user).await.unwrap();

    let result = client.register(&new_user).await;
    match result {
        Err(ApiError::UnexpectedStatus { status, body }) => {
            assert_eq!(status, 400);
            assert!(body.contains("already in use"), "body was: {body}");
        }
        other => panic!("expected UnexpectedStatus, got {other:?}"),
    }
}

// ── login ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_login_with_registered_credentials() {
    let mock = MockApi::spawn().await;
    let mut client = UserClient::new(mock.base_url(), TIMEOUT).unwrap();

    let new_user = data::test_user("qa", PASSWORD);
    let registered = client.register(&new_user).await.unwrap();

    let mut fresh = UserClient::new(mock.base_url(), TIMEOUT).unwrap();
    let auth = fresh.login(&new_user.email, PASSWORD).await.unwrap();
    assert_eq!(auth.user, registered.user);
    assert!(fresh.token().is_some());
}

#[tokio::test]
async fn should_reject_wrong_password() {
    let mock = MockApi::spawn().await;
    let mut client = UserClient::new(mock.base_url(), TIMEOUT).unwrap();

    let new_user = data::test_user("qa", PASSWORD);
    client.register(&new_user).await.unwrap();

    let result = client.login(&new_user.email, "not-the-password").await;
    assert!(
        matches!(result, Err(ApiError::UnexpectedStatus { status: 401, .. })),
        "expected 401, got {result:?}"
    );
}

// ── profile ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_require_token_before_profile_calls() {
    let mock = MockApi::spawn().await;
    let client = UserClient::new(mock.base_url(), TIMEOUT).unwrap();

    let result = client.profile().await;
    assert!(matches!(result, Err(ApiError::NotAuthenticated)));
}

#[tokio::test]
async fn should_update_profile() {
    let mock = MockApi::spawn().await;
    let mut client = UserClient::new(mock.base_url(), TIMEOUT).unwrap();
    client.register(&data::test_user("qa", PASSWORD)).await.unwrap();

    let patch = UserPatch {
        first_name: Some("Updated".to_owned()),
        ..Default::default()
    };
    let updated = client.update_profile(&patch).await.unwrap();
    assert_eq!(updated.first_name, "Updated");

    let profile = client.profile().await.unwrap();
    assert_eq!(profile, updated);
}

// ── logout / delete ──────────────────────────────────────────────────────────

#[tokio::test]
async fn should_invalidate_token_on_logout() {
    let mock = MockApi::spawn().await;
    let mut client = UserClient::new(mock.base_url(), TIMEOUT).unwrap();
    let auth = client.register(&data::test_user("qa", PASSWORD)).await.unwrap();

    client.logout().await.unwrap();
    assert_eq!(client.token(), None);

    // The server must reject the old token too.
    let contacts = ContactClient::new(mock.base_url(), TIMEOUT, auth.token).unwrap();
    let result = contacts.list().await;
    assert!(
        matches!(result, Err(ApiError::UnexpectedStatus { status: 401, .. })),
        "expected 401, got {result:?}"
    );
}

#[tokio::test]
async fn should_delete_account_and_reject_later_login() {
    let mock = MockApi::spawn().await;
    let mut client = UserClient::new(mock.base_url(), TIMEOUT).unwrap();
    let new_user = data::test_user("qa", PASSWORD);
    client.register(&new_user).await.unwrap();

    client.delete_account().await.unwrap();
    assert_eq!(client.token(), None);

    let result = client.login(&new_user.email, PASSWORD).await;
    assert!(
        matches!(result, Err(ApiError::UnexpectedStatus { status: 401, .. })),
        "expected 401, got {result:?}"
    );
}
