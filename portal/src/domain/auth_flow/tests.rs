//! Tests for the login/registration controller.

use std::sync::Arc;

use super::*;
use crate::domain::ports::{FixtureSessionStore, MockPortalApi, MockSessionStore};
use crate::domain::{AccessToken, ErrorCode, Hostel, Role, Session, User, UserId};
use rstest::rstest;

fn controller(
    api: MockPortalApi,
) -> (
    AuthController<MockPortalApi, FixtureSessionStore>,
    Arc<FixtureSessionStore>,
) {
    let store = Arc::new(FixtureSessionStore::default());
    (AuthController::new(Arc::new(api), Arc::clone(&store)), store)
}

fn fill_registration(form: &mut AuthForm) {
    form.name = "Asha Rao".to_owned();
    form.email = "asha@example.edu".to_owned();
    form.roll_number = "21CS042".to_owned();
    form.password = "hunter2".to_owned();
    form.hostel = "Coral".to_owned();
    form.room_number = "C-12".to_owned();
}

#[rstest]
fn starts_in_login_mode_without_messages() {
    let (auth, _) = controller(MockPortalApi::new());
    assert_eq!(auth.mode(), AuthMode::Login);
    assert_eq!(auth.form(), &AuthForm::default());
    assert!(auth.error().is_none());
    assert!(auth.notice().is_none());
    assert!(!auth.is_submitting());
}

#[rstest]
#[tokio::test]
async fn successful_login_persists_session_and_routes_to_dashboard() {
    let mut api = MockPortalApi::new();
    api.expect_login()
        .times(1)
        .withf(|creds| creds.email() == "warden@example.edu" && creds.password() == "pw")
        .return_once(|_| Ok(Session::new(AccessToken::new("tok"), Role::Admin)));
    let (mut auth, store) = controller(api);
    auth.form_mut().email = " warden@example.edu ".to_owned();
    auth.form_mut().password = "pw".to_owned();

    let route = auth.submit().await;

    assert_eq!(route, Some(Route::Dashboard));
    let stored = store.current().expect("session stored");
    assert_eq!(stored.role(), Role::Admin);
    assert_eq!(stored.token().expose(), "tok");
    assert!(!auth.is_submitting());
}

#[rstest]
#[tokio::test]
async fn failed_login_shows_server_message_and_keeps_form() {
    let mut api = MockPortalApi::new();
    api.expect_login()
        .times(1)
        .return_once(|_| Err(Error::unauthorized("Invalid credentials")));
    let (mut auth, store) = controller(api);
    auth.form_mut().email = "asha@example.edu".to_owned();
    auth.form_mut().password = "wrong".to_owned();

    assert_eq!(auth.submit().await, None);
    assert_eq!(auth.error().map(Error::message), Some("Invalid credentials"));
    assert_eq!(auth.error().map(Error::code), Some(ErrorCode::Unauthorized));
    assert_eq!(auth.form().password, "wrong");
    assert!(store.current().is_none());
}

#[rstest]
#[tokio::test]
async fn malformed_email_never_reaches_the_api() {
    let mut api = MockPortalApi::new();
    api.expect_login().times(0);
    let (mut auth, _) = controller(api);
    auth.form_mut().email = "not-an-email".to_owned();
    auth.form_mut().password = "pw".to_owned();

    assert_eq!(auth.submit().await, None);
    assert_eq!(auth.error().map(Error::message), Some("a valid email is required"));
    assert_eq!(auth.error().map(Error::code), Some(ErrorCode::InvalidRequest));
}

#[rstest]
#[tokio::test]
async fn session_store_failure_blocks_navigation() {
    let mut api = MockPortalApi::new();
    api.expect_login()
        .return_once(|_| Ok(Session::new(AccessToken::new("tok"), Role::Student)));
    let mut store = MockSessionStore::new();
    store
        .expect_save()
        .times(1)
        .return_once(|_| Err(SessionStoreError::write("read-only filesystem")));
    let mut auth = AuthController::new(Arc::new(api), Arc::new(store));
    auth.form_mut().email = "asha@example.edu".to_owned();
    auth.form_mut().password = "pw".to_owned();

    assert_eq!(auth.submit().await, None);
    assert_eq!(
        auth.error().map(Error::message),
        Some("session write failed: read-only filesystem")
    );
    assert_eq!(auth.error().map(Error::code), Some(ErrorCode::Internal));
}

#[rstest]
#[tokio::test]
async fn registration_success_switches_to_login_with_notice() {
    let mut api = MockPortalApi::new();
    api.expect_register()
        .times(1)
        .withf(|reg| reg.hostel() == Some(Hostel::Coral) && reg.room_number() == Some("C-12"))
        .return_once(|reg| {
            Ok(User::builder(UserId::new(9), reg.email())
                .name(reg.name())
                .build())
        });
    let (mut auth, store) = controller(api);
    auth.toggle_mode();
    fill_registration(auth.form_mut());

    assert_eq!(auth.submit().await, None);
    assert_eq!(auth.mode(), AuthMode::Login);
    assert_eq!(auth.notice(), Some(REGISTRATION_NOTICE));
    assert_eq!(auth.form(), &AuthForm::default());
    assert!(auth.error().is_none());
    assert!(store.current().is_none());
}

#[rstest]
#[tokio::test]
async fn registration_failure_preserves_entered_values() {
    let mut api = MockPortalApi::new();
    api.expect_register()
        .times(1)
        .return_once(|_| Err(Error::invalid_request("Email already registered")));
    let (mut auth, _) = controller(api);
    auth.toggle_mode();
    fill_registration(auth.form_mut());

    assert_eq!(auth.submit().await, None);
    assert_eq!(auth.mode(), AuthMode::Register);
    assert_eq!(auth.error().map(Error::message), Some("Email already registered"));
    assert_eq!(auth.form().roll_number, "21CS042");
    assert!(auth.notice().is_none());
}

#[rstest]
#[tokio::test]
async fn toggling_clears_messages() {
    let mut api = MockPortalApi::new();
    api.expect_login()
        .return_once(|_| Err(Error::new(ErrorCode::Unauthorized, "Login failed")));
    let (mut auth, _) = controller(api);
    auth.form_mut().email = "asha@example.edu".to_owned();
    auth.form_mut().password = "pw".to_owned();
    auth.submit().await;
    assert!(auth.error().is_some());

    auth.toggle_mode();
    assert_eq!(auth.mode(), AuthMode::Register);
    assert!(auth.error().is_none());
    assert!(auth.notice().is_none());
    assert_eq!(auth.form().email, "asha@example.edu");
}
