//! End-to-end command tests against the fixture adapters.

use std::time::Duration;

use super::*;
use crate::domain::ports::{FixturePortalApi, FixtureSessionStore};
use crate::domain::{Category, ComplaintStatus, ErrorCode, Role, StatusFilter, User, UserId};
use chrono::Utc;
use rstest::{fixture, rstest};

struct Harness {
    api: Arc<FixturePortalApi>,
    store: Arc<FixtureSessionStore>,
    ctx: CliContext<FixturePortalApi, FixtureSessionStore>,
}

impl Harness {
    async fn run(&self, command: Command) -> Result<String, CliError> {
        let mut out = Vec::new();
        run(command, &self.ctx, &mut out).await?;
        Ok(String::from_utf8(out).expect("utf-8 output"))
    }

    async fn login(&self, email: &str, password: &str) {
        self.run(Command::Login(LoginArgs {
            email: email.to_owned(),
            password: password.to_owned(),
        }))
        .await
        .expect("login succeeds");
    }
}

#[fixture]
fn harness() -> Harness {
    let api = Arc::new(FixturePortalApi::default());
    api.seed_user(
        User::builder(UserId::new(1), "warden@example.edu")
            .name("Warden")
            .role(Role::Admin)
            .build(),
        "admin-pass",
    );
    api.seed_user(
        User::builder(UserId::new(2), "asha@example.edu")
            .name("Asha")
            .roll_number("21CS042")
            .build(),
        "student-pass",
    );
    api.seed_complaint(
        Complaint::builder(ComplaintId::new(7), Utc::now())
            .owner(UserId::new(2))
            .title("Leaking tap")
            .category(Category::Plumbing)
            .build(),
    );
    let store = Arc::new(FixtureSessionStore::default());
    let ctx = CliContext::new(
        Arc::clone(&api),
        Arc::clone(&store),
        ExpiryPolicy::new(Duration::ZERO, true),
    );
    Harness { api, store, ctx }
}

#[rstest]
#[tokio::test]
async fn login_then_whoami(harness: Harness) {
    let out = harness
        .run(Command::Login(LoginArgs {
            email: "asha@example.edu".to_owned(),
            password: "student-pass".to_owned(),
        }))
        .await
        .expect("login");
    assert_eq!(out, "Logged in as student.\n");

    let out = harness.run(Command::Whoami).await.expect("whoami");
    assert!(out.starts_with("Asha <asha@example.edu>"));
}

#[rstest]
#[tokio::test]
async fn bad_password_reports_server_message(harness: Harness) {
    let err = harness
        .run(Command::Login(LoginArgs {
            email: "asha@example.edu".to_owned(),
            password: "nope".to_owned(),
        }))
        .await
        .expect_err("login fails");
    assert_eq!(err.to_string(), "Invalid credentials");
    let CliError::Domain(inner) = err else {
        panic!("expected a domain error");
    };
    assert_eq!(inner.code(), ErrorCode::Unauthorized);
    assert!(harness.store.current().is_none());
}

#[rstest]
#[tokio::test]
async fn invalid_registration_keeps_its_validation_code(harness: Harness) {
    let err = harness
        .run(Command::Register(RegisterArgs {
            name: "Ravi".to_owned(),
            email: "not-an-email".to_owned(),
            roll_number: "22EE001".to_owned(),
            password: "pw".to_owned(),
            hostel: None,
            room_number: None,
        }))
        .await
        .expect_err("registration rejected");
    let CliError::Domain(inner) = err else {
        panic!("expected a domain error");
    };
    assert_eq!(inner.code(), ErrorCode::InvalidRequest);
    assert!(harness.api.calls().is_empty());
}

#[rstest]
#[tokio::test]
async fn commands_without_session_ask_for_login(harness: Harness) {
    let err = harness
        .run(Command::Complaints(ComplaintCommand::List {
            search: String::new(),
            status: StatusFilter::All,
            json: false,
        }))
        .await
        .expect_err("no session");
    assert!(matches!(err, CliError::NotLoggedIn));
    assert!(harness.api.calls().is_empty());
}

#[rstest]
#[tokio::test]
async fn student_submits_and_sees_it_first(harness: Harness) {
    harness.login("asha@example.edu", "student-pass").await;

    let out = harness
        .run(Command::Complaints(ComplaintCommand::Submit {
            category: Category::Electrical,
            title: "Fan not working".to_owned(),
            description: "Room 12".to_owned(),
        }))
        .await
        .expect("submit");
    assert!(out.starts_with("Submitted complaint #8."));

    let out = harness
        .run(Command::Complaints(ComplaintCommand::List {
            search: String::new(),
            status: StatusFilter::All,
            json: false,
        }))
        .await
        .expect("list");
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines[0], "My Complaints");
    assert!(lines[1].ends_with("Leaking tap"));
    assert!(lines[2].ends_with("Fan not working"));
}

#[rstest]
#[tokio::test]
async fn admins_cannot_submit(harness: Harness) {
    harness.login("warden@example.edu", "admin-pass").await;
    let err = harness
        .run(Command::Complaints(ComplaintCommand::Submit {
            category: Category::Others,
            title: "t".to_owned(),
            description: "d".to_owned(),
        }))
        .await
        .expect_err("admins do not submit");
    let CliError::Domain(inner) = err else {
        panic!("expected a domain error");
    };
    assert_eq!(inner.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn admin_sets_status(harness: Harness) {
    harness.login("warden@example.edu", "admin-pass").await;
    let out = harness
        .run(Command::Complaints(ComplaintCommand::SetStatus {
            id: ComplaintId::new(7),
            status: ComplaintStatus::Resolved,
        }))
        .await
        .expect("set status");
    assert!(out.contains("[Resolved]"));
    assert_eq!(
        harness.api.stored_complaints()[0].status(),
        ComplaintStatus::Resolved
    );
}

#[rstest]
#[tokio::test]
async fn json_listing_is_machine_readable(harness: Harness) {
    harness.login("warden@example.edu", "admin-pass").await;
    let out = harness
        .run(Command::Complaints(ComplaintCommand::List {
            search: "tap".to_owned(),
            status: StatusFilter::Only(ComplaintStatus::Pending),
            json: true,
        }))
        .await
        .expect("list");
    let value: serde_json::Value = serde_json::from_str(&out).expect("valid json");
    assert_eq!(value[0]["id"], 7);
    assert_eq!(value[0]["status"], "Pending");
}

#[rstest]
#[tokio::test]
async fn users_is_admin_only(harness: Harness) {
    harness.login("asha@example.edu", "student-pass").await;
    let err = harness.run(Command::Users).await.expect_err("students denied");
    assert_eq!(err.to_string(), "Access denied");

    harness.login("warden@example.edu", "admin-pass").await;
    let out = harness.run(Command::Users).await.expect("admins allowed");
    assert_eq!(out.lines().count(), 2);
}

#[rstest]
#[tokio::test]
async fn revoked_session_is_cleared(harness: Harness) {
    harness.login("asha@example.edu", "student-pass").await;
    harness.api.revoke_tokens();

    let mut out = Vec::new();
    let err = run(Command::Whoami, &harness.ctx, &mut out)
        .await
        .expect_err("expired");
    assert!(matches!(err, CliError::SessionExpired { .. }));
    assert_eq!(String::from_utf8(out).expect("utf-8 output"), "Invalid credentials\n");
    assert!(harness.store.current().is_none());
    assert_eq!(harness.store.clear_count(), 1);
}

#[rstest]
#[tokio::test]
async fn register_prints_notice(harness: Harness) {
    let out = harness
        .run(Command::Register(RegisterArgs {
            name: "Ravi".to_owned(),
            email: "ravi@example.edu".to_owned(),
            roll_number: "22EE001".to_owned(),
            password: "pw".to_owned(),
            hostel: Some("diamond".to_owned()),
            room_number: None,
        }))
        .await
        .expect("register");
    assert_eq!(out, "Registration successful! Please login.\n");
}

#[rstest]
#[tokio::test]
async fn withdraw_and_logout(harness: Harness) {
    harness.login("asha@example.edu", "student-pass").await;
    let out = harness
        .run(Command::Complaints(ComplaintCommand::Withdraw {
            id: ComplaintId::new(7),
        }))
        .await
        .expect("withdraw");
    assert_eq!(out, "Withdrew complaint #7.\n");
    assert!(harness.api.stored_complaints().is_empty());

    assert_eq!(harness.run(Command::Logout).await.expect("logout"), "Logged out.\n");
    assert!(harness.store.current().is_none());
}
