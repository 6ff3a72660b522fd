mod common;

use client::session::{REFRESH_TOKEN_KEY, TOKEN_KEY, TokenStorage};
use hyper::{Method, StatusCode};
use serde_json::json;
use shared::types::LoginData;

use common::{Harness, Reply, login_payload, ok};

fn alice() -> LoginData {
    LoginData::new("alice", "correct horse")
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

#[tokio::test]
async fn successful_login_installs_tokens_and_profile() {
    let h = Harness::new();
    h.server.on(Method::POST, "/users/auth/login/", ok(login_payload("tester")));

    let outcome = h.ctx.store.do_login(&alice()).await;

    assert!(outcome.success);
    assert!(outcome.message.is_none());
    assert_eq!(h.ctx.session.access_token(), "access-1");
    assert_eq!(h.storage.get(TOKEN_KEY).as_deref(), Some("access-1"));
    assert_eq!(h.storage.get(REFRESH_TOKEN_KEY).as_deref(), Some("refresh-1"));
    assert_eq!(h.ctx.session.user_role(), "tester");
    assert_eq!(h.ctx.session.user_name(), "alice");
    assert!(!h.ctx.store.is_admin());
    assert!(h.ctx.store.has_role(&["tester", "reviewer"]));

    let sent = h.server.last_request();
    assert_eq!(sent.json(), json!({"username": "alice", "password": "correct horse"}));
    assert!(sent.bearer().is_none());
}

#[tokio::test]
async fn later_requests_carry_the_new_token() {
    let h = Harness::new();
    h.server
        .on(Method::POST, "/users/auth/login/", ok(login_payload("admin")))
        .on(Method::GET, "/users/departments/tree/", ok(json!([])));

    assert!(h.ctx.store.do_login(&alice()).await.success);
    client::api::user::department_tree(&h.ctx.http).await.unwrap();

    assert_eq!(h.server.last_request().bearer(), Some("Bearer access-1"));
}

#[tokio::test]
async fn rejected_envelope_keeps_the_session_unchanged() {
    let mut h = Harness::signed_in();
    h.server
        .on(
            Method::GET,
            "/users/me/",
            ok(json!({"id": 3, "username": "bob", "role": "admin"})),
        )
        .on(
            Method::POST,
            "/users/auth/login/",
            Reply::Json(StatusCode::OK, json!({"code": 401, "message": "bad credentials"})),
        );
    assert!(h.ctx.store.fetch_user_info().await);
    let before = h.ctx.session.snapshot();

    let outcome = h.ctx.store.do_login(&alice()).await;

    assert!(!outcome.success);
    assert_eq!(outcome.message.as_deref(), Some("bad credentials"));
    assert_eq!(h.ctx.session.snapshot(), before);
    assert_eq!(h.ctx.session.access_token(), "stored-token");
    assert_eq!(h.ctx.session.user_name(), "bob");
    assert_eq!(h.storage.get(TOKEN_KEY).as_deref(), Some("stored-token"));
    assert_eq!(h.storage.get(REFRESH_TOKEN_KEY).as_deref(), Some("stored-refresh"));
    assert!(h.drain_notifications().is_empty());
}

#[tokio::test]
async fn rejected_envelope_with_field_errors_reports_its_message() {
    let mut h = Harness::new();
    h.server.on(
        Method::POST,
        "/users/auth/login/",
        Reply::Json(
            StatusCode::OK,
            json!({"code": 400, "message": "bad credentials", "data": {"username": ["required"]}}),
        ),
    );

    let outcome = h.ctx.store.do_login(&alice()).await;

    assert!(!outcome.success);
    assert_eq!(outcome.message.as_deref(), Some("bad credentials"));
    assert!(!h.ctx.session.is_logged_in());
    assert!(h.storage.get(TOKEN_KEY).is_none());
    assert!(h.drain_notifications().is_empty());
}

#[tokio::test]
async fn http_failure_during_login_is_reported_as_outcome() {
    let mut h = Harness::new();
    h.server.on(
        Method::POST,
        "/users/auth/login/",
        Reply::Json(StatusCode::BAD_REQUEST, json!({"message": "Account disabled"})),
    );

    let outcome = h.ctx.store.do_login(&alice()).await;

    assert!(!outcome.success);
    assert_eq!(outcome.message.as_deref(), Some("Account disabled"));
    assert!(!h.ctx.session.is_logged_in());
    // The HTTP layer already told the user.
    assert_eq!(h.drain_notifications().len(), 1);
}

#[tokio::test]
async fn unreachable_login_fails_without_touching_storage() {
    let h = Harness::signed_in();
    h.server.on(Method::POST, "/users/auth/login/", Reply::Unreachable);

    let outcome = h.ctx.store.do_login(&alice()).await;

    assert!(!outcome.success);
    assert!(outcome.message.is_some());
    assert_eq!(h.storage.get(TOKEN_KEY).as_deref(), Some("stored-token"));
    assert_eq!(h.ctx.session.access_token(), "stored-token");
}

// ---------------------------------------------------------------------------
// Logout
// ---------------------------------------------------------------------------

#[tokio::test]
async fn logout_sends_refresh_token_and_clears() {
    let h = Harness::signed_in();
    h.server.on(Method::POST, "/users/auth/logout/", ok(json!(null)));

    h.ctx.store.do_logout().await;

    assert_eq!(
        h.server.last_request().json(),
        json!({"refresh": "stored-refresh"})
    );
    assert!(!h.ctx.session.is_logged_in());
    assert!(h.storage.get(TOKEN_KEY).is_none());
    assert!(h.storage.get(REFRESH_TOKEN_KEY).is_none());
    assert_eq!(h.ctx.router.current().path, "/login");
}

#[tokio::test]
async fn logout_clears_even_when_the_endpoint_fails() {
    let h = Harness::signed_in();
    h.server.on(
        Method::POST,
        "/users/auth/logout/",
        Reply::Json(StatusCode::INTERNAL_SERVER_ERROR, json!({"message": "boom"})),
    );

    h.ctx.store.do_logout().await;

    assert!(!h.ctx.session.is_logged_in());
    assert!(h.storage.get(TOKEN_KEY).is_none());
    assert!(h.storage.get(REFRESH_TOKEN_KEY).is_none());
    assert_eq!(h.ctx.router.current().to_string(), "/login");
}

#[tokio::test]
async fn logout_clears_when_the_backend_is_unreachable() {
    let h = Harness::signed_in();
    h.server.on(Method::POST, "/users/auth/logout/", Reply::Unreachable);

    h.ctx.store.do_logout().await;

    assert!(!h.ctx.session.is_logged_in());
    assert_eq!(h.ctx.router.current().path, "/login");
}

// ---------------------------------------------------------------------------
// Profile and reset
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fetch_user_info_fills_in_a_restored_session() {
    let h = Harness::signed_in();
    h.server.on(
        Method::GET,
        "/users/me/",
        ok(json!({"id": 3, "username": "bob", "role": "admin", "email": "bob@lab.test"})),
    );
    assert_eq!(h.ctx.session.user_role(), "");

    assert!(h.ctx.store.fetch_user_info().await);

    assert_eq!(h.ctx.session.user_name(), "bob");
    assert!(h.ctx.store.is_admin());
    assert_eq!(h.ctx.session.access_token(), "stored-token");
}

#[tokio::test]
async fn fetch_user_info_failure_changes_nothing() {
    let h = Harness::signed_in();
    h.server.on(
        Method::GET,
        "/users/me/",
        Reply::Json(StatusCode::OK, json!({"code": 500, "message": "profile service down"})),
    );

    assert!(!h.ctx.store.fetch_user_info().await);
    assert!(h.ctx.session.is_logged_in());
    assert!(h.ctx.session.snapshot().user_profile().is_none());
}

#[tokio::test]
async fn reset_state_is_idempotent() {
    let h = Harness::signed_in();
    let mut rx = h.ctx.session.subscribe();
    rx.borrow_and_update();

    h.ctx.store.reset_state();
    assert!(rx.has_changed().unwrap());
    rx.borrow_and_update();

    h.ctx.store.reset_state();
    assert!(!rx.has_changed().unwrap());
    assert!(!h.ctx.session.is_logged_in());
    assert!(h.storage.get(TOKEN_KEY).is_none());
    assert!(h.storage.get(REFRESH_TOKEN_KEY).is_none());
}
