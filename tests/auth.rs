//! Signup, login, and the redirect-to-login flow for privileged routes.

mod common;

use axum::http::StatusCode;
use sqlx::PgPool;

use common::{get, json_body, location, post_form, signup, test_app};

#[sqlx::test]
async fn signup_issues_a_working_session(pool: PgPool) {
    let app = test_app(pool);
    let token = signup(&app, "alice").await;

    let response = get(&app, "/auth/me", Some(&token)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["data"]["username"], "alice");
    assert_eq!(json["data"]["email"], "alice@example.com");
}

#[sqlx::test]
async fn duplicate_username_conflicts(pool: PgPool) {
    let app = test_app(pool);
    signup(&app, "alice").await;

    let response = post_form(
        &app,
        "/auth/signup",
        None,
        "username=alice&email=other%40example.com&password=correct-horse9",
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test]
async fn short_password_is_rejected(pool: PgPool) {
    let app = test_app(pool);

    let response = post_form(
        &app,
        "/auth/signup",
        None,
        "username=alice&email=alice%40example.com&password=short",
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[sqlx::test]
async fn login_rejects_a_wrong_password(pool: PgPool) {
    let app = test_app(pool);
    signup(&app, "alice").await;

    let response = post_form(
        &app,
        "/auth/login",
        None,
        "username=alice&password=wrong-horse",
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = post_form(
        &app,
        "/auth/login",
        None,
        "username=nobody&password=correct-horse9",
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test]
async fn login_follows_the_return_path(pool: PgPool) {
    let app = test_app(pool);
    signup(&app, "alice").await;

    let response = post_form(
        &app,
        "/auth/login",
        None,
        "username=alice&password=correct-horse9&next=%2Fcreate",
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/create");
}

#[sqlx::test]
async fn login_ignores_an_offsite_return_path(pool: PgPool) {
    let app = test_app(pool);
    signup(&app, "alice").await;

    let response = post_form(
        &app,
        "/auth/login",
        None,
        "username=alice&password=correct-horse9&next=https%3A%2F%2Fevil.example",
    )
    .await;
    // no redirect, just the token envelope
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test]
async fn privileged_routes_redirect_anonymous_users_to_login(pool: PgPool) {
    let app = test_app(pool);

    let response = get(&app, "/create", None).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/auth/login?next=%2Fcreate");

    let response = get(&app, "/follow", None).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/auth/login?next=%2Ffollow");
}

#[sqlx::test]
async fn login_form_echoes_the_return_path(pool: PgPool) {
    let app = test_app(pool);

    let response = get(&app, "/auth/login?next=%2Fcreate", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["data"]["next"], "/create");
}

#[sqlx::test]
async fn logout_clears_the_session_cookie(pool: PgPool) {
    let app = test_app(pool);
    let token = signup(&app, "alice").await;

    let response = post_form(&app, "/auth/logout", Some(&token), "").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");

    let set_cookie = response.headers()["set-cookie"].to_str().unwrap();
    assert!(set_cookie.starts_with("session="));
}

#[sqlx::test]
async fn unknown_paths_are_404(pool: PgPool) {
    let app = test_app(pool);

    let response = get(&app, "/no/such/page", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = json_body(response).await;
    assert_eq!(json["success"], false);
}
