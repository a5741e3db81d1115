//! Pagination behavior and the home-listing cache window.

mod common;

use axum::http::StatusCode;
use sqlx::PgPool;

use common::{create_post, get, json_body, page_texts, signup, test_app, test_state, PAGE_SIZE};
use postboard::create_app;

#[sqlx::test]
async fn pages_are_fixed_size_with_a_remainder_tail(pool: PgPool) {
    let app = test_app(pool);
    let token = signup(&app, "alice").await;
    for n in 1..=7 {
        create_post(&app, &token, &format!("post {n}"), None).await;
    }

    let first = json_body(get(&app, "/?page=1", None).await).await;
    let posts = &first["data"]["posts"];
    assert_eq!(page_texts(&first), ["post 7", "post 6", "post 5"]);
    assert_eq!(posts["number"], 1);
    assert_eq!(posts["total_items"], 7);
    assert_eq!(posts["total_pages"], 3);
    assert_eq!(posts["has_next"], true);
    assert_eq!(posts["has_previous"], false);

    let last = json_body(get(&app, "/?page=3", None).await).await;
    assert_eq!(page_texts(&last), ["post 1"]);
    assert_eq!(last["data"]["posts"]["has_next"], false);
    assert_eq!(last["data"]["posts"]["has_previous"], true);

    assert_eq!(PAGE_SIZE, 3);
}

#[sqlx::test]
async fn out_of_range_pages_serve_the_last_page(pool: PgPool) {
    let app = test_app(pool);
    let token = signup(&app, "alice").await;
    for n in 1..=7 {
        create_post(&app, &token, &format!("post {n}"), None).await;
    }

    let beyond = json_body(get(&app, "/?page=99", None).await).await;
    assert_eq!(page_texts(&beyond), ["post 1"]);
    assert_eq!(beyond["data"]["posts"]["number"], 3);
}

#[sqlx::test]
async fn garbage_page_numbers_serve_the_first_page(pool: PgPool) {
    let app = test_app(pool);
    let token = signup(&app, "alice").await;
    for n in 1..=7 {
        create_post(&app, &token, &format!("post {n}"), None).await;
    }

    let garbage = json_body(get(&app, "/?page=abc", None).await).await;
    assert_eq!(page_texts(&garbage), ["post 7", "post 6", "post 5"]);
    assert_eq!(garbage["data"]["posts"]["number"], 1);
}

#[sqlx::test]
async fn profile_listings_paginate_too(pool: PgPool) {
    let app = test_app(pool);
    let token = signup(&app, "alice").await;
    for n in 1..=4 {
        create_post(&app, &token, &format!("post {n}"), None).await;
    }

    let first = json_body(get(&app, "/profile/alice", None).await).await;
    assert_eq!(page_texts(&first), ["post 4", "post 3", "post 2"]);

    let second = json_body(get(&app, "/profile/alice?page=2", None).await).await;
    assert_eq!(page_texts(&second), ["post 1"]);
}

#[sqlx::test]
async fn the_home_listing_stays_stale_until_the_cache_clears(pool: PgPool) {
    let state = test_state(pool);
    let cache = state.home_cache.clone();
    let app = create_app(state);
    let token = signup(&app, "alice").await;

    create_post(&app, &token, "keep me", None).await;
    create_post(&app, &token, "delete me", None).await;

    let before = json_body(get(&app, "/", None).await).await;
    assert_eq!(page_texts(&before), ["delete me", "keep me"]);

    // delete the newest post; the cached home listing must not notice
    let profile = json_body(get(&app, "/profile/alice", None).await).await;
    let doomed = profile["data"]["posts"]["items"][0]["id"].as_str().unwrap();
    let response = common::post_form(
        &app,
        &format!("/posts/{doomed}/delete"),
        Some(&token),
        "",
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let stale = json_body(get(&app, "/", None).await).await;
    assert_eq!(stale, before);

    // the uncached profile listing already reflects the deletion
    let profile = json_body(get(&app, "/profile/alice", None).await).await;
    assert_eq!(page_texts(&profile), ["keep me"]);

    cache.clear();
    let fresh = json_body(get(&app, "/", None).await).await;
    assert_eq!(page_texts(&fresh), ["keep me"]);
}

#[sqlx::test]
async fn only_the_owner_may_delete_a_post(pool: PgPool) {
    let app = test_app(pool.clone());
    let alice = signup(&app, "alice").await;
    let bob = signup(&app, "bob").await;
    create_post(&app, &alice, "alice writes", None).await;

    let profile = json_body(get(&app, "/profile/alice", None).await).await;
    let post_id = profile["data"]["posts"]["items"][0]["id"].as_str().unwrap().to_string();

    let response = common::post_form(
        &app,
        &format!("/posts/{post_id}/delete"),
        Some(&bob),
        "",
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(common::location(&response), format!("/posts/{post_id}"));

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}
