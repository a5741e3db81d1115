//! Shared helpers for the integration suites: app construction and a
//! tiny HTTP client over `tower::ServiceExt::oneshot`.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use postboard::{config::settings::Settings, create_app, AppState};

/// Small page size so pagination boundaries are cheap to reach.
pub const PAGE_SIZE: i64 = 3;

pub fn test_state(pool: PgPool) -> AppState {
    let settings = Settings {
        port: 0,
        addr: SocketAddr::from(([127, 0, 0, 1], 0)),
        database_url: String::new(),
        jwt_secret: "test-secret".to_string(),
        page_size: PAGE_SIZE,
        home_cache_ttl: Duration::from_secs(60),
        media_root: std::env::temp_dir().join("postboard-test-media"),
    };
    AppState::new(pool, settings)
}

pub fn test_app(pool: PgPool) -> Router {
    create_app(test_state(pool))
}

pub async fn get(app: &Router, uri: &str, token: Option<&str>) -> Response {
    send(app, "GET", uri, token, None, Body::empty()).await
}

pub async fn post_form(app: &Router, uri: &str, token: Option<&str>, body: &str) -> Response {
    send(
        app,
        "POST",
        uri,
        token,
        Some("application/x-www-form-urlencoded".to_string()),
        Body::from(body.to_string()),
    )
    .await
}

pub async fn post_multipart(
    app: &Router,
    uri: &str,
    token: Option<&str>,
    fields: &[(&str, &str)],
    image: Option<(&str, &[u8])>,
) -> Response {
    let (content_type, body) = multipart_body(fields, image);
    send(app, "POST", uri, token, Some(content_type), Body::from(body)).await
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    content_type: Option<String>,
    body: Body,
) -> Response {
    use tower::ServiceExt;

    let mut request = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        request = request.header(header::COOKIE, format!("session={token}"));
    }
    if let Some(content_type) = content_type {
        request = request.header(header::CONTENT_TYPE, content_type);
    }

    app.clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap()
}

pub fn multipart_body(fields: &[(&str, &str)], image: Option<(&str, &[u8])>) -> (String, Vec<u8>) {
    const BOUNDARY: &str = "test-boundary-7MA4YWxkTrZu0gW";

    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((file_name, data)) = image {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    (format!("multipart/form-data; boundary={BOUNDARY}"), body)
}

pub async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn location(response: &Response) -> &str {
    response.headers()[header::LOCATION].to_str().unwrap()
}

/// Registers a user and returns their session token.
pub async fn signup(app: &Router, username: &str) -> String {
    let body = format!("username={username}&email={username}%40example.com&password=correct-horse9");
    let response = post_form(app, "/auth/signup", None, &body).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = json_body(response).await;
    json["data"]["token"].as_str().unwrap().to_string()
}

/// Creates a group through the API and returns its (id, slug).
pub async fn create_group(app: &Router, token: &str, title: &str) -> (Uuid, String) {
    let response = post_form(app, "/group", Some(token), &format!("title={title}")).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = json_body(response).await;
    (
        json["data"]["id"].as_str().unwrap().parse().unwrap(),
        json["data"]["slug"].as_str().unwrap().to_string(),
    )
}

/// Publishes a post through the API; the redirect confirms success.
pub async fn create_post(app: &Router, token: &str, text: &str, group: Option<Uuid>) {
    let group_field = group.map(|id| id.to_string());
    let mut fields = vec![("text", text)];
    if let Some(id) = group_field.as_deref() {
        fields.push(("group", id));
    }

    let response = post_multipart(app, "/create", Some(token), &fields, None).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}

/// Texts of the posts on a feed page, in listing order.
pub fn page_texts(context: &Value) -> Vec<String> {
    context["data"]["posts"]["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|post| post["text"].as_str().unwrap().to_string())
        .collect()
}
