use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::Deserialize;
use serde_json::json;
use sqlx::PgPool;
use validator::Validate;

use crate::{
    auth::{
        extractor::{AuthUser, SESSION_COOKIE},
        jwt, utils, AuthResponse, LoginUser, RegisterUser, UserResponse,
    },
    config::settings::Settings,
    error::AppError,
    repo::UserRepo,
    response::ApiResponse,
};

#[derive(Debug, Deserialize)]
pub struct LoginFormQuery {
    pub next: Option<String>,
}

/// GET /auth/login — form context; echoes the return path back so the
/// presentation layer can thread it through the form.
pub async fn login_form(Query(query): Query<LoginFormQuery>) -> impl IntoResponse {
    ApiResponse::success(json!({ "next": query.next }))
}

pub async fn signup(
    State(pool): State<PgPool>,
    State(settings): State<Settings>,
    jar: CookieJar,
    Form(payload): Form<RegisterUser>,
) -> Result<impl IntoResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::UnprocessableEntity(e.to_string()))?;

    let password_hash =
        utils::hash_password(&payload.password).map_err(|_| AppError::InternalServerError)?;

    let user = UserRepo::new(&pool)
        .create(&payload.username, &payload.email, &password_hash)
        .await?;

    let token = jwt::create_token(user.id, &settings.jwt_secret)
        .map_err(|_| AppError::InternalServerError)?;
    let jar = jar.add(session_cookie(token.clone()));

    Ok((
        jar,
        ApiResponse::success(AuthResponse {
            token,
            user: UserResponse::from(user),
        })
        .created(),
    ))
}

pub async fn login(
    State(pool): State<PgPool>,
    State(settings): State<Settings>,
    jar: CookieJar,
    Form(payload): Form<LoginUser>,
) -> Result<Response, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::UnprocessableEntity(e.to_string()))?;

    let user = UserRepo::new(&pool)
        .by_username(&payload.username)
        .await?
        .ok_or(AppError::Unauthorized)?;

    utils::verify_password(&user.password_hash, &payload.password)
        .map_err(|_| AppError::Unauthorized)?;

    let token = jwt::create_token(user.id, &settings.jwt_secret)
        .map_err(|_| AppError::InternalServerError)?;
    let jar = jar.add(session_cookie(token.clone()));

    if let Some(next) = payload.next.as_deref().filter(|n| is_safe_next(n)) {
        return Ok((jar, Redirect::to(next)).into_response());
    }

    Ok((
        jar,
        ApiResponse::success(AuthResponse {
            token,
            user: UserResponse::from(user),
        }),
    )
        .into_response())
}

pub async fn logout(jar: CookieJar) -> impl IntoResponse {
    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/").build());
    (jar, Redirect::to("/"))
}

pub async fn me(
    State(pool): State<PgPool>,
    user: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let user = UserRepo::new(&pool)
        .by_id(user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(ApiResponse::success(UserResponse::from(user)))
}

fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .build()
}

/// Same-origin paths only; anything else would be an open redirect.
fn is_safe_next(next: &str) -> bool {
    next.starts_with('/') && !next.starts_with("//")
}
