//! Identity extractors.
//!
//! [`AuthUser`] gates privileged routes: missing or invalid credentials
//! reject with a redirect to the login form, carrying the original URI in
//! the `next` query parameter. [`OptionalAuthUser`] never rejects.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
    RequestPartsExt,
};
use axum_extra::{
    extract::cookie::CookieJar,
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use uuid::Uuid;

use crate::auth::jwt;
use crate::config::settings::Settings;

pub const SESSION_COOKIE: &str = "session";

/// The authenticated requester.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub id: Uuid,
}

/// Rejection for unauthenticated access to a privileged route.
pub struct LoginRedirect(String);

impl IntoResponse for LoginRedirect {
    fn into_response(self) -> Response {
        Redirect::to(&self.0).into_response()
    }
}

/// `/auth/login?next=<uri>` with the original URI form-encoded.
pub fn login_redirect_target(uri: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(uri.as_bytes()).collect();
    format!("/auth/login?next={encoded}")
}

/// Session token from the cookie, falling back to a Bearer header.
async fn session_token(parts: &mut Parts) -> Option<String> {
    let jar = CookieJar::from_request_parts(parts, &()).await.ok()?;
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        return Some(cookie.value().to_string());
    }

    let TypedHeader(Authorization(bearer)) = parts
        .extract::<TypedHeader<Authorization<Bearer>>>()
        .await
        .ok()?;
    Some(bearer.token().to_string())
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    Settings: FromRef<S>,
{
    type Rejection = LoginRedirect;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let settings = Settings::from_ref(state);
        let token = session_token(parts).await;

        match token.and_then(|t| {
            jwt::decode_token(&t, &settings.jwt_secret)
                .map_err(|e| tracing::warn!(error = %e, "invalid session token"))
                .ok()
        }) {
            Some(claims) => Ok(AuthUser { id: claims.sub }),
            None => Err(LoginRedirect(login_redirect_target(&parts.uri.to_string()))),
        }
    }
}

/// Identity when present; anonymous requests yield `None`.
#[derive(Debug, Clone, Copy)]
pub struct OptionalAuthUser(pub Option<AuthUser>);

#[async_trait]
impl<S> FromRequestParts<S> for OptionalAuthUser
where
    S: Send + Sync,
    Settings: FromRef<S>,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let settings = Settings::from_ref(state);
        let user = match session_token(parts).await {
            Some(token) => jwt::decode_token(&token, &settings.jwt_secret)
                .ok()
                .map(|claims| AuthUser { id: claims.sub }),
            None => None,
        };
        Ok(OptionalAuthUser(user))
    }
}
