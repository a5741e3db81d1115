use std::sync::Arc;

use axum::{
    extract::FromRef,
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use tower_http::trace::TraceLayer;

pub mod auth;
pub mod cache;
pub mod comments;
pub mod config;
pub mod error;
pub mod follows;
pub mod groups;
pub mod media;
pub mod pagination;
pub mod posts;
pub mod repo;
pub mod response;

use cache::TtlCache;
use config::settings::Settings;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub settings: Settings,
    pub home_cache: Arc<TtlCache>,
}

impl AppState {
    pub fn new(pool: PgPool, settings: Settings) -> Self {
        let home_cache = Arc::new(TtlCache::new(settings.home_cache_ttl));
        Self {
            pool,
            settings,
            home_cache,
        }
    }
}

impl FromRef<AppState> for PgPool {
    fn from_ref(app_state: &AppState) -> PgPool {
        app_state.pool.clone()
    }
}

impl FromRef<AppState> for Settings {
    fn from_ref(app_state: &AppState) -> Settings {
        app_state.settings.clone()
    }
}

impl FromRef<AppState> for Arc<TtlCache> {
    fn from_ref(app_state: &AppState) -> Arc<TtlCache> {
        app_state.home_cache.clone()
    }
}

/// Assembles the full application router.
///
/// Exported so integration tests can drive the router directly.
pub fn create_app(state: AppState) -> Router {
    let auth_router = Router::new()
        .route("/signup", post(auth::handler::signup))
        .route(
            "/login",
            get(auth::handler::login_form).post(auth::handler::login),
        )
        .route("/logout", post(auth::handler::logout))
        .route("/me", get(auth::handler::me));

    Router::new()
        .route("/", get(posts::handler::home))
        .route(
            "/group",
            get(groups::handler::list_groups).post(groups::handler::create_group),
        )
        .route("/group/:slug", get(groups::handler::group_posts))
        .route("/profile/:username", get(posts::handler::profile))
        .route(
            "/profile/:username/follow",
            get(follows::handler::profile_follow),
        )
        .route(
            "/profile/:username/unfollow",
            get(follows::handler::profile_unfollow),
        )
        .route("/posts/:id", get(posts::handler::post_detail))
        .route(
            "/posts/:id/edit",
            get(posts::handler::edit_form).post(posts::handler::post_edit),
        )
        .route("/posts/:id/comment", post(comments::handler::add_comment))
        .route("/posts/:id/delete", post(posts::handler::post_delete))
        .route(
            "/create",
            get(posts::handler::create_form).post(posts::handler::post_create),
        )
        .route("/follow", get(follows::handler::follow_index))
        .nest("/auth", auth_router)
        .fallback(error::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
