use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect},
};
use sqlx::PgPool;

use crate::{
    auth::extractor::AuthUser,
    config::settings::Settings,
    error::AppError,
    pagination::{Page, PageParams, Paginator},
    posts::{FeedContext, PostResponse},
    repo::{FollowRepo, PostRepo, UserRepo},
    response::ApiResponse,
};

/// GET /profile/:username/follow
///
/// Idempotent; following yourself is a silent no-op.
pub async fn profile_follow(
    State(pool): State<PgPool>,
    user: AuthUser,
    Path(username): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let author = UserRepo::new(&pool)
        .by_username(&username)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    if author.id != user.id {
        FollowRepo::new(&pool).create(user.id, author.id).await?;
    }

    Ok(Redirect::to(&format!("/profile/{username}")))
}

/// GET /profile/:username/unfollow
pub async fn profile_unfollow(
    State(pool): State<PgPool>,
    user: AuthUser,
    Path(username): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let author = UserRepo::new(&pool)
        .by_username(&username)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    if author.id != user.id {
        FollowRepo::new(&pool).delete(user.id, author.id).await?;
    }

    Ok(Redirect::to(&format!("/profile/{username}")))
}

/// GET /follow — posts from the authors the requester follows.
pub async fn follow_index(
    State(pool): State<PgPool>,
    State(settings): State<Settings>,
    user: AuthUser,
    Query(params): Query<PageParams>,
) -> Result<impl IntoResponse, AppError> {
    let posts = PostRepo::new(&pool);
    let total = posts.count_followed_by(user.id).await?;
    let spec = Paginator::new(settings.page_size).locate(total, params.number());
    let rows = posts.list_followed_by(user.id, spec.limit, spec.offset).await?;

    Ok(ApiResponse::success(FeedContext {
        posts: Page::assemble(rows.into_iter().map(PostResponse::from).collect(), &spec),
    }))
}
