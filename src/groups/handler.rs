use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Form,
};
use sqlx::PgPool;
use validator::Validate;

use crate::{
    auth::extractor::AuthUser,
    config::settings::Settings,
    error::AppError,
    groups::{CreateGroup, GroupFeedContext, GroupResponse},
    pagination::{Page, PageParams, Paginator},
    posts::PostResponse,
    repo::{GroupRepo, PostRepo},
    response::ApiResponse,
};

/// GET /group — every group, for navigation and the post form's choices.
pub async fn list_groups(State(pool): State<PgPool>) -> Result<impl IntoResponse, AppError> {
    let groups = GroupRepo::new(&pool).all().await?;
    Ok(ApiResponse::success(
        groups
            .into_iter()
            .map(GroupResponse::from)
            .collect::<Vec<_>>(),
    ))
}

/// POST /group
pub async fn create_group(
    State(pool): State<PgPool>,
    _user: AuthUser,
    Form(payload): Form<CreateGroup>,
) -> Result<impl IntoResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::UnprocessableEntity(e.to_string()))?;

    let group = GroupRepo::new(&pool)
        .create(&payload.title, &payload.description)
        .await?;

    Ok(ApiResponse::success(GroupResponse::from(group)).created())
}

/// GET /group/:slug — the group's feed, newest first.
pub async fn group_posts(
    State(pool): State<PgPool>,
    State(settings): State<Settings>,
    Path(slug): Path<String>,
    Query(params): Query<PageParams>,
) -> Result<impl IntoResponse, AppError> {
    let group = GroupRepo::new(&pool)
        .by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound("Group not found".to_string()))?;

    let posts = PostRepo::new(&pool);
    let total = posts.count_by_group(group.id).await?;
    let spec = Paginator::new(settings.page_size).locate(total, params.number());
    let rows = posts.list_by_group(group.id, spec.limit, spec.offset).await?;

    Ok(ApiResponse::success(GroupFeedContext {
        group: GroupResponse::from(group),
        posts: Page::assemble(rows.into_iter().map(PostResponse::from).collect(), &spec),
    }))
}
