use axum::{
    extract::{rejection::PathRejection, Path, State},
    response::{IntoResponse, Redirect},
    Form,
};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::{
    auth::extractor::AuthUser,
    comments::CreateComment,
    error::AppError,
    repo::{CommentRepo, PostRepo},
};

/// POST /posts/:id/comment — append a comment, back to the detail view.
pub async fn add_comment(
    State(pool): State<PgPool>,
    user: AuthUser,
    id: Result<Path<Uuid>, PathRejection>,
    Form(payload): Form<CreateComment>,
) -> Result<impl IntoResponse, AppError> {
    let post_id = id
        .map(|Path(id)| id)
        .map_err(|_| AppError::NotFound("Post not found".to_string()))?;

    payload
        .validate()
        .map_err(|e| AppError::UnprocessableEntity(e.to_string()))?;

    PostRepo::new(&pool)
        .get(post_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

    CommentRepo::new(&pool)
        .create(post_id, user.id, &payload.text)
        .await?;

    Ok(Redirect::to(&format!("/posts/{post_id}")))
}
