use std::sync::Arc;

use axum::{
    extract::{rejection::PathRejection, Multipart, Path, Query, State},
    http::Uri,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::{
    auth::extractor::{AuthUser, OptionalAuthUser},
    cache::TtlCache,
    comments::CommentResponse,
    config::settings::Settings,
    error::AppError,
    groups::GroupResponse,
    media,
    pagination::{Page, PageParams, Paginator},
    posts::{
        FeedContext, PostDetailContext, PostFormContext, PostInput, PostResponse, ProfileContext,
        UploadedImage,
    },
    repo::{CommentRepo, FollowRepo, GroupRepo, PostRepo, UserRepo},
    response::ApiResponse,
};

/// GET / — the home feed.
///
/// Served through the process-wide TTL cache keyed by path+query: within
/// the expiry window new and deleted posts are not visible here.
pub async fn home(
    State(pool): State<PgPool>,
    State(settings): State<Settings>,
    State(cache): State<Arc<TtlCache>>,
    uri: Uri,
    Query(params): Query<PageParams>,
) -> Result<Response, AppError> {
    let key = uri.to_string();
    if let Some(cached) = cache.get(&key) {
        return Ok(Json(cached).into_response());
    }

    let posts = PostRepo::new(&pool);
    let total = posts.count_all().await?;
    let spec = Paginator::new(settings.page_size).locate(total, params.number());
    let rows = posts.list_all(spec.limit, spec.offset).await?;

    let context = FeedContext {
        posts: Page::assemble(rows.into_iter().map(PostResponse::from).collect(), &spec),
    };
    let body = serde_json::to_value(ApiResponse::success(context))
        .map_err(|_| AppError::InternalServerError)?;
    cache.insert(key, body.clone());

    Ok(Json(body).into_response())
}

/// GET /profile/:username — the author's feed plus follow state.
pub async fn profile(
    State(pool): State<PgPool>,
    State(settings): State<Settings>,
    OptionalAuthUser(viewer): OptionalAuthUser,
    Path(username): Path<String>,
    Query(params): Query<PageParams>,
) -> Result<impl IntoResponse, AppError> {
    let author = UserRepo::new(&pool)
        .by_username(&username)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let posts = PostRepo::new(&pool);
    let total = posts.count_by_author(author.id).await?;
    let spec = Paginator::new(settings.page_size).locate(total, params.number());
    let rows = posts.list_by_author(author.id, spec.limit, spec.offset).await?;

    let following = match viewer {
        Some(viewer) if viewer.id != author.id => {
            FollowRepo::new(&pool).exists(viewer.id, author.id).await?
        }
        _ => false,
    };

    Ok(ApiResponse::success(ProfileContext {
        author: author.into(),
        following,
        posts: Page::assemble(rows.into_iter().map(PostResponse::from).collect(), &spec),
    }))
}

/// GET /posts/:id — post, comments, and whether the viewer may edit.
pub async fn post_detail(
    State(pool): State<PgPool>,
    OptionalAuthUser(viewer): OptionalAuthUser,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = post_id(id)?;
    let row = PostRepo::new(&pool)
        .get_row(id)
        .await?
        .ok_or_else(post_not_found)?;
    let comments = CommentRepo::new(&pool).for_post(id).await?;
    let can_edit = viewer.is_some_and(|viewer| viewer.id == row.author_id);

    Ok(ApiResponse::success(PostDetailContext {
        post: row.into(),
        comments: comments.into_iter().map(CommentResponse::from).collect(),
        can_edit,
    }))
}

/// GET /create — form context.
pub async fn create_form(
    State(pool): State<PgPool>,
    _user: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    Ok(ApiResponse::success(PostFormContext {
        groups: group_choices(&pool).await?,
        post: None,
    }))
}

/// POST /create — publish a post, then land on the author's profile.
pub async fn post_create(
    State(pool): State<PgPool>,
    State(settings): State<Settings>,
    user: AuthUser,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let input = read_post_form(multipart).await?;
    input
        .validate()
        .map_err(|e| AppError::UnprocessableEntity(e.to_string()))?;
    check_group_choice(&pool, input.group_id).await?;

    let image = store_image(&settings, input.image.as_ref()).await?;
    let author = UserRepo::new(&pool)
        .by_id(user.id)
        .await?
        .ok_or(AppError::Unauthorized)?;

    PostRepo::new(&pool)
        .create(author.id, &input.text, input.group_id, image.as_deref())
        .await?;

    Ok(Redirect::to(&format!("/profile/{}", author.username)))
}

/// GET /posts/:id/edit — form context with the current values.
///
/// Anyone but the author is silently bounced to the detail view.
pub async fn edit_form(
    State(pool): State<PgPool>,
    user: AuthUser,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Response, AppError> {
    let id = post_id(id)?;
    let row = PostRepo::new(&pool)
        .get_row(id)
        .await?
        .ok_or_else(post_not_found)?;
    if row.author_id != user.id {
        return Ok(Redirect::to(&format!("/posts/{id}")).into_response());
    }

    Ok(ApiResponse::success(PostFormContext {
        groups: group_choices(&pool).await?,
        post: Some(row.into()),
    })
    .into_response())
}

/// POST /posts/:id/edit
pub async fn post_edit(
    State(pool): State<PgPool>,
    State(settings): State<Settings>,
    user: AuthUser,
    id: Result<Path<Uuid>, PathRejection>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let id = post_id(id)?;
    let post = PostRepo::new(&pool)
        .get(id)
        .await?
        .ok_or_else(post_not_found)?;
    if post.author_id != user.id {
        return Ok(Redirect::to(&format!("/posts/{id}")).into_response());
    }

    let input = read_post_form(multipart).await?;
    input
        .validate()
        .map_err(|e| AppError::UnprocessableEntity(e.to_string()))?;
    check_group_choice(&pool, input.group_id).await?;

    let image = store_image(&settings, input.image.as_ref()).await?;
    PostRepo::new(&pool)
        .update(id, &input.text, input.group_id, image.as_deref())
        .await?;

    Ok(Redirect::to(&format!("/posts/{id}")).into_response())
}

/// POST /posts/:id/delete — owner only; lands back on the profile.
pub async fn post_delete(
    State(pool): State<PgPool>,
    user: AuthUser,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Response, AppError> {
    let id = post_id(id)?;
    let post = PostRepo::new(&pool)
        .get(id)
        .await?
        .ok_or_else(post_not_found)?;
    if post.author_id != user.id {
        return Ok(Redirect::to(&format!("/posts/{id}")).into_response());
    }

    let author = UserRepo::new(&pool)
        .by_id(user.id)
        .await?
        .ok_or(AppError::Unauthorized)?;
    PostRepo::new(&pool).delete(id).await?;

    Ok(Redirect::to(&format!("/profile/{}", author.username)).into_response())
}

/// An unparsable id gets the same 404 as an unknown one.
fn post_id(id: Result<Path<Uuid>, PathRejection>) -> Result<Uuid, AppError> {
    id.map(|Path(id)| id).map_err(|_| post_not_found())
}

fn post_not_found() -> AppError {
    AppError::NotFound("Post not found".to_string())
}

async fn group_choices(pool: &PgPool) -> Result<Vec<GroupResponse>, AppError> {
    let groups = GroupRepo::new(pool).all().await?;
    Ok(groups.into_iter().map(GroupResponse::from).collect())
}

/// A submitted group id must name an existing group, like any other
/// invalid form choice.
async fn check_group_choice(pool: &PgPool, group_id: Option<Uuid>) -> Result<(), AppError> {
    if let Some(group_id) = group_id {
        GroupRepo::new(pool)
            .by_id(group_id)
            .await?
            .ok_or_else(|| AppError::UnprocessableEntity("group: unknown group".to_string()))?;
    }
    Ok(())
}

async fn store_image(
    settings: &Settings,
    image: Option<&UploadedImage>,
) -> Result<Option<String>, AppError> {
    match image {
        Some(upload) => Ok(Some(
            media::save_post_image(&settings.media_root, &upload.file_name, &upload.data).await?,
        )),
        None => Ok(None),
    }
}

fn bad_form<E>(_: E) -> AppError {
    AppError::BadRequest("Malformed form data".to_string())
}

async fn read_post_form(mut multipart: Multipart) -> Result<PostInput, AppError> {
    let mut input = PostInput::default();

    while let Some(field) = multipart.next_field().await.map_err(bad_form)? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("text") => input.text = field.text().await.map_err(bad_form)?,
            Some("group") => {
                let raw = field.text().await.map_err(bad_form)?;
                if !raw.is_empty() {
                    input.group_id = Some(raw.parse().map_err(|_| {
                        AppError::UnprocessableEntity("group: invalid group id".to_string())
                    })?);
                }
            }
            Some("image") => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let data = field.bytes().await.map_err(bad_form)?;
                if !data.is_empty() {
                    input.image = Some(UploadedImage { file_name, data });
                }
            }
            _ => {}
        }
    }

    Ok(input)
}
