use axum::body::Bytes;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::auth::UserResponse;
use crate::comments::CommentResponse;
use crate::groups::GroupResponse;
use crate::pagination::Page;

pub mod handler;

/// A post row as stored.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    pub id: Uuid,
    pub text: String,
    pub image: Option<String>,
    pub author_id: Uuid,
    pub group_id: Option<Uuid>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Fields collected from the create/edit multipart form.
#[derive(Debug, Default, Validate)]
pub struct PostInput {
    #[validate(length(min = 1, message = "Text cannot be empty"))]
    pub text: String,
    pub group_id: Option<Uuid>,
    pub image: Option<UploadedImage>,
}

#[derive(Debug)]
pub struct UploadedImage {
    pub file_name: String,
    pub data: Bytes,
}

#[derive(Debug, Serialize)]
pub struct PostAuthor {
    pub id: Uuid,
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct PostResponse {
    pub id: Uuid,
    pub text: String,
    pub author: PostAuthor,
    pub group: Option<GroupResponse>,
    pub image: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Context for the home and follow feeds.
#[derive(Debug, Serialize)]
pub struct FeedContext {
    pub posts: Page<PostResponse>,
}

/// Context for the detail view, comment form included.
#[derive(Debug, Serialize)]
pub struct PostDetailContext {
    pub post: PostResponse,
    pub comments: Vec<CommentResponse>,
    pub can_edit: bool,
}

/// Context for the create/edit form: group choices, plus the current
/// values when editing.
#[derive(Debug, Serialize)]
pub struct PostFormContext {
    pub groups: Vec<GroupResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post: Option<PostResponse>,
}

/// Context for an author's profile feed.
#[derive(Debug, Serialize)]
pub struct ProfileContext {
    pub author: UserResponse,
    pub following: bool,
    pub posts: Page<PostResponse>,
}
