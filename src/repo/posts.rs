use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::groups::GroupResponse;
use crate::posts::{Post, PostAuthor, PostResponse};

/// A post joined with its author and (optional) group, as listings and
/// the detail view consume it.
#[derive(Debug, sqlx::FromRow)]
pub struct PostRow {
    pub id: Uuid,
    pub text: String,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub author_id: Uuid,
    pub author_username: String,
    pub group_id: Option<Uuid>,
    pub group_title: Option<String>,
    pub group_slug: Option<String>,
    pub group_description: Option<String>,
}

impl From<PostRow> for PostResponse {
    fn from(row: PostRow) -> Self {
        let group = match (row.group_id, row.group_title, row.group_slug) {
            (Some(id), Some(title), Some(slug)) => Some(GroupResponse {
                id,
                title,
                slug,
                description: row.group_description.unwrap_or_default(),
            }),
            _ => None,
        };
        PostResponse {
            id: row.id,
            text: row.text,
            author: PostAuthor {
                id: row.author_id,
                username: row.author_username,
            },
            group,
            image: row.image,
            created_at: row.created_at,
        }
    }
}

const FEED_SELECT: &str = r#"
SELECT p.id, p.text, p.image, p.created_at,
       u.id AS author_id, u.username AS author_username,
       g.id AS group_id, g.title AS group_title,
       g.slug AS group_slug, g.description AS group_description
FROM posts p
JOIN users u ON p.author_id = u.id
LEFT JOIN groups g ON p.group_id = g.id
"#;

/// Newest first; the id tiebreak keeps pages stable for equal timestamps.
const FEED_ORDER: &str = " ORDER BY p.created_at DESC, p.id";

pub struct PostRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> PostRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// The publish time is stamped here; any client-supplied value is
    /// ignored.
    pub async fn create(
        &self,
        author_id: Uuid,
        text: &str,
        group_id: Option<Uuid>,
        image: Option<&str>,
    ) -> Result<Post, sqlx::Error> {
        let now = Utc::now();
        sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (text, image, author_id, group_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            RETURNING *
            "#,
        )
        .bind(text)
        .bind(image)
        .bind(author_id)
        .bind(group_id)
        .bind(now)
        .fetch_one(self.pool)
        .await
    }

    /// Replaces text and group; the image only when a new one was
    /// uploaded. `created_at` is never touched by edits.
    pub async fn update(
        &self,
        id: Uuid,
        text: &str,
        group_id: Option<Uuid>,
        image: Option<&str>,
    ) -> Result<Post, sqlx::Error> {
        sqlx::query_as::<_, Post>(
            r#"
            UPDATE posts
            SET text = $1, group_id = $2, image = COALESCE($3, image), updated_at = $4
            WHERE id = $5
            RETURNING *
            "#,
        )
        .bind(text)
        .bind(group_id)
        .bind(image)
        .bind(Utc::now())
        .bind(id)
        .fetch_one(self.pool)
        .await
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(())
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Post>, sqlx::Error> {
        sqlx::query_as::<_, Post>("SELECT * FROM posts WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool)
            .await
    }

    pub async fn get_row(&self, id: Uuid) -> Result<Option<PostRow>, sqlx::Error> {
        sqlx::query_as::<_, PostRow>(&format!("{FEED_SELECT} WHERE p.id = $1"))
            .bind(id)
            .fetch_optional(self.pool)
            .await
    }

    pub async fn count_all(&self) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM posts")
            .fetch_one(self.pool)
            .await
    }

    pub async fn list_all(&self, limit: i64, offset: i64) -> Result<Vec<PostRow>, sqlx::Error> {
        sqlx::query_as::<_, PostRow>(&format!("{FEED_SELECT}{FEED_ORDER} LIMIT $1 OFFSET $2"))
            .bind(limit)
            .bind(offset)
            .fetch_all(self.pool)
            .await
    }

    pub async fn count_by_group(&self, group_id: Uuid) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM posts WHERE group_id = $1")
            .bind(group_id)
            .fetch_one(self.pool)
            .await
    }

    pub async fn list_by_group(
        &self,
        group_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<PostRow>, sqlx::Error> {
        sqlx::query_as::<_, PostRow>(&format!(
            "{FEED_SELECT} WHERE p.group_id = $1{FEED_ORDER} LIMIT $2 OFFSET $3"
        ))
        .bind(group_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool)
        .await
    }

    pub async fn count_by_author(&self, author_id: Uuid) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM posts WHERE author_id = $1")
            .bind(author_id)
            .fetch_one(self.pool)
            .await
    }

    pub async fn list_by_author(
        &self,
        author_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<PostRow>, sqlx::Error> {
        sqlx::query_as::<_, PostRow>(&format!(
            "{FEED_SELECT} WHERE p.author_id = $1{FEED_ORDER} LIMIT $2 OFFSET $3"
        ))
        .bind(author_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool)
        .await
    }

    pub async fn count_followed_by(&self, user_id: Uuid) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM posts p
            JOIN follows f ON p.author_id = f.author_id AND f.user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_one(self.pool)
        .await
    }

    /// Posts whose author the given user follows.
    pub async fn list_followed_by(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<PostRow>, sqlx::Error> {
        sqlx::query_as::<_, PostRow>(&format!(
            "{FEED_SELECT} JOIN follows f ON p.author_id = f.author_id AND f.user_id = $1{FEED_ORDER} LIMIT $2 OFFSET $3"
        ))
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool)
        .await
    }
}
