use sqlx::PgPool;
use uuid::Uuid;

use crate::follows::Follow;

pub struct FollowRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> FollowRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get-or-create; calling it twice for the same pair leaves one row.
    pub async fn create(&self, user_id: Uuid, author_id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO follows (user_id, author_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, author_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(author_id)
        .execute(self.pool)
        .await?;
        Ok(())
    }

    /// Delete-if-exists; a no-op when the pair was never followed.
    pub async fn delete(&self, user_id: Uuid, author_id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM follows WHERE user_id = $1 AND author_id = $2")
            .bind(user_id)
            .bind(author_id)
            .execute(self.pool)
            .await?;
        Ok(())
    }

    pub async fn get(&self, user_id: Uuid, author_id: Uuid) -> Result<Option<Follow>, sqlx::Error> {
        sqlx::query_as::<_, Follow>(
            "SELECT * FROM follows WHERE user_id = $1 AND author_id = $2",
        )
        .bind(user_id)
        .bind(author_id)
        .fetch_optional(self.pool)
        .await
    }

    pub async fn exists(&self, user_id: Uuid, author_id: Uuid) -> Result<bool, sqlx::Error> {
        Ok(self.get(user_id, author_id).await?.is_some())
    }
}
