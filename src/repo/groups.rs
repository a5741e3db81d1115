use slug::slugify;
use sqlx::PgPool;
use uuid::Uuid;

use crate::groups::Group;

pub struct GroupRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> GroupRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Slugifies the title, suffixing `-1`, `-2`, … until the slug is free.
    pub async fn create(&self, title: &str, description: &str) -> Result<Group, sqlx::Error> {
        let slug_base = match slugify(title) {
            s if s.is_empty() => "group".to_string(),
            s => s,
        };
        let mut slug = slug_base.clone();
        let mut suffix = 1;

        while sqlx::query("SELECT 1 FROM groups WHERE slug = $1")
            .bind(&slug)
            .fetch_optional(self.pool)
            .await?
            .is_some()
        {
            slug = format!("{slug_base}-{suffix}");
            suffix += 1;
        }

        sqlx::query_as::<_, Group>(
            "INSERT INTO groups (title, slug, description) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(title)
        .bind(&slug)
        .bind(description)
        .fetch_one(self.pool)
        .await
    }

    pub async fn by_id(&self, id: Uuid) -> Result<Option<Group>, sqlx::Error> {
        sqlx::query_as::<_, Group>("SELECT * FROM groups WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool)
            .await
    }

    pub async fn by_slug(&self, slug: &str) -> Result<Option<Group>, sqlx::Error> {
        sqlx::query_as::<_, Group>("SELECT * FROM groups WHERE slug = $1")
            .bind(slug)
            .fetch_optional(self.pool)
            .await
    }

    pub async fn all(&self) -> Result<Vec<Group>, sqlx::Error> {
        sqlx::query_as::<_, Group>("SELECT * FROM groups ORDER BY title ASC")
            .fetch_all(self.pool)
            .await
    }
}
