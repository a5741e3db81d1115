use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod handler;

/// A follower → followed-author edge.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct Follow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub author_id: Uuid,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
