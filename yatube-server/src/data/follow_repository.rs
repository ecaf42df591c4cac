use crate::domain::error::DomainError;
use crate::domain::follow::Follow;
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, error, info};
use uuid::Uuid;

#[async_trait]
pub trait FollowRepository: Send + Sync {
    /// Inserts the edge unless it already exists; returns true if a row was added.
    async fn create_if_absent(&self, follow: Follow) -> Result<bool, DomainError>;
    /// Returns true if a row was removed.
    async fn delete(&self, user_id: Uuid, author_id: Uuid) -> Result<bool, DomainError>;
    async fn exists(&self, user_id: Uuid, author_id: Uuid) -> Result<bool, DomainError>;
}

#[derive(Clone)]
pub struct PostgresFollowRepository {
    pool: PgPool,
}

impl PostgresFollowRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FollowRepository for PostgresFollowRepository {
    async fn create_if_absent(&self, follow: Follow) -> Result<bool, DomainError> {
        let inserted = sqlx::query_as::<_, (Uuid,)>(
            r#"
            INSERT INTO follows (id, user_id, author_id)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, author_id) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(follow.id)
        .bind(follow.user_id)
        .bind(follow.author_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "failed to create follow {} -> {}: {}",
                follow.user_id, follow.author_id, e
            );
            DomainError::Internal(format!("database error: {}", e))
        })?;

        match inserted {
            Some(_) => info!(user_id = %follow.user_id, author_id = %follow.author_id, "follow created"),
            None => debug!(user_id = %follow.user_id, author_id = %follow.author_id, "follow already present"),
        }
        Ok(inserted.is_some())
    }

    async fn delete(&self, user_id: Uuid, author_id: Uuid) -> Result<bool, DomainError> {
        let affected = sqlx::query("DELETE FROM follows WHERE user_id = $1 AND author_id = $2")
            .bind(user_id)
            .bind(author_id)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Internal(e.to_string()))?
            .rows_affected();

        if affected > 0 {
            info!(user_id = %user_id, author_id = %author_id, "follow removed");
        }
        Ok(affected > 0)
    }

    async fn exists(&self, user_id: Uuid, author_id: Uuid) -> Result<bool, DomainError> {
        sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM follows WHERE user_id = $1 AND author_id = $2)",
        )
        .bind(user_id)
        .bind(author_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("db error follow exists {} -> {}: {}", user_id, author_id, e);
            DomainError::Internal(e.to_string())
        })
    }
}
