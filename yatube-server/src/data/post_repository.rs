use crate::domain::error::DomainError;
use crate::domain::post::{FeedFilter, Post, PostChanges, PostView};
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::{error, info};
use uuid::Uuid;

const POST_VIEW_SELECT: &str = r#"
    SELECT p.id, p.text, p.pub_date, p.image,
           p.author_id, u.username AS author_username,
           p.group_id, g.slug AS group_slug, g.title AS group_title
    FROM posts p
    LEFT JOIN users u ON u.id = p.author_id
    LEFT JOIN groups g ON g.id = p.group_id
"#;

#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn create(&self, post: Post) -> Result<Post, DomainError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, DomainError>;
    async fn find_view(&self, id: Uuid) -> Result<Option<PostView>, DomainError>;
    async fn update_post(&self, id: Uuid, changes: PostChanges)
    -> Result<Option<Post>, DomainError>;
    async fn count_posts(&self, filter: FeedFilter) -> Result<u64, DomainError>;
    async fn get_posts(
        &self,
        filter: FeedFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<PostView>, DomainError>;
}

fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: FeedFilter) {
    match filter {
        FeedFilter::All => {}
        FeedFilter::Group(group_id) => {
            builder.push(" WHERE p.group_id = ").push_bind(group_id);
        }
        FeedFilter::Author(author_id) => {
            builder.push(" WHERE p.author_id = ").push_bind(author_id);
        }
        FeedFilter::FollowedBy(user_id) => {
            builder
                .push(" WHERE p.author_id IN (SELECT f.author_id FROM follows f WHERE f.user_id = ")
                .push_bind(user_id)
                .push(")");
        }
    }
}

#[derive(Clone)]
pub struct PostgresPostRepository {
    pool: PgPool,
}

impl PostgresPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn create(&self, post: Post) -> Result<Post, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO posts (id, text, pub_date, group_id, author_id, image)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(post.id)
        .bind(&post.text)
        .bind(post.pub_date)
        .bind(post.group_id)
        .bind(post.author_id)
        .bind(&post.image)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to create post: {}", e);
            DomainError::Internal(format!("database error: {}", e))
        })?;

        info!(post_id = %post.id, author_id = ?post.author_id, "post created");
        Ok(post)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, DomainError> {
        sqlx::query_as::<_, Post>(
            r#"
            SELECT id, text, pub_date, group_id, author_id, image
            FROM posts WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("db error find_by_id {}: {}", id, e);
            DomainError::Internal(e.to_string())
        })
    }

    async fn find_view(&self, id: Uuid) -> Result<Option<PostView>, DomainError> {
        let mut builder = QueryBuilder::<Postgres>::new(POST_VIEW_SELECT);
        builder.push(" WHERE p.id = ").push_bind(id);
        builder
            .build_query_as::<PostView>()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!("db error find_view {}: {}", id, e);
                DomainError::Internal(e.to_string())
            })
    }

    async fn update_post(
        &self,
        id: Uuid,
        changes: PostChanges,
    ) -> Result<Option<Post>, DomainError> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            UPDATE posts
            SET
                text = $1,
                group_id = $2,
                image = COALESCE($3, image)
            WHERE id = $4
            RETURNING id, text, pub_date, group_id, author_id, image
            "#,
        )
        .bind(changes.text)
        .bind(changes.group_id)
        .bind(changes.image)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to update post {}: {}", id, e);
            DomainError::Internal(e.to_string())
        })?;

        if post.is_some() {
            info!(post_id = %id, "post updated");
        }

        Ok(post)
    }

    async fn count_posts(&self, filter: FeedFilter) -> Result<u64, DomainError> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM posts p");
        push_filter(&mut builder, filter);
        let (count,) = builder
            .build_query_as::<(i64,)>()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!("db error while counting posts: {}", e);
                DomainError::Internal(e.to_string())
            })?;
        Ok(count.max(0) as u64)
    }

    async fn get_posts(
        &self,
        filter: FeedFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<PostView>, DomainError> {
        let mut builder = QueryBuilder::<Postgres>::new(POST_VIEW_SELECT);
        push_filter(&mut builder, filter);
        builder
            .push(" ORDER BY p.pub_date DESC, p.id DESC LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);

        builder
            .build_query_as::<PostView>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("db error while fetching posts: {}", e);
                DomainError::Internal(e.to_string())
            })
    }
}
