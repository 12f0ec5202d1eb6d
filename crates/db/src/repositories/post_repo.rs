//! Repository for the `posts` table.

use sqlx::PgPool;
use vskill_core::types::DbId;

use crate::models::post::{CreatePost, Post, PostListParams};
use crate::{clamp_limit, clamp_offset};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, title, content, post_type, tags, attachments, \
                       upvotes, created_at, updated_at";

/// Provides CRUD operations for community posts.
pub struct PostRepo;

impl PostRepo {
    /// Insert a new post authored by `user_id`.
    ///
    /// `tags` are written as given; callers normalize them first.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreatePost,
        tags: &[String],
    ) -> Result<Post, sqlx::Error> {
        let query = format!(
            "INSERT INTO posts (user_id, title, content, post_type, tags, attachments)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Post>(&query)
            .bind(user_id)
            .bind(&input.title)
            .bind(&input.content)
            .bind(input.post_type.as_str())
            .bind(tags)
            .bind(&input.attachments)
            .fetch_one(pool)
            .await
    }

    /// Find a post by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Post>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM posts WHERE id = $1");
        sqlx::query_as::<_, Post>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List posts newest first, optionally filtered by type.
    pub async fn list(pool: &PgPool, params: &PostListParams) -> Result<Vec<Post>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM posts
             WHERE ($1::text IS NULL OR post_type = $1)
             ORDER BY created_at DESC, id DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Post>(&query)
            .bind(params.post_type.map(|t| t.as_str()))
            .bind(clamp_limit(params.limit))
            .bind(clamp_offset(params.offset))
            .fetch_all(pool)
            .await
    }

    /// Atomically add one upvote. Returns `None` if the post does not exist.
    pub async fn upvote(pool: &PgPool, id: DbId) -> Result<Option<Post>, sqlx::Error> {
        let query = format!(
            "UPDATE posts SET upvotes = upvotes + 1
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Post>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
