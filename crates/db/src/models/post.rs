//! Community post model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use vskill_core::post_type::PostType;
use vskill_core::types::{DbId, Timestamp};

/// A row from the `posts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Post {
    pub id: DbId,
    pub user_id: DbId,
    pub title: String,
    pub content: String,
    /// One of `discussion`, `blog`, `meme`.
    #[serde(rename = "type")]
    pub post_type: String,
    pub tags: Vec<String>,
    pub attachments: Vec<String>,
    pub upvotes: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a post. The author comes from the authenticated user.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePost {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1, max = 50000))]
    pub content: String,
    #[serde(rename = "type")]
    pub post_type: PostType,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub attachments: Vec<String>,
}

/// Query parameters for `GET /posts`.
#[derive(Debug, Default, Deserialize)]
pub struct PostListParams {
    #[serde(rename = "type")]
    pub post_type: Option<PostType>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
