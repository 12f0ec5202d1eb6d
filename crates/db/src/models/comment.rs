//! Comment model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use vskill_core::threading::ThreadNode;
use vskill_core::types::{DbId, Timestamp};

/// A row from the `comments` table.
///
/// `parent_id` is `None` for top-level comments.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Comment {
    pub id: DbId,
    pub post_id: DbId,
    pub user_id: DbId,
    pub parent_id: Option<DbId>,
    pub content: String,
    pub upvotes: i32,
    pub downvotes: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ThreadNode for Comment {
    fn id(&self) -> DbId {
        self.id
    }

    fn parent_id(&self) -> Option<DbId> {
        self.parent_id
    }

    fn created_at(&self) -> Timestamp {
        self.created_at
    }
}

/// DTO for creating a comment or reply on a post.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateComment {
    #[validate(length(min = 1, max = 10000))]
    pub content: String,
    pub parent_id: Option<DbId>,
}
