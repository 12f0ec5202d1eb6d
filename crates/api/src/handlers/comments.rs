//! Handlers for comment votes.
//!
//! Votes are plain counters; each request adds exactly one.

use axum::extract::State;
use axum::Json;
use vskill_core::error::CoreError;
use vskill_core::types::DbId;
use vskill_db::models::comment::Comment;
use vskill_db::repositories::CommentRepo;

use crate::error::{AppError, AppResult};
use crate::extract::AppPath;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

fn comment_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Comment",
        id,
    })
}

/// POST /api/v1/comments/{id}/upvote
pub async fn upvote(
    State(state): State<AppState>,
    _auth: AuthUser,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<Comment>> {
    let comment = CommentRepo::upvote(&state.pool, id)
        .await?
        .ok_or_else(|| comment_not_found(id))?;
    Ok(Json(comment))
}

/// POST /api/v1/comments/{id}/downvote
pub async fn downvote(
    State(state): State<AppState>,
    _auth: AuthUser,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<Comment>> {
    let comment = CommentRepo::downvote(&state.pool, id)
        .await?
        .ok_or_else(|| comment_not_found(id))?;
    Ok(Json(comment))
}
