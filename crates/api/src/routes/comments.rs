//! Route definitions for the `/comments` resource.

use axum::routing::post;
use axum::Router;

use crate::handlers::comments;
use crate::state::AppState;

/// Routes mounted at `/comments`. All require auth.
///
/// ```text
/// POST /{id}/upvote    -> upvote
/// POST /{id}/downvote  -> downvote
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}/upvote", post(comments::upvote))
        .route("/{id}/downvote", post(comments::downvote))
}
