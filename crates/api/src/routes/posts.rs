//! Route definitions for the `/posts` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::posts;
use crate::state::AppState;

/// Routes mounted at `/posts`.
///
/// ```text
/// GET  /                -> list (?type=&limit=&offset=)
/// POST /                -> create (requires auth)
/// GET  /{id}            -> get_by_id (post + threaded comments)
/// POST /{id}/upvote     -> upvote (requires auth)
/// GET  /{id}/comments   -> list_comments
/// POST /{id}/comments   -> create_comment (requires auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(posts::list).post(posts::create))
        .route("/{id}", get(posts::get_by_id))
        .route("/{id}/upvote", post(posts::upvote))
        .route(
            "/{id}/comments",
            get(posts::list_comments).post(posts::create_comment),
        )
}
