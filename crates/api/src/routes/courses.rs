//! Route definitions for the `/courses` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::courses;
use crate::state::AppState;

/// Routes mounted at `/courses`.
///
/// ```text
/// GET  /                                    -> list
/// POST /                                    -> create (requires auth)
/// GET  /mine                                -> mine (requires auth)
/// GET  /{id}                                -> get_by_id
/// GET  /{id}/progress                       -> my_progress (requires auth)
/// PUT  /{id}/progress/modules/{index}       -> set_module_completion (requires auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(courses::list).post(courses::create))
        .route("/mine", get(courses::mine))
        .route("/{id}", get(courses::get_by_id))
        .route("/{id}/progress", get(courses::my_progress))
        .route(
            "/{id}/progress/modules/{index}",
            put(courses::set_module_completion),
        )
}
