//! Route definitions for the `/progress` resource.

use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::progress;
use crate::state::AppState;

/// Routes mounted at `/progress`. All require auth.
///
/// ```text
/// GET   /      -> list
/// POST  /      -> create
/// PATCH /{id}  -> update
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(progress::list).post(progress::create))
        .route("/{id}", patch(progress::update))
}
