//! Route definitions for the `/users` and `/ranks` resources.

use axum::routing::get;
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// GET   /me         -> me (requires auth)
/// GET   /{id}       -> get_by_id
/// PATCH /{id}       -> update (requires auth, self only)
/// GET   /{id}/rank  -> rank
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/me", get(users::me))
        .route("/{id}", get(users::get_by_id).patch(users::update))
        .route("/{id}/rank", get(users::rank))
}

/// Routes mounted at `/ranks`.
///
/// ```text
/// GET / -> rank_table
/// ```
pub fn ranks_router() -> Router<AppState> {
    Router::new().route("/", get(users::rank_table))
}
