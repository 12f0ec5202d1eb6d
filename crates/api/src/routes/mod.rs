pub mod auth;
pub mod comments;
pub mod courses;
pub mod health;
pub mod posts;
pub mod progress;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /auth/register                            register (public)
/// /auth/login                               login (public)
/// /auth/refresh                             refresh (public)
/// /auth/logout                              logout (requires auth)
///
/// /users/me                                 current user
/// /users/{id}                               get, update (self only)
/// /users/{id}/rank                          rank progress
/// /ranks                                    rank table
///
/// /courses                                  list, create
/// /courses/mine                             created + enrolled
/// /courses/{id}                             get with modules
/// /courses/{id}/progress                    caller's progress
/// /courses/{id}/progress/modules/{index}    set module marker (PUT)
///
/// /progress                                 list, enroll
/// /progress/{id}                            batch marker update (PATCH)
///
/// /posts                                    list (?type=), create
/// /posts/{id}                               post + threaded comments
/// /posts/{id}/upvote                        upvote (POST)
/// /posts/{id}/comments                      list, create
/// /comments/{id}/upvote                     upvote (POST)
/// /comments/{id}/downvote                   downvote (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/ranks", users::ranks_router())
        .nest("/courses", courses::router())
        .nest("/progress", progress::router())
        .nest("/posts", posts::router())
        .nest("/comments", comments::router())
}
