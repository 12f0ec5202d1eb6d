//! Handlers for the `/posts` resource and its comment threads.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use validator::Validate;
use vskill_core::error::CoreError;
use vskill_core::threading::{partition_threads, validate_reply_depth, CommentThread};
use vskill_core::types::DbId;
use vskill_core::validation::{normalize_tags, validate_max_items, MAX_ATTACHMENTS};
use vskill_db::models::comment::{Comment, CreateComment};
use vskill_db::models::post::{CreatePost, Post, PostListParams};
use vskill_db::repositories::{CommentRepo, PostRepo};

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// A post with its comments grouped into threads.
#[derive(Debug, Serialize)]
pub struct PostDetail {
    #[serde(flatten)]
    pub post: Post,
    pub comments: Vec<CommentThread<Comment>>,
}

fn post_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Post", id })
}

async fn ensure_post_exists(state: &AppState, id: DbId) -> AppResult<Post> {
    PostRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| post_not_found(id))
}

async fn load_threads(state: &AppState, post_id: DbId) -> AppResult<Vec<CommentThread<Comment>>> {
    let comments = CommentRepo::list_for_post(&state.pool, post_id).await?;
    Ok(partition_threads(comments).into_nested())
}

/// GET /api/v1/posts
///
/// Newest first. `?type=discussion|blog|meme` filters by type.
pub async fn list(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<PostListParams>,
) -> AppResult<Json<DataResponse<Vec<Post>>>> {
    let posts = PostRepo::list(&state.pool, &params).await?;
    Ok(Json(DataResponse { data: posts }))
}

/// POST /api/v1/posts
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    AppJson(input): AppJson<CreatePost>,
) -> AppResult<(StatusCode, Json<Post>)> {
    input.validate()?;
    validate_max_items("attachments", input.attachments.len(), MAX_ATTACHMENTS)?;
    let tags = normalize_tags(&input.tags)?;

    let post = PostRepo::create(&state.pool, auth.user_id, &input, &tags).await?;
    tracing::info!(
        post_id = post.id,
        user_id = auth.user_id,
        post_type = %post.post_type,
        "Post created"
    );
    Ok((StatusCode::CREATED, Json(post)))
}

/// GET /api/v1/posts/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<DataResponse<PostDetail>>> {
    let post = ensure_post_exists(&state, id).await?;
    let comments = load_threads(&state, id).await?;
    Ok(Json(DataResponse {
        data: PostDetail { post, comments },
    }))
}

/// POST /api/v1/posts/{id}/upvote
pub async fn upvote(
    State(state): State<AppState>,
    _auth: AuthUser,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<Post>> {
    let post = PostRepo::upvote(&state.pool, id)
        .await?
        .ok_or_else(|| post_not_found(id))?;
    Ok(Json(post))
}

/// GET /api/v1/posts/{id}/comments
///
/// Top-level comments oldest first, each with its replies oldest first.
pub async fn list_comments(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<DataResponse<Vec<CommentThread<Comment>>>>> {
    ensure_post_exists(&state, id).await?;
    let threads = load_threads(&state, id).await?;
    Ok(Json(DataResponse { data: threads }))
}

/// POST /api/v1/posts/{id}/comments
///
/// A `parent_id` makes the comment a reply. The parent must belong to the
/// same post and must itself be top-level.
pub async fn create_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<CreateComment>,
) -> AppResult<(StatusCode, Json<Comment>)> {
    input.validate()?;
    ensure_post_exists(&state, id).await?;

    if let Some(parent_id) = input.parent_id {
        let parent = CommentRepo::find_by_id(&state.pool, parent_id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Comment",
                id: parent_id,
            }))?;
        if parent.post_id != id {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Comment {parent_id} belongs to a different post"
            ))));
        }
        validate_reply_depth(&parent)?;
    }

    let comment = CommentRepo::create(&state.pool, id, auth.user_id, &input).await?;
    tracing::info!(
        comment_id = comment.id,
        post_id = id,
        parent_id = ?comment.parent_id,
        user_id = auth.user_id,
        "Comment created"
    );
    Ok((StatusCode::CREATED, Json(comment)))
}
