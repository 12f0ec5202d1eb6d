//! Handlers for the `/users` and `/ranks` resources.

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use sqlx::PgPool;
use validator::Validate;
use vskill_core::achievements::{newly_earned, UserStats};
use vskill_core::error::CoreError;
use vskill_core::rank::{rank_progress, Rank, RankProgress, RANK_THRESHOLDS};
use vskill_core::types::DbId;
use vskill_core::validation::validate_username_chars;
use vskill_db::models::user::{UpdateUser, User, UserResponse};
use vskill_db::repositories::{ProgressRepo, UserRepo};

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// One row of the rank table.
#[derive(Debug, Serialize)]
pub struct RankEntry {
    pub rank: Rank,
    pub min_coins: i64,
}

fn user_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "User", id })
}

/// GET /api/v1/users/me
pub async fn me(State(state): State<AppState>, auth: AuthUser) -> AppResult<Json<UserResponse>> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| user_not_found(auth.user_id))?;
    Ok(Json(user.into()))
}

/// GET /api/v1/users/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<UserResponse>> {
    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| user_not_found(id))?;
    Ok(Json(user.into()))
}

/// PATCH /api/v1/users/{id}
///
/// Users may only update themselves. Changing `coins` rewrites `rank` in the
/// same statement.
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<UpdateUser>,
) -> AppResult<Json<UserResponse>> {
    auth.ensure_self(id)?;
    input.validate()?;
    if let Some(username) = &input.username {
        validate_username_chars(username)?;
    }

    let user = UserRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| user_not_found(id))?;

    if input.coins.is_some() {
        tracing::info!(user_id = id, coins = user.coins, rank = %user.rank, "Coin balance set");
    }

    let user = sync_achievements(&state.pool, user).await?;
    Ok(Json(user.into()))
}

/// GET /api/v1/users/{id}/rank
///
/// Rank, next rank and fractional progress for the user's balance.
pub async fn rank(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<DataResponse<RankProgress>>> {
    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| user_not_found(id))?;
    let progress = rank_progress(user.coins)?;
    Ok(Json(DataResponse { data: progress }))
}

/// GET /api/v1/ranks
pub async fn rank_table() -> Json<DataResponse<Vec<RankEntry>>> {
    let data = RANK_THRESHOLDS
        .iter()
        .map(|&(rank, min_coins)| RankEntry { rank, min_coins })
        .collect();
    Json(DataResponse { data })
}

/// Append any achievements the user now qualifies for.
///
/// Called after logins, coin changes and course completions.
pub(crate) async fn sync_achievements(pool: &PgPool, user: User) -> AppResult<User> {
    let completed_courses = ProgressRepo::count_completed_for_user(pool, user.id).await?;
    let stats = UserStats {
        streak: user.streak,
        coins: user.coins,
        completed_courses,
    };

    let new = newly_earned(&user.achievements, &stats);
    if new.is_empty() {
        return Ok(user);
    }

    let id = user.id;
    tracing::info!(user_id = id, achievements = ?new, "Achievements earned");
    UserRepo::add_achievements(pool, id, &new)
        .await?
        .ok_or_else(|| user_not_found(id))
}
