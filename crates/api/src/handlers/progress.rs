//! Handlers for the `/progress` resource (enrollment and batch marker updates).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use validator::Validate;
use vskill_core::error::CoreError;
use vskill_core::progress::{validate_module_index, ModuleMarker};
use vskill_core::rank::COURSE_COMPLETION_REWARD;
use vskill_core::types::DbId;
use vskill_db::models::progress::{
    CreateProgress, ProgressWithModules, UpdateProgress, UserProgress,
};
use vskill_db::repositories::{CourseRepo, ProgressRepo, UserRepo};

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath};
use crate::handlers::courses::course_not_found;
use crate::handlers::users::sync_achievements;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/progress
///
/// All of the caller's progress records, most recently accessed first.
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<UserProgress>>>> {
    let records = ProgressRepo::list_for_user(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: records }))
}

/// POST /api/v1/progress
///
/// Enroll the caller in a course. Enrolling twice returns the existing record.
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    AppJson(input): AppJson<CreateProgress>,
) -> AppResult<(StatusCode, Json<ProgressWithModules>)> {
    if CourseRepo::find_by_id(&state.pool, input.course_id).await?.is_none() {
        return Err(course_not_found(input.course_id));
    }

    let progress = ProgressRepo::enroll(&state.pool, auth.user_id, input.course_id).await?;
    tracing::info!(
        user_id = auth.user_id,
        course_id = input.course_id,
        progress_id = progress.progress.id,
        "Enrolled in course"
    );
    Ok((StatusCode::CREATED, Json(progress)))
}

/// PATCH /api/v1/progress/{id}
///
/// Apply a batch of module markers. Only the owner may update a record; the
/// percentage is always recomputed server-side.
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<UpdateProgress>,
) -> AppResult<Json<ProgressWithModules>> {
    input.validate()?;

    let existing = ProgressRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| progress_not_found(id))?;
    if existing.user_id != auth.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "You can only update your own progress".into(),
        )));
    }

    let module_count = CourseRepo::module_count(&state.pool, existing.course_id).await?;
    for marker in &input.module_progress {
        validate_module_index(marker.module_index, module_count)?;
    }
    let markers: Vec<ModuleMarker> = input.module_progress.iter().map(ModuleMarker::from).collect();

    let progress = ProgressRepo::apply_markers(&state.pool, id, &markers)
        .await?
        .ok_or_else(|| progress_not_found(id))?;

    after_progress_change(&state, auth.user_id, &progress).await?;
    Ok(Json(progress))
}

/// Pay the completion reward and award achievements once a course reaches
/// 100%. The reward is paid only the first time a record completes.
pub(crate) async fn after_progress_change(
    state: &AppState,
    user_id: DbId,
    progress: &ProgressWithModules,
) -> AppResult<()> {
    if !progress.progress.completed {
        return Ok(());
    }

    let rewarded = ProgressRepo::claim_completion_reward(
        &state.pool,
        progress.progress.id,
        COURSE_COMPLETION_REWARD,
    )
    .await?;
    let user = match rewarded {
        Some(user) => {
            tracing::info!(
                user_id,
                course_id = progress.progress.course_id,
                reward = COURSE_COMPLETION_REWARD,
                coins = user.coins,
                rank = %user.rank,
                "Course completed, reward paid"
            );
            Some(user)
        }
        None => UserRepo::find_by_id(&state.pool, user_id).await?,
    };

    if let Some(user) = user {
        sync_achievements(&state.pool, user).await?;
    }
    Ok(())
}

fn progress_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Progress",
        id,
    })
}
