//! Handlers for the `/courses` resource and per-course progress.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use validator::Validate;
use vskill_core::error::CoreError;
use vskill_core::progress::validate_module_index;
use vskill_core::types::DbId;
use vskill_core::validation::{
    normalize_tags, validate_max_items, MAX_ATTACHMENTS, MAX_MODULES_PER_COURSE,
};
use vskill_core::video_type::validate_video_link;
use vskill_db::models::course::{Course, CourseWithModules, CreateCourse};
use vskill_db::models::progress::{ProgressWithModules, SetModuleCompletion};
use vskill_db::repositories::{CourseRepo, ProgressRepo};
use vskill_db::{clamp_limit, clamp_offset};

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::handlers::progress::after_progress_change;
use crate::middleware::auth::AuthUser;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

pub(crate) fn course_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Course",
        id,
    })
}

/// POST /api/v1/courses
///
/// Create a course authored by the caller. Module order in the body becomes
/// each module's position.
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    AppJson(input): AppJson<CreateCourse>,
) -> AppResult<(StatusCode, Json<CourseWithModules>)> {
    input.validate()?;
    validate_video_link(input.video_url.as_deref(), input.video_type)?;
    validate_max_items("attachments", input.attachments.len(), MAX_ATTACHMENTS)?;
    validate_max_items("modules", input.modules.len(), MAX_MODULES_PER_COURSE)?;
    for module in &input.modules {
        validate_max_items("attachments", module.attachments.len(), MAX_ATTACHMENTS)?;
    }
    let tags = normalize_tags(&input.tags)?;

    let created = CourseRepo::create(&state.pool, auth.user_id, &input, &tags).await?;

    tracing::info!(
        course_id = created.course.id,
        creator_id = auth.user_id,
        modules = created.modules.len(),
        "Course created"
    );
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/v1/courses
pub async fn list(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<Course>>>> {
    let courses = CourseRepo::list(
        &state.pool,
        clamp_limit(params.limit),
        clamp_offset(params.offset),
    )
    .await?;
    Ok(Json(DataResponse { data: courses }))
}

/// GET /api/v1/courses/mine
///
/// Courses the caller created or is enrolled in.
pub async fn mine(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<Course>>>> {
    let courses = CourseRepo::list_for_user(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: courses }))
}

/// GET /api/v1/courses/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<CourseWithModules>> {
    let course = CourseRepo::find_with_modules(&state.pool, id)
        .await?
        .ok_or_else(|| course_not_found(id))?;
    Ok(Json(course))
}

/// GET /api/v1/courses/{id}/progress
///
/// The caller's progress on the course. 404 when not enrolled.
pub async fn my_progress(
    State(state): State<AppState>,
    auth: AuthUser,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<ProgressWithModules>> {
    let progress = ProgressRepo::find_for_user_course(&state.pool, auth.user_id, id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Progress for course",
                id,
            })
        })?;
    Ok(Json(progress))
}

/// PUT /api/v1/courses/{id}/progress/modules/{index}
///
/// Mark one module complete (or not) for the caller, enrolling them on first
/// use. `completed` defaults to `true` when omitted.
pub async fn set_module_completion(
    State(state): State<AppState>,
    auth: AuthUser,
    AppPath((id, module_index)): AppPath<(DbId, i32)>,
    AppJson(input): AppJson<SetModuleCompletion>,
) -> AppResult<Json<ProgressWithModules>> {
    if CourseRepo::find_by_id(&state.pool, id).await?.is_none() {
        return Err(course_not_found(id));
    }
    let module_count = CourseRepo::module_count(&state.pool, id).await?;
    validate_module_index(module_index, module_count)?;

    let progress = ProgressRepo::set_module_completion(
        &state.pool,
        auth.user_id,
        id,
        module_index,
        input.completed,
    )
    .await?;

    tracing::debug!(
        user_id = auth.user_id,
        course_id = id,
        module_index,
        completed = input.completed,
        percent = progress.progress.progress,
        "Module marker set"
    );

    after_progress_change(&state, auth.user_id, &progress).await?;
    Ok(Json(progress))
}
