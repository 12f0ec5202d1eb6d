//! Repository for the `user_progress` and `module_progress` tables.
//!
//! Every write runs in a transaction that holds the progress row lock from
//! the first statement until commit, so concurrent marker updates for the
//! same user and course are serialized and the stored aggregate always
//! reflects every committed marker.

use sqlx::{PgConnection, PgPool};
use vskill_core::progress::{aggregate, ModuleMarker};
use vskill_core::types::DbId;

use crate::models::progress::{ModuleProgress, ProgressWithModules, UserProgress};
use crate::models::user::User;
use crate::repositories::UserRepo;

/// Column list for the `user_progress` table.
const COLUMNS: &str = "id, user_id, course_id, progress, completed, last_accessed, \
                       created_at, updated_at";

/// Column list for the `module_progress` table.
const MARKER_COLUMNS: &str = "progress_id, module_index, completed, updated_at";

/// Provides enrollment and progress-tracking operations.
pub struct ProgressRepo;

impl ProgressRepo {
    /// Enroll a user in a course.
    ///
    /// Idempotent: an existing record is returned unchanged apart from
    /// `last_accessed`. The course's enrollment counter is incremented only
    /// when a new record is created.
    pub async fn enroll(
        pool: &PgPool,
        user_id: DbId,
        course_id: DbId,
    ) -> Result<ProgressWithModules, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let progress_id = upsert_progress(&mut tx, user_id, course_id).await?;
        let result = recompute(&mut tx, progress_id, course_id).await?;
        tx.commit().await?;
        Ok(result)
    }

    /// Find a progress record by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<UserProgress>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM user_progress WHERE id = $1");
        sqlx::query_as::<_, UserProgress>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user's progress on a course, with its module markers.
    pub async fn find_for_user_course(
        pool: &PgPool,
        user_id: DbId,
        course_id: DbId,
    ) -> Result<Option<ProgressWithModules>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM user_progress WHERE user_id = $1 AND course_id = $2");
        let Some(progress) = sqlx::query_as::<_, UserProgress>(&query)
            .bind(user_id)
            .bind(course_id)
            .fetch_optional(pool)
            .await?
        else {
            return Ok(None);
        };
        let module_progress = Self::list_markers(pool, progress.id).await?;
        Ok(Some(ProgressWithModules {
            progress,
            module_progress,
        }))
    }

    /// All progress records of a user, most recently accessed first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<UserProgress>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM user_progress
             WHERE user_id = $1
             ORDER BY last_accessed DESC, id DESC"
        );
        sqlx::query_as::<_, UserProgress>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Module markers of a progress record in index order.
    pub async fn list_markers(
        pool: &PgPool,
        progress_id: DbId,
    ) -> Result<Vec<ModuleProgress>, sqlx::Error> {
        let mut conn = pool.acquire().await?;
        markers(&mut conn, progress_id).await
    }

    /// Set one module's marker, enrolling the user first if needed, and
    /// recompute the aggregate.
    ///
    /// Callers validate `module_index` against the course's module count.
    pub async fn set_module_completion(
        pool: &PgPool,
        user_id: DbId,
        course_id: DbId,
        module_index: i32,
        completed: bool,
    ) -> Result<ProgressWithModules, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let progress_id = upsert_progress(&mut tx, user_id, course_id).await?;
        upsert_marker(&mut tx, progress_id, module_index, completed).await?;
        let result = recompute(&mut tx, progress_id, course_id).await?;
        tx.commit().await?;
        Ok(result)
    }

    /// Apply a batch of markers to an existing progress record and recompute
    /// the aggregate.
    ///
    /// Returns `None` if no record with the given `progress_id` exists.
    pub async fn apply_markers(
        pool: &PgPool,
        progress_id: DbId,
        markers: &[ModuleMarker],
    ) -> Result<Option<ProgressWithModules>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let course_id: Option<DbId> =
            sqlx::query_scalar("SELECT course_id FROM user_progress WHERE id = $1 FOR UPDATE")
                .bind(progress_id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some(course_id) = course_id else {
            return Ok(None);
        };

        for marker in markers {
            upsert_marker(&mut tx, progress_id, marker.module_index, marker.completed).await?;
        }
        let result = recompute(&mut tx, progress_id, course_id).await?;
        tx.commit().await?;
        Ok(Some(result))
    }

    /// Pay `reward` coins for a completed course, at most once per record.
    ///
    /// The claim flag and the coin change commit together. Returns the
    /// updated user, or `None` when the record is not complete or the reward
    /// was already paid.
    pub async fn claim_completion_reward(
        pool: &PgPool,
        progress_id: DbId,
        reward: i64,
    ) -> Result<Option<User>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let user_id: Option<DbId> = sqlx::query_scalar(
            "UPDATE user_progress SET reward_claimed = TRUE
             WHERE id = $1 AND completed AND NOT reward_claimed
             RETURNING user_id",
        )
        .bind(progress_id)
        .fetch_optional(&mut *tx)
        .await?;
        let Some(user_id) = user_id else {
            return Ok(None);
        };

        let user = UserRepo::adjust_coins_on(&mut tx, user_id, reward).await?;
        tx.commit().await?;
        Ok(user)
    }

    /// Number of courses the user has fully completed.
    pub async fn count_completed_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM user_progress WHERE user_id = $1 AND completed")
            .bind(user_id)
            .fetch_one(pool)
            .await
    }
}

/// Create or touch the `(user_id, course_id)` record and return its id.
///
/// The upsert takes the row lock for the rest of the transaction. A fresh
/// insert also bumps the course's enrollment counter.
async fn upsert_progress(
    conn: &mut PgConnection,
    user_id: DbId,
    course_id: DbId,
) -> Result<DbId, sqlx::Error> {
    let (progress_id, inserted): (DbId, bool) = sqlx::query_as(
        "INSERT INTO user_progress (user_id, course_id)
         VALUES ($1, $2)
         ON CONFLICT ON CONSTRAINT uq_user_progress_user_course
         DO UPDATE SET last_accessed = NOW()
         RETURNING id, (xmax = 0) AS inserted",
    )
    .bind(user_id)
    .bind(course_id)
    .fetch_one(&mut *conn)
    .await?;

    if inserted {
        sqlx::query("UPDATE courses SET enrollment = enrollment + 1 WHERE id = $1")
            .bind(course_id)
            .execute(&mut *conn)
            .await?;
    }

    Ok(progress_id)
}

async fn upsert_marker(
    conn: &mut PgConnection,
    progress_id: DbId,
    module_index: i32,
    completed: bool,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO module_progress (progress_id, module_index, completed)
         VALUES ($1, $2, $3)
         ON CONFLICT ON CONSTRAINT pk_module_progress
         DO UPDATE SET completed = EXCLUDED.completed, updated_at = NOW()",
    )
    .bind(progress_id)
    .bind(module_index)
    .bind(completed)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

async fn markers(
    conn: &mut PgConnection,
    progress_id: DbId,
) -> Result<Vec<ModuleProgress>, sqlx::Error> {
    let query = format!(
        "SELECT {MARKER_COLUMNS} FROM module_progress
         WHERE progress_id = $1
         ORDER BY module_index"
    );
    sqlx::query_as::<_, ModuleProgress>(&query)
        .bind(progress_id)
        .fetch_all(&mut *conn)
        .await
}

/// Rewrite the stored aggregate from the markers and current module count.
async fn recompute(
    conn: &mut PgConnection,
    progress_id: DbId,
    course_id: DbId,
) -> Result<ProgressWithModules, sqlx::Error> {
    let module_count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM course_modules WHERE course_id = $1")
            .bind(course_id)
            .fetch_one(&mut *conn)
            .await?;

    let module_progress = markers(conn, progress_id).await?;
    let marker_values: Vec<ModuleMarker> = module_progress.iter().map(ModuleMarker::from).collect();
    let agg = aggregate(module_count, &marker_values);

    let query = format!(
        "UPDATE user_progress SET progress = $2, completed = $3, last_accessed = NOW()
         WHERE id = $1
         RETURNING {COLUMNS}"
    );
    let progress = sqlx::query_as::<_, UserProgress>(&query)
        .bind(progress_id)
        .bind(agg.percent)
        .bind(agg.completed)
        .fetch_one(&mut *conn)
        .await?;

    Ok(ProgressWithModules {
        progress,
        module_progress,
    })
}
