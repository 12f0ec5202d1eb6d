//! Repository for the `courses` and `course_modules` tables.

use sqlx::PgPool;
use vskill_core::types::DbId;

use crate::models::course::{Course, CourseModule, CourseWithModules, CreateCourse};

/// Column list for the `courses` table.
const COLUMNS: &str = "id, title, description, creator_id, tags, is_ai_generated, \
                       video_url, video_type, attachments, enrollment, rating, \
                       created_at, updated_at";

/// Column list for `courses` when joined under alias `c`.
const C_COLUMNS: &str = "c.id, c.title, c.description, c.creator_id, c.tags, c.is_ai_generated, \
                         c.video_url, c.video_type, c.attachments, c.enrollment, c.rating, \
                         c.created_at, c.updated_at";

/// Column list for the `course_modules` table.
const MODULE_COLUMNS: &str = "id, course_id, position, title, description, content, \
                              video_url, attachments, created_at, updated_at";

/// Provides CRUD operations for courses and their modules.
pub struct CourseRepo;

impl CourseRepo {
    /// Insert a course and its modules in one transaction.
    ///
    /// Each module's position is its index in `input.modules`. `tags` are
    /// written as given; callers normalize them first.
    pub async fn create(
        pool: &PgPool,
        creator_id: DbId,
        input: &CreateCourse,
        tags: &[String],
    ) -> Result<CourseWithModules, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let insert_course = format!(
            "INSERT INTO courses
                (title, description, creator_id, tags, is_ai_generated, video_url, video_type,
                 attachments)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        let course = sqlx::query_as::<_, Course>(&insert_course)
            .bind(&input.title)
            .bind(&input.description)
            .bind(creator_id)
            .bind(tags)
            .bind(input.is_ai_generated)
            .bind(&input.video_url)
            .bind(input.video_type.map(|t| t.as_str()))
            .bind(&input.attachments)
            .fetch_one(&mut *tx)
            .await?;

        let insert_module = format!(
            "INSERT INTO course_modules
                (course_id, position, title, description, content, video_url, attachments)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {MODULE_COLUMNS}"
        );
        let mut modules = Vec::with_capacity(input.modules.len());
        for (position, module) in input.modules.iter().enumerate() {
            let row = sqlx::query_as::<_, CourseModule>(&insert_module)
                .bind(course.id)
                .bind(position as i32)
                .bind(&module.title)
                .bind(&module.description)
                .bind(&module.content)
                .bind(&module.video_url)
                .bind(&module.attachments)
                .fetch_one(&mut *tx)
                .await?;
            modules.push(row);
        }

        tx.commit().await?;
        Ok(CourseWithModules { course, modules })
    }

    /// Find a course by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Course>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM courses WHERE id = $1");
        sqlx::query_as::<_, Course>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a course by ID, enriched with its ordered modules.
    pub async fn find_with_modules(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<CourseWithModules>, sqlx::Error> {
        let Some(course) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };
        let modules = Self::list_modules(pool, course.id).await?;
        Ok(Some(CourseWithModules { course, modules }))
    }

    /// List courses, most recently created first.
    pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Course>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM courses
             ORDER BY created_at DESC, id DESC
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, Course>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Courses the user created or is enrolled in, most recent first.
    pub async fn list_for_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Course>, sqlx::Error> {
        let query = format!(
            "SELECT {C_COLUMNS} FROM courses c
             WHERE c.creator_id = $1
                OR EXISTS (
                    SELECT 1 FROM user_progress p
                    WHERE p.course_id = c.id AND p.user_id = $1
                )
             ORDER BY c.created_at DESC, c.id DESC"
        );
        sqlx::query_as::<_, Course>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// List a course's modules in position order.
    pub async fn list_modules(
        pool: &PgPool,
        course_id: DbId,
    ) -> Result<Vec<CourseModule>, sqlx::Error> {
        let query = format!(
            "SELECT {MODULE_COLUMNS} FROM course_modules
             WHERE course_id = $1
             ORDER BY position"
        );
        sqlx::query_as::<_, CourseModule>(&query)
            .bind(course_id)
            .fetch_all(pool)
            .await
    }

    /// Number of modules in a course.
    pub async fn module_count(pool: &PgPool, course_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM course_modules WHERE course_id = $1")
            .bind(course_id)
            .fetch_one(pool)
            .await
    }
}
