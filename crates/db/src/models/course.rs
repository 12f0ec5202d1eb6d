//! Course and module models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use vskill_core::types::{DbId, Timestamp};
use vskill_core::video_type::VideoType;

/// A course row from the `courses` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Course {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub creator_id: DbId,
    pub tags: Vec<String>,
    pub is_ai_generated: bool,
    pub video_url: Option<String>,
    /// `video` or `playlist`; only set alongside `video_url`.
    pub video_type: Option<String>,
    pub attachments: Vec<String>,
    pub enrollment: i32,
    pub rating: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A module row from the `course_modules` table.
///
/// `position` is the module's index within its course.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CourseModule {
    pub id: DbId,
    pub course_id: DbId,
    pub position: i32,
    pub title: String,
    pub description: String,
    pub content: String,
    pub video_url: Option<String>,
    pub attachments: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A course together with its modules in position order.
#[derive(Debug, Clone, Serialize)]
pub struct CourseWithModules {
    #[serde(flatten)]
    pub course: Course,
    pub modules: Vec<CourseModule>,
}

/// DTO for one module inside [`CreateCourse`].
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateModule {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub description: String,
    #[serde(default)]
    #[validate(length(max = 50000))]
    pub content: String,
    #[validate(url)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub attachments: Vec<String>,
}

/// DTO for creating a course. The creator comes from the authenticated user.
///
/// Module order in `modules` becomes each module's position.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCourse {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(max = 50000))]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_ai_generated: bool,
    #[validate(url)]
    pub video_url: Option<String>,
    pub video_type: Option<VideoType>,
    #[serde(default)]
    pub attachments: Vec<String>,
    #[serde(default)]
    #[validate(nested)]
    pub modules: Vec<CreateModule>,
}
