//! Course progress models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use vskill_core::progress::ModuleMarker;
use vskill_core::types::{DbId, Timestamp};

/// A row from the `user_progress` table. One per `(user_id, course_id)`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserProgress {
    pub id: DbId,
    pub user_id: DbId,
    pub course_id: DbId,
    /// Percent complete, derived from the module markers.
    pub progress: i32,
    pub completed: bool,
    pub last_accessed: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `module_progress` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ModuleProgress {
    pub progress_id: DbId,
    pub module_index: i32,
    pub completed: bool,
    pub updated_at: Timestamp,
}

impl From<&ModuleProgress> for ModuleMarker {
    fn from(row: &ModuleProgress) -> Self {
        ModuleMarker {
            module_index: row.module_index,
            completed: row.completed,
        }
    }
}

/// A progress record together with its module markers in index order.
#[derive(Debug, Clone, Serialize)]
pub struct ProgressWithModules {
    #[serde(flatten)]
    pub progress: UserProgress,
    pub module_progress: Vec<ModuleProgress>,
}

/// DTO for enrolling in a course (`POST /progress`).
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProgress {
    pub course_id: DbId,
}

/// One marker inside [`UpdateProgress`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ModuleMarkerInput {
    pub module_index: i32,
    pub completed: bool,
}

impl From<&ModuleMarkerInput> for ModuleMarker {
    fn from(input: &ModuleMarkerInput) -> Self {
        ModuleMarker {
            module_index: input.module_index,
            completed: input.completed,
        }
    }
}

/// DTO for a batch marker update (`PATCH /progress/{id}`).
///
/// The percentage and completed flag are never accepted from the client;
/// they are recomputed from the markers.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateProgress {
    #[validate(length(min = 1, max = 200))]
    pub module_progress: Vec<ModuleMarkerInput>,
}

/// DTO for setting a single module's marker.
#[derive(Debug, Clone, Deserialize)]
pub struct SetModuleCompletion {
    #[serde(default = "default_completed")]
    pub completed: bool,
}

fn default_completed() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use validator::Validate;

    use super::*;

    fn update(markers: usize) -> UpdateProgress {
        UpdateProgress {
            module_progress: (0..markers as i32)
                .map(|module_index| ModuleMarkerInput {
                    module_index,
                    completed: true,
                })
                .collect(),
        }
    }

    #[test]
    fn test_batch_size_bounds() {
        assert!(update(0).validate().is_err());
        assert!(update(1).validate().is_ok());
        assert!(update(200).validate().is_ok());
        assert!(update(201).validate().is_err());
    }
}
