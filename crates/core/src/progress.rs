//! Course progress aggregation.
//!
//! A progress record holds one completion marker per module index. The
//! aggregate percentage and completed flag are always recomputed from the
//! markers and the course's current module count, never accepted from a
//! client.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Completion marker for a single module of a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleMarker {
    pub module_index: i32,
    pub completed: bool,
}

/// Aggregate state derived from a set of markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProgressAggregate {
    /// Percent complete in `[0, 100]`.
    pub percent: i32,
    pub completed: bool,
}

/// `floor(100 * completed / module_count)`, or 0 for a course with no modules.
pub fn compute_percent(module_count: i64, completed_count: i64) -> i32 {
    if module_count <= 0 {
        return 0;
    }
    let done = completed_count.clamp(0, module_count);
    (done * 100 / module_count) as i32
}

/// Recompute the aggregate from markers.
///
/// Only markers with `completed == true` and an index inside
/// `[0, module_count)` are counted, and each index counts once.
pub fn aggregate(module_count: i64, markers: &[ModuleMarker]) -> ProgressAggregate {
    let completed: BTreeSet<i32> = markers
        .iter()
        .filter(|m| m.completed && m.module_index >= 0 && i64::from(m.module_index) < module_count)
        .map(|m| m.module_index)
        .collect();

    let percent = compute_percent(module_count, completed.len() as i64);
    ProgressAggregate {
        percent,
        completed: percent == 100,
    }
}

/// Set the marker for `module_index`, replacing any existing one.
pub fn apply_marker(markers: &mut Vec<ModuleMarker>, module_index: i32, completed: bool) {
    match markers.iter_mut().find(|m| m.module_index == module_index) {
        Some(existing) => existing.completed = completed,
        None => markers.push(ModuleMarker {
            module_index,
            completed,
        }),
    }
}

/// Reject module indices that do not address a module of the course.
pub fn validate_module_index(module_index: i32, module_count: i64) -> Result<(), CoreError> {
    if module_index < 0 || i64::from(module_index) >= module_count {
        return Err(CoreError::Validation(format!(
            "Module index {module_index} is out of range for a course with {module_count} modules"
        )));
    }
    Ok(())
}
