//! Achievements earned from login streaks, coins and course completions.
//!
//! Achievements are stored as a set of string ids on the user. They are only
//! ever added: [`newly_earned`] yields the ids to append to the stored set.

use serde::Serialize;

pub const ACHIEVEMENT_WEEK_WARRIOR: &str = "week_warrior";
pub const ACHIEVEMENT_STREAK_30: &str = "streak_30";
pub const ACHIEVEMENT_COIN_COLLECTOR: &str = "coin_collector";
pub const ACHIEVEMENT_FIRST_COMPLETION: &str = "first_completion";

pub const WEEK_WARRIOR_STREAK: i32 = 7;
pub const STREAK_30_STREAK: i32 = 30;
pub const COIN_COLLECTOR_COINS: i64 = 100;

/// Inputs needed to evaluate achievements.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct UserStats {
    pub streak: i32,
    pub coins: i64,
    pub completed_courses: i64,
}

/// All achievement ids the given stats qualify for.
pub fn earned(stats: &UserStats) -> Vec<&'static str> {
    let mut out = Vec::new();
    if stats.streak >= STREAK_30_STREAK {
        out.push(ACHIEVEMENT_STREAK_30);
    }
    if stats.streak >= WEEK_WARRIOR_STREAK {
        out.push(ACHIEVEMENT_WEEK_WARRIOR);
    }
    if stats.coins >= COIN_COLLECTOR_COINS {
        out.push(ACHIEVEMENT_COIN_COLLECTOR);
    }
    if stats.completed_courses >= 1 {
        out.push(ACHIEVEMENT_FIRST_COMPLETION);
    }
    out
}

/// Achievement ids `stats` earns that are not already in `current`.
pub fn newly_earned(current: &[String], stats: &UserStats) -> Vec<String> {
    earned(stats)
        .into_iter()
        .filter(|id| !current.iter().any(|a| a == id))
        .map(str::to_string)
        .collect()
}
