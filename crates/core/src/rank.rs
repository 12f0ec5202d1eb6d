//! Rank progression derived from a user's coin balance.
//!
//! Ranks are a pure function of coins via a fixed ascending threshold table.
//! Callers that persist a rank must compute it with [`rank_of`] from the same
//! balance they write, so the stored label can never drift from the coins.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const RANK_BEGINNER: &str = "Beginner";
pub const RANK_APPRENTICE: &str = "Apprentice";
pub const RANK_SCHOLAR: &str = "Scholar";
pub const RANK_MASTER: &str = "Master";
pub const RANK_GRANDMASTER: &str = "Grandmaster";

/// Ascending `(rank, minimum coins)` table.
pub const RANK_THRESHOLDS: &[(Rank, i64)] = &[
    (Rank::Beginner, 0),
    (Rank::Apprentice, 1_000),
    (Rank::Scholar, 3_000),
    (Rank::Master, 7_000),
    (Rank::Grandmaster, 15_000),
];

/// Coins paid once per course, the first time the user completes it.
pub const COURSE_COMPLETION_REWARD: i64 = 100;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A coarse label derived from accumulated coins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rank {
    Beginner,
    Apprentice,
    Scholar,
    Master,
    Grandmaster,
}

impl Rank {
    /// Convert from the stored string value.
    pub fn from_str_value(s: &str) -> Result<Self, String> {
        match s {
            RANK_BEGINNER => Ok(Self::Beginner),
            RANK_APPRENTICE => Ok(Self::Apprentice),
            RANK_SCHOLAR => Ok(Self::Scholar),
            RANK_MASTER => Ok(Self::Master),
            RANK_GRANDMASTER => Ok(Self::Grandmaster),
            _ => Err(format!("Invalid rank '{s}'")),
        }
    }

    /// Convert to the stored string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => RANK_BEGINNER,
            Self::Apprentice => RANK_APPRENTICE,
            Self::Scholar => RANK_SCHOLAR,
            Self::Master => RANK_MASTER,
            Self::Grandmaster => RANK_GRANDMASTER,
        }
    }

    /// Minimum coin balance for this rank.
    pub fn threshold(&self) -> i64 {
        RANK_THRESHOLDS
            .iter()
            .find(|(rank, _)| rank == self)
            .map(|(_, threshold)| *threshold)
            .unwrap_or(0)
    }

    /// The rank directly above this one, or `None` at the top.
    pub fn next(&self) -> Option<Rank> {
        let idx = RANK_THRESHOLDS.iter().position(|(rank, _)| rank == self)?;
        RANK_THRESHOLDS.get(idx + 1).map(|(rank, _)| *rank)
    }
}

impl std::fmt::Display for Rank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a balance sits between its rank and the next one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankProgress {
    pub coins: i64,
    pub rank: Rank,
    pub next_rank: Option<Rank>,
    /// Coins needed for `next_rank`; `None` at the top rank.
    pub next_threshold: Option<i64>,
    /// Fraction in `[0.0, 1.0]` of the way from `rank` to `next_rank`.
    /// Always `1.0` at the top rank.
    pub progress: f64,
}

// ---------------------------------------------------------------------------
// Functions
// ---------------------------------------------------------------------------

fn validate_coins(coins: i64) -> Result<(), CoreError> {
    if coins < 0 {
        return Err(CoreError::Validation(format!(
            "Coin balance must be non-negative, got {coins}"
        )));
    }
    Ok(())
}

/// Highest rank whose threshold is at or below `coins`.
pub fn rank_of(coins: i64) -> Result<Rank, CoreError> {
    validate_coins(coins)?;
    let rank = RANK_THRESHOLDS
        .iter()
        .rev()
        .find(|(_, threshold)| *threshold <= coins)
        .map(|(rank, _)| *rank)
        .unwrap_or(Rank::Beginner);
    Ok(rank)
}

/// Compute rank, next rank and fractional progress for a balance.
pub fn rank_progress(coins: i64) -> Result<RankProgress, CoreError> {
    let rank = rank_of(coins)?;
    let next_rank = rank.next();

    let (next_threshold, progress) = match next_rank {
        Some(next) => {
            let current = rank.threshold();
            let span = (next.threshold() - current) as f64;
            let fraction = ((coins - current) as f64 / span).clamp(0.0, 1.0);
            (Some(next.threshold()), fraction)
        }
        None => (None, 1.0),
    };

    Ok(RankProgress {
        coins,
        rank,
        next_rank,
        next_threshold,
        progress,
    })
}
