//! User entity model and DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use vskill_core::types::{DbId, Timestamp};

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses directly.
/// Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub password_hash: String,
    pub rank: String,
    pub coins: i64,
    pub streak: i32,
    pub last_login_date: Option<NaiveDate>,
    pub achievements: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Safe user representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub username: String,
    pub rank: String,
    pub coins: i64,
    pub streak: i32,
    pub last_login_date: Option<NaiveDate>,
    pub achievements: Vec<String>,
    pub created_at: Timestamp,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            rank: user.rank,
            coins: user.coins,
            streak: user.streak,
            last_login_date: user.last_login_date,
            achievements: user.achievements,
            created_at: user.created_at,
        }
    }
}

/// DTO for creating a new user. The password is already hashed.
#[derive(Debug)]
pub struct CreateUser {
    pub username: String,
    pub password_hash: String,
}

/// DTO for updating an existing user. All fields are optional.
///
/// Setting `coins` also rewrites `rank` in the same statement.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateUser {
    #[validate(length(min = 3, max = 50))]
    pub username: Option<String>,
    #[validate(range(min = 0))]
    pub coins: Option<i64>,
}
