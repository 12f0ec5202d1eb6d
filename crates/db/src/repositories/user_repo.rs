//! Repository for the `users` table.

use chrono::NaiveDate;
use sqlx::{PgConnection, PgPool};
use vskill_core::rank::{rank_of, RANK_BEGINNER};
use vskill_core::streak::next_streak;
use vskill_core::types::DbId;

use crate::models::user::{CreateUser, UpdateUser, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, username, password_hash, rank, coins, streak, \
                        last_login_date, achievements, created_at, updated_at";

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    ///
    /// New users start as `Beginner` with zero coins.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (username, password_hash)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.username)
            .bind(&input.password_hash)
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by username (case-sensitive).
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE username = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// Update a user. Only non-`None` fields in `input` are applied.
    ///
    /// When `coins` is set, `rank` is rewritten in the same statement from
    /// the new balance, so the two columns cannot diverge. A negative balance
    /// is rejected by the `ck_users_coins_non_negative` constraint.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateUser,
    ) -> Result<Option<User>, sqlx::Error> {
        let rank = input
            .coins
            .and_then(|coins| rank_of(coins).ok())
            .map(|rank| rank.as_str());

        let query = format!(
            "UPDATE users SET
                username = COALESCE($2, username),
                coins = COALESCE($3, coins),
                rank = COALESCE($4, rank)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&input.username)
            .bind(input.coins)
            .bind(rank)
            .fetch_optional(pool)
            .await
    }

    /// Add `delta` (possibly negative) to the coin balance and rewrite `rank`
    /// to match.
    ///
    /// The row is locked for the read-compute-write so concurrent deltas
    /// apply one after another. A delta that would take the balance below
    /// zero fails on `ck_users_coins_non_negative` and changes nothing.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn adjust_coins(
        pool: &PgPool,
        id: DbId,
        delta: i64,
    ) -> Result<Option<User>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let user = Self::adjust_coins_on(&mut tx, id, delta).await?;
        tx.commit().await?;
        Ok(user)
    }

    /// [`UserRepo::adjust_coins`] on a connection the caller controls, so the
    /// coin change can share a transaction with other writes.
    pub async fn adjust_coins_on(
        conn: &mut PgConnection,
        id: DbId,
        delta: i64,
    ) -> Result<Option<User>, sqlx::Error> {
        let coins: Option<i64> =
            sqlx::query_scalar("SELECT coins FROM users WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *conn)
                .await?;

        let Some(coins) = coins else {
            return Ok(None);
        };

        let balance = coins.saturating_add(delta);
        // Negative balances keep a valid label; the check constraint rejects them.
        let rank = rank_of(balance).map_or(RANK_BEGINNER, |rank| rank.as_str());

        let query = format!(
            "UPDATE users SET coins = $2, rank = $3
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(balance)
            .bind(rank)
            .fetch_optional(&mut *conn)
            .await
    }

    /// Record a login on `today` and advance the daily streak.
    ///
    /// The row is locked for the read-compute-write so two logins arriving
    /// together cannot both extend the streak.
    pub async fn record_login(
        pool: &PgPool,
        id: DbId,
        today: NaiveDate,
    ) -> Result<Option<User>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let current: Option<(Option<NaiveDate>, i32)> =
            sqlx::query_as("SELECT last_login_date, streak FROM users WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;

        let Some((last_login, streak)) = current else {
            return Ok(None);
        };

        let streak = next_streak(last_login, today, streak);

        let query = format!(
            "UPDATE users SET streak = $2, last_login_date = $3
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let user = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(streak)
            .bind(today)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(user))
    }

    /// Append achievement ids that the user does not already hold.
    ///
    /// Existing order is preserved and nothing is ever removed.
    pub async fn add_achievements(
        pool: &PgPool,
        id: DbId,
        achievements: &[String],
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET achievements = achievements || ARRAY(
                 SELECT a FROM unnest($2::text[]) AS a
                 WHERE NOT (a = ANY(users.achievements))
             )
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(achievements)
            .fetch_optional(pool)
            .await
    }
}
