//! Integration tests for user persistence:
//! - Unique usernames
//! - Rank rewritten together with coins, for absolute sets and deltas
//! - Daily login streaks
//! - Append-only achievements

use chrono::NaiveDate;
use sqlx::PgPool;
use vskill_db::models::session::CreateSession;
use vskill_db::models::user::{CreateUser, UpdateUser};
use vskill_db::repositories::{SessionRepo, UserRepo};

fn new_user(username: &str) -> CreateUser {
    CreateUser {
        username: username.to_string(),
        password_hash: "$argon2id$v=19$placeholder".to_string(),
    }
}

fn coins(amount: i64) -> UpdateUser {
    UpdateUser {
        coins: Some(amount),
        ..Default::default()
    }
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_new_user_defaults(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("ada")).await.unwrap();
    assert_eq!(user.rank, "Beginner");
    assert_eq!(user.coins, 0);
    assert_eq!(user.streak, 0);
    assert!(user.last_login_date.is_none());
    assert!(user.achievements.is_empty());

    let found = UserRepo::find_by_username(&pool, "ada").await.unwrap().unwrap();
    assert_eq!(found.id, user.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_username_rejected(pool: PgPool) {
    UserRepo::create(&pool, &new_user("dup")).await.unwrap();
    let err = UserRepo::create(&pool, &new_user("dup")).await.unwrap_err();
    let db_err = err.as_database_error().expect("should be a database error");
    assert_eq!(db_err.constraint(), Some("uq_users_username"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_rank_follows_coins(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("climber")).await.unwrap();

    let cases = [
        (999, "Beginner"),
        (1_000, "Apprentice"),
        (3_500, "Scholar"),
        (7_000, "Master"),
        (20_000, "Grandmaster"),
        (50, "Beginner"),
    ];
    for (amount, expected) in cases {
        let updated = UserRepo::update(&pool, user.id, &coins(amount))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.coins, amount);
        assert_eq!(updated.rank, expected, "coins={amount}");
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_username_only_update_keeps_rank(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("renamer")).await.unwrap();
    UserRepo::update(&pool, user.id, &coins(3_000)).await.unwrap();

    let update = UpdateUser {
        username: Some("renamed".to_string()),
        ..Default::default()
    };
    let updated = UserRepo::update(&pool, user.id, &update).await.unwrap().unwrap();
    assert_eq!(updated.username, "renamed");
    assert_eq!(updated.coins, 3_000);
    assert_eq!(updated.rank, "Scholar");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_negative_coins_rejected(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("broke")).await.unwrap();
    let err = UserRepo::update(&pool, user.id, &coins(-1)).await.unwrap_err();
    let db_err = err.as_database_error().expect("should be a database error");
    assert_eq!(db_err.constraint(), Some("ck_users_coins_non_negative"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_missing_user(pool: PgPool) {
    let result = UserRepo::update(&pool, 999_999, &coins(10)).await.unwrap();
    assert!(result.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_streak(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("daily")).await.unwrap();

    let u = UserRepo::record_login(&pool, user.id, day(2025, 3, 1)).await.unwrap().unwrap();
    assert_eq!(u.streak, 1);

    // Second login on the same day does not extend the streak.
    let u = UserRepo::record_login(&pool, user.id, day(2025, 3, 1)).await.unwrap().unwrap();
    assert_eq!(u.streak, 1);

    let u = UserRepo::record_login(&pool, user.id, day(2025, 3, 2)).await.unwrap().unwrap();
    assert_eq!(u.streak, 2);

    let u = UserRepo::record_login(&pool, user.id, day(2025, 3, 5)).await.unwrap().unwrap();
    assert_eq!(u.streak, 1);
    assert_eq!(u.last_login_date, Some(day(2025, 3, 5)));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_add_achievements_is_append_only(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("collector")).await.unwrap();

    let first = vec!["week_warrior".to_string()];
    let u = UserRepo::add_achievements(&pool, user.id, &first).await.unwrap().unwrap();
    assert_eq!(u.achievements, first);

    let more = vec!["week_warrior".to_string(), "coin_collector".to_string()];
    let u = UserRepo::add_achievements(&pool, user.id, &more).await.unwrap().unwrap();
    assert_eq!(u.achievements, vec!["week_warrior", "coin_collector"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_session_lifecycle(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("sessions")).await.unwrap();
    let session = SessionRepo::create(
        &pool,
        &CreateSession {
            user_id: user.id,
            refresh_token_hash: "abc123".to_string(),
            expires_at: chrono::Utc::now() + chrono::Duration::days(7),
            user_agent: None,
        },
    )
    .await
    .unwrap();
    assert!(!session.is_revoked);

    let found = SessionRepo::find_by_refresh_token_hash(&pool, "abc123")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, session.id);

    assert!(SessionRepo::revoke(&pool, session.id).await.unwrap());
    let found = SessionRepo::find_by_refresh_token_hash(&pool, "abc123")
        .await
        .unwrap();
    assert!(found.is_none(), "revoked sessions are not returned");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_adjust_coins_moves_rank(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("saver")).await.unwrap();

    let user = UserRepo::adjust_coins(&pool, user.id, 900).await.unwrap().unwrap();
    assert_eq!((user.coins, user.rank.as_str()), (900, "Beginner"));

    let user = UserRepo::adjust_coins(&pool, user.id, 150).await.unwrap().unwrap();
    assert_eq!((user.coins, user.rank.as_str()), (1_050, "Apprentice"));

    let user = UserRepo::adjust_coins(&pool, user.id, -100).await.unwrap().unwrap();
    assert_eq!((user.coins, user.rank.as_str()), (950, "Beginner"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_adjust_coins_cannot_overdraw(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("spender")).await.unwrap();
    UserRepo::adjust_coins(&pool, user.id, 50).await.unwrap();

    let err = UserRepo::adjust_coins(&pool, user.id, -51).await.unwrap_err();
    let db_err = err.as_database_error().expect("should be a database error");
    assert_eq!(db_err.constraint(), Some("ck_users_coins_non_negative"));

    let user = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert_eq!(user.coins, 50);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_adjust_coins_missing_user(pool: PgPool) {
    assert!(UserRepo::adjust_coins(&pool, 999, 10).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_concurrent_coin_deltas_all_apply(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("busy")).await.unwrap();
    let id = user.id;

    let handles: Vec<_> = (0..10)
        .map(|_| {
            let pool = pool.clone();
            tokio::spawn(async move { UserRepo::adjust_coins(&pool, id, 100).await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let user = UserRepo::find_by_id(&pool, id).await.unwrap().unwrap();
    assert_eq!(user.coins, 1_000);
    assert_eq!(user.rank, "Apprentice");
}
