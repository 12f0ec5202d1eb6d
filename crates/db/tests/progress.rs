//! Integration tests for courses, enrollment and progress aggregation.

use sqlx::PgPool;
use vskill_core::progress::ModuleMarker;
use vskill_db::models::course::{CourseWithModules, CreateCourse, CreateModule};
use vskill_db::models::user::CreateUser;
use vskill_db::repositories::{CourseRepo, ProgressRepo, UserRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seed_user(pool: &PgPool, username: &str) -> i64 {
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            password_hash: "hash".to_string(),
        },
    )
    .await
    .unwrap()
    .id
}

fn module(title: &str) -> CreateModule {
    CreateModule {
        title: title.to_string(),
        description: String::new(),
        content: String::new(),
        video_url: None,
        attachments: vec![],
    }
}

async fn seed_course(pool: &PgPool, creator_id: i64, modules: usize) -> CourseWithModules {
    let input = CreateCourse {
        title: "Rust for Beginners".to_string(),
        description: "Ownership, borrowing and lifetimes".to_string(),
        tags: vec![],
        is_ai_generated: false,
        video_url: None,
        video_type: None,
        attachments: vec![],
        modules: (0..modules).map(|i| module(&format!("Module {i}"))).collect(),
    };
    CourseRepo::create(pool, creator_id, &input, &["rust".to_string()])
        .await
        .unwrap()
}

fn marker(module_index: i32, completed: bool) -> ModuleMarker {
    ModuleMarker {
        module_index,
        completed,
    }
}

// ---------------------------------------------------------------------------
// Courses
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_course_with_modules(pool: PgPool) {
    let creator = seed_user(&pool, "instructor").await;
    let created = seed_course(&pool, creator, 3).await;

    assert_eq!(created.course.creator_id, creator);
    assert_eq!(created.course.enrollment, 0);
    assert_eq!(created.course.tags, vec!["rust"]);
    let positions: Vec<i32> = created.modules.iter().map(|m| m.position).collect();
    assert_eq!(positions, vec![0, 1, 2]);

    let found = CourseRepo::find_with_modules(&pool, created.course.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.modules.len(), 3);
    assert_eq!(found.modules[1].title, "Module 1");
    assert_eq!(CourseRepo::module_count(&pool, created.course.id).await.unwrap(), 3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_course_creator_must_exist(pool: PgPool) {
    let input = CreateCourse {
        title: "Orphan".to_string(),
        description: String::new(),
        tags: vec![],
        is_ai_generated: false,
        video_url: None,
        video_type: None,
        attachments: vec![],
        modules: vec![module("only")],
    };
    let err = CourseRepo::create(&pool, 424_242, &input, &[]).await.unwrap_err();
    let db_err = err.as_database_error().expect("should be a database error");
    assert_eq!(db_err.constraint(), Some("fk_courses_creator"));

    // The failed transaction left nothing behind.
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM course_modules")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_for_user_includes_created_and_enrolled(pool: PgPool) {
    let alice = seed_user(&pool, "alice").await;
    let bob = seed_user(&pool, "bob").await;

    let own = seed_course(&pool, alice, 1).await;
    let enrolled = seed_course(&pool, bob, 1).await;
    let other = seed_course(&pool, bob, 1).await;

    ProgressRepo::enroll(&pool, alice, enrolled.course.id).await.unwrap();

    let mine = CourseRepo::list_for_user(&pool, alice).await.unwrap();
    let ids: Vec<i64> = mine.iter().map(|c| c.id).collect();
    assert_eq!(ids.len(), 2);
    assert!(ids.contains(&own.course.id));
    assert!(ids.contains(&enrolled.course.id));
    assert!(!ids.contains(&other.course.id));
}

// ---------------------------------------------------------------------------
// Enrollment
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_enroll_is_idempotent(pool: PgPool) {
    let creator = seed_user(&pool, "creator").await;
    let learner = seed_user(&pool, "learner").await;
    let course = seed_course(&pool, creator, 2).await;

    let first = ProgressRepo::enroll(&pool, learner, course.course.id).await.unwrap();
    let second = ProgressRepo::enroll(&pool, learner, course.course.id).await.unwrap();

    assert_eq!(first.progress.id, second.progress.id);
    assert_eq!(second.progress.progress, 0);
    assert!(!second.progress.completed);

    let course = CourseRepo::find_by_id(&pool, course.course.id).await.unwrap().unwrap();
    assert_eq!(course.enrollment, 1);
}

// ---------------------------------------------------------------------------
// Progress aggregation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_module_completion_updates_aggregate(pool: PgPool) {
    let creator = seed_user(&pool, "creator").await;
    let learner = seed_user(&pool, "learner").await;
    let course = seed_course(&pool, creator, 4).await;
    let course_id = course.course.id;

    let p = ProgressRepo::set_module_completion(&pool, learner, course_id, 0, true)
        .await
        .unwrap();
    assert_eq!(p.progress.progress, 25);

    let p = ProgressRepo::set_module_completion(&pool, learner, course_id, 2, true)
        .await
        .unwrap();
    assert_eq!(p.progress.progress, 50);
    assert!(!p.progress.completed);
    assert_eq!(p.module_progress.len(), 2);

    // Re-marking the same module does not double count.
    let p = ProgressRepo::set_module_completion(&pool, learner, course_id, 2, true)
        .await
        .unwrap();
    assert_eq!(p.progress.progress, 50);

    let p = ProgressRepo::set_module_completion(&pool, learner, course_id, 2, false)
        .await
        .unwrap();
    assert_eq!(p.progress.progress, 25);

    // First marker write enrolled the learner exactly once.
    let course = CourseRepo::find_by_id(&pool, course_id).await.unwrap().unwrap();
    assert_eq!(course.enrollment, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_all_modules_complete_marks_course_completed(pool: PgPool) {
    let creator = seed_user(&pool, "creator").await;
    let learner = seed_user(&pool, "learner").await;
    let course = seed_course(&pool, creator, 3).await;
    let enrolled = ProgressRepo::enroll(&pool, learner, course.course.id).await.unwrap();

    let markers = [marker(0, true), marker(1, true), marker(2, true)];
    let p = ProgressRepo::apply_markers(&pool, enrolled.progress.id, &markers)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(p.progress.progress, 100);
    assert!(p.progress.completed);
    assert_eq!(ProgressRepo::count_completed_for_user(&pool, learner).await.unwrap(), 1);

    let p = ProgressRepo::apply_markers(&pool, enrolled.progress.id, &[marker(1, false)])
        .await
        .unwrap()
        .unwrap();
    assert_eq!(p.progress.progress, 66);
    assert!(!p.progress.completed);
    assert_eq!(ProgressRepo::count_completed_for_user(&pool, learner).await.unwrap(), 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_apply_markers_missing_record(pool: PgPool) {
    let result = ProgressRepo::apply_markers(&pool, 777, &[marker(0, true)])
        .await
        .unwrap();
    assert!(result.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_course_without_modules_stays_at_zero(pool: PgPool) {
    let creator = seed_user(&pool, "creator").await;
    let learner = seed_user(&pool, "learner").await;
    let course = seed_course(&pool, creator, 0).await;

    let p = ProgressRepo::enroll(&pool, learner, course.course.id).await.unwrap();
    assert_eq!(p.progress.progress, 0);
    assert!(!p.progress.completed);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_concurrent_module_completions_are_all_counted(pool: PgPool) {
    let creator = seed_user(&pool, "creator").await;
    let learner = seed_user(&pool, "learner").await;
    let course_id = seed_course(&pool, creator, 4).await.course.id;

    let mut handles = Vec::new();
    for index in 0..4 {
        let pool = pool.clone();
        handles.push(tokio::spawn(async move {
            ProgressRepo::set_module_completion(&pool, learner, course_id, index, true).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let p = ProgressRepo::find_for_user_course(&pool, learner, course_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(p.module_progress.len(), 4);
    assert_eq!(p.progress.progress, 100);
    assert!(p.progress.completed);

    let course = CourseRepo::find_by_id(&pool, course_id).await.unwrap().unwrap();
    assert_eq!(course.enrollment, 1);
}

// ---------------------------------------------------------------------------
// Completion reward
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_completion_reward_paid_once(pool: PgPool) {
    let creator = seed_user(&pool, "instructor").await;
    let learner = seed_user(&pool, "learner").await;
    let course_id = seed_course(&pool, creator, 2).await.course.id;

    let p = ProgressRepo::set_module_completion(&pool, learner, course_id, 0, true)
        .await
        .unwrap();
    let progress_id = p.progress.id;
    assert!(ProgressRepo::claim_completion_reward(&pool, progress_id, 100)
        .await
        .unwrap()
        .is_none());

    ProgressRepo::set_module_completion(&pool, learner, course_id, 1, true)
        .await
        .unwrap();
    let user = ProgressRepo::claim_completion_reward(&pool, progress_id, 100)
        .await
        .unwrap()
        .expect("first completion pays");
    assert_eq!(user.id, learner);
    assert_eq!(user.coins, 100);

    // Dropping below 100% and completing again does not pay twice.
    ProgressRepo::set_module_completion(&pool, learner, course_id, 1, false)
        .await
        .unwrap();
    ProgressRepo::set_module_completion(&pool, learner, course_id, 1, true)
        .await
        .unwrap();
    assert!(ProgressRepo::claim_completion_reward(&pool, progress_id, 100)
        .await
        .unwrap()
        .is_none());

    let user = UserRepo::find_by_id(&pool, learner).await.unwrap().unwrap();
    assert_eq!(user.coins, 100);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_concurrent_reward_claims_pay_once(pool: PgPool) {
    let creator = seed_user(&pool, "instructor").await;
    let learner = seed_user(&pool, "learner").await;
    let course_id = seed_course(&pool, creator, 1).await.course.id;
    let progress_id = ProgressRepo::set_module_completion(&pool, learner, course_id, 0, true)
        .await
        .unwrap()
        .progress
        .id;

    let handles: Vec<_> = (0..5)
        .map(|_| {
            let pool = pool.clone();
            tokio::spawn(async move {
                ProgressRepo::claim_completion_reward(&pool, progress_id, 100).await
            })
        })
        .collect();
    let mut paid = 0;
    for handle in handles {
        if handle.await.unwrap().unwrap().is_some() {
            paid += 1;
        }
    }
    assert_eq!(paid, 1);

    let user = UserRepo::find_by_id(&pool, learner).await.unwrap().unwrap();
    assert_eq!(user.coins, 100);
}
