//! Integration tests for posts, comments and votes.

use sqlx::PgPool;
use vskill_core::post_type::PostType;
use vskill_core::threading::partition_threads;
use vskill_db::models::comment::CreateComment;
use vskill_db::models::post::{CreatePost, PostListParams};
use vskill_db::models::user::CreateUser;
use vskill_db::repositories::{CommentRepo, PostRepo, UserRepo};

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

fn new_post(title: &str, post_type: PostType) -> CreatePost {
    CreatePost {
        title: title.to_string(),
        content: "Body".to_string(),
        post_type,
        tags: vec![],
        attachments: vec![],
    }
}

fn comment(content: &str, parent_id: Option<i64>) -> CreateComment {
    CreateComment {
        content: content.to_string(),
        parent_id,
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_posts_filters_by_type(pool: PgPool) {
    let author = seed_user(&pool, "author").await;
    PostRepo::create(&pool, author, &new_post("Talk", PostType::Discussion), &[])
        .await
        .unwrap();
    PostRepo::create(&pool, author, &new_post("Funny", PostType::Meme), &[])
        .await
        .unwrap();
    PostRepo::create(&pool, author, &new_post("Essay", PostType::Blog), &[])
        .await
        .unwrap();

    let all = PostRepo::list(&pool, &PostListParams::default()).await.unwrap();
    assert_eq!(all.len(), 3);

    let memes = PostRepo::list(
        &pool,
        &PostListParams {
            post_type: Some(PostType::Meme),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(memes.len(), 1);
    assert_eq!(memes[0].title, "Funny");
    assert_eq!(memes[0].post_type, "meme");

    let page = PostRepo::list(
        &pool,
        &PostListParams {
            limit: Some(2),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(page.len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_concurrent_upvotes_all_count(pool: PgPool) {
    let author = seed_user(&pool, "author").await;
    let post = PostRepo::create(&pool, author, &new_post("Vote me", PostType::Discussion), &[])
        .await
        .unwrap();

    let post_id = post.id;

    let mut handles = Vec::new();
    for _ in 0..10 {
        let pool = pool.clone();
        handles.push(tokio::spawn(async move { PostRepo::upvote(&pool, post_id).await }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let post = PostRepo::find_by_id(&pool, post_id).await.unwrap().unwrap();
    assert_eq!(post.upvotes, 10);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_vote_missing_targets(pool: PgPool) {
    assert!(PostRepo::upvote(&pool, 5_000).await.unwrap().is_none());
    assert!(CommentRepo::upvote(&pool, 5_000).await.unwrap().is_none());
    assert!(CommentRepo::downvote(&pool, 5_000).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_comment_votes(pool: PgPool) {
    let author = seed_user(&pool, "author").await;
    let post = PostRepo::create(&pool, author, &new_post("Votes", PostType::Discussion), &[])
        .await
        .unwrap();
    let c = CommentRepo::create(&pool, post.id, author, &comment("hi", None))
        .await
        .unwrap();

    CommentRepo::upvote(&pool, c.id).await.unwrap();
    CommentRepo::upvote(&pool, c.id).await.unwrap();
    let c = CommentRepo::downvote(&pool, c.id).await.unwrap().unwrap();
    assert_eq!(c.upvotes, 2);
    assert_eq!(c.downvotes, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_comments_thread_by_parent(pool: PgPool) {
    let author = seed_user(&pool, "author").await;
    let replier = seed_user(&pool, "replier").await;
    let post = PostRepo::create(&pool, author, &new_post("Thread", PostType::Discussion), &[])
        .await
        .unwrap();

    let root_a = CommentRepo::create(&pool, post.id, author, &comment("first", None))
        .await
        .unwrap();
    let reply = CommentRepo::create(&pool, post.id, replier, &comment("reply", Some(root_a.id)))
        .await
        .unwrap();
    let root_b = CommentRepo::create(&pool, post.id, replier, &comment("second", None))
        .await
        .unwrap();

    let flat = CommentRepo::list_for_post(&pool, post.id).await.unwrap();
    assert_eq!(flat.len(), 3);

    let threads = partition_threads(flat);
    let top: Vec<i64> = threads.top_level.iter().map(|c| c.id).collect();
    assert_eq!(top, vec![root_a.id, root_b.id]);
    assert_eq!(threads.replies[&root_a.id][0].id, reply.id);
    assert!(!threads.replies.contains_key(&root_b.id));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_comment_parent_must_exist(pool: PgPool) {
    let author = seed_user(&pool, "author").await;
    let post = PostRepo::create(&pool, author, &new_post("Orphans", PostType::Blog), &[])
        .await
        .unwrap();

    let err = CommentRepo::create(&pool, post.id, author, &comment("lost", Some(99_999)))
        .await
        .unwrap_err();
    let db_err = err.as_database_error().expect("should be a database error");
    assert_eq!(db_err.constraint(), Some("fk_comments_parent"));
}
