//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod comment_repo;
pub mod course_repo;
pub mod post_repo;
pub mod progress_repo;
pub mod session_repo;
pub mod user_repo;

pub use comment_repo::CommentRepo;
pub use course_repo::CourseRepo;
pub use post_repo::PostRepo;
pub use progress_repo::ProgressRepo;
pub use session_repo::SessionRepo;
pub use user_repo::UserRepo;
