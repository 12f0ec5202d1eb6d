pub mod auth;
pub mod comments;
pub mod courses;
pub mod posts;
pub mod progress;
pub mod users;
