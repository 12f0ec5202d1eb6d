//! Domain logic for the VSkill learning platform.
//!
//! This crate has no database or HTTP dependencies. Everything here is a
//! pure function over values loaded by the caller, so the same rules apply
//! whether they run inside a repository transaction or a unit test.

pub mod achievements;
pub mod error;
pub mod post_type;
pub mod progress;
pub mod rank;
pub mod streak;
pub mod threading;
pub mod types;
pub mod validation;
pub mod video_type;
