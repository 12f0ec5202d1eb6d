//! Community post types.

use serde::{Deserialize, Serialize};

pub const POST_TYPE_DISCUSSION: &str = "discussion";
pub const POST_TYPE_BLOG: &str = "blog";
pub const POST_TYPE_MEME: &str = "meme";

/// All valid post type strings.
pub const VALID_POST_TYPES: &[&str] = &[POST_TYPE_DISCUSSION, POST_TYPE_BLOG, POST_TYPE_MEME];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostType {
    Discussion,
    Blog,
    Meme,
}

impl PostType {
    /// Convert from a database string value.
    pub fn from_str_value(s: &str) -> Result<Self, String> {
        match s {
            POST_TYPE_DISCUSSION => Ok(Self::Discussion),
            POST_TYPE_BLOG => Ok(Self::Blog),
            POST_TYPE_MEME => Ok(Self::Meme),
            _ => Err(format!(
                "Invalid post type '{s}'. Must be one of: {}",
                VALID_POST_TYPES.join(", ")
            )),
        }
    }

    /// Convert to the database string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Discussion => POST_TYPE_DISCUSSION,
            Self::Blog => POST_TYPE_BLOG,
            Self::Meme => POST_TYPE_MEME,
        }
    }
}
