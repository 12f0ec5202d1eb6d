//! Field limits and normalization shared by the DB and API layers.

use crate::error::CoreError;

pub const MAX_TITLE_LENGTH: u64 = 200;
pub const MAX_BODY_LENGTH: u64 = 50_000;
pub const MAX_COMMENT_LENGTH: u64 = 10_000;
pub const MIN_USERNAME_LENGTH: u64 = 3;
pub const MAX_USERNAME_LENGTH: u64 = 50;
pub const MAX_MODULES_PER_COURSE: usize = 200;
pub const MAX_TAGS: usize = 20;
pub const MAX_TAG_LENGTH: usize = 50;
pub const MAX_ATTACHMENTS: usize = 20;

/// Trim, lowercase and de-duplicate tags, preserving first-seen order.
///
/// Empty tags are dropped. Fails if more than [`MAX_TAGS`] remain or any tag
/// exceeds [`MAX_TAG_LENGTH`] characters.
pub fn normalize_tags(tags: &[String]) -> Result<Vec<String>, CoreError> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for raw in tags {
        let tag = raw.trim().to_lowercase();
        if tag.is_empty() {
            continue;
        }
        if tag.chars().count() > MAX_TAG_LENGTH {
            return Err(CoreError::Validation(format!(
                "Tag '{tag}' exceeds {MAX_TAG_LENGTH} characters"
            )));
        }
        if !out.contains(&tag) {
            out.push(tag);
        }
    }
    if out.len() > MAX_TAGS {
        return Err(CoreError::Validation(format!(
            "At most {MAX_TAGS} tags are allowed, got {}",
            out.len()
        )));
    }
    Ok(out)
}

/// Usernames are ASCII letters, digits, `_`, `-` and `.`.
pub fn validate_username_chars(username: &str) -> Result<(), CoreError> {
    if username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
    {
        Ok(())
    } else {
        Err(CoreError::Validation(
            "Username may only contain letters, digits, '_', '-' and '.'".into(),
        ))
    }
}

/// Reject a list that has more than `max` entries.
pub fn validate_max_items(field: &str, len: usize, max: usize) -> Result<(), CoreError> {
    if len > max {
        return Err(CoreError::Validation(format!(
            "{field} may contain at most {max} entries, got {len}"
        )));
    }
    Ok(())
}
