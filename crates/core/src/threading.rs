//! Comment threading for posts.
//!
//! Comments are stored flat with an optional `parent_id`. [`partition_threads`]
//! splits them into top-level comments and replies grouped by parent, both in
//! creation order. Every input comment lands in exactly one place.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

/// Anything that can be placed in a comment thread.
pub trait ThreadNode {
    fn id(&self) -> DbId;
    fn parent_id(&self) -> Option<DbId>;
    fn created_at(&self) -> Timestamp;
}

/// Comments of a post split into top-level entries and replies.
#[derive(Debug, Clone, Serialize)]
pub struct Threads<T> {
    pub top_level: Vec<T>,
    /// Replies keyed by the id of the comment they answer.
    pub replies: BTreeMap<DbId, Vec<T>>,
}

/// A top-level comment together with its direct replies.
#[derive(Debug, Clone, Serialize)]
pub struct CommentThread<T> {
    pub comment: T,
    pub replies: Vec<T>,
}

impl<T> Threads<T> {
    /// Total number of comments across both levels.
    pub fn len(&self) -> usize {
        self.top_level.len() + self.replies.values().map(Vec::len).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: ThreadNode> Threads<T> {
    /// Pair each top-level comment with its replies.
    ///
    /// Replies whose parent is not a top-level comment are not reachable from
    /// this view; they remain available in [`Threads::replies`].
    pub fn into_nested(mut self) -> Vec<CommentThread<T>> {
        self.top_level
            .into_iter()
            .map(|comment| {
                let replies = self.replies.remove(&comment.id()).unwrap_or_default();
                CommentThread { comment, replies }
            })
            .collect()
    }
}

fn by_creation<T: ThreadNode>(a: &T, b: &T) -> std::cmp::Ordering {
    a.created_at()
        .cmp(&b.created_at())
        .then_with(|| a.id().cmp(&b.id()))
}

/// Partition a flat comment list into threads, oldest first at both levels.
pub fn partition_threads<T: ThreadNode>(comments: Vec<T>) -> Threads<T> {
    let mut top_level = Vec::new();
    let mut replies: BTreeMap<DbId, Vec<T>> = BTreeMap::new();

    for comment in comments {
        match comment.parent_id() {
            None => top_level.push(comment),
            Some(parent) => replies.entry(parent).or_default().push(comment),
        }
    }

    top_level.sort_by(by_creation);
    for list in replies.values_mut() {
        list.sort_by(by_creation);
    }

    Threads { top_level, replies }
}

/// Only top-level comments accept replies.
pub fn validate_reply_depth<T: ThreadNode>(parent: &T) -> Result<(), CoreError> {
    if parent.parent_id().is_some() {
        return Err(CoreError::Validation(format!(
            "Comment {} is itself a reply; replies can only be made to top-level comments",
            parent.id()
        )));
    }
    Ok(())
}
