//! Post entity.

use serde::{Deserialize, Serialize};

/// A top-level post that comments hang off.
///
/// Created once through [`PostStore::add_post`](crate::store::PostStore::add_post)
/// and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Opaque unique identifier, doubles as the pagination cursor.
    pub id: String,
    /// Author display name.
    pub author: String,
    /// Post title.
    pub title: String,
    /// Post body.
    pub content: String,
    /// RFC 3339 creation timestamp, kept as text.
    pub created_at: String,
    /// Whether new comments may be attached to this post.
    pub allow_comments: bool,
}

impl Post {
    /// Create a post that accepts comments.
    pub fn new(
        id: impl Into<String>,
        author: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
        created_at: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            author: author.into(),
            title: title.into(),
            content: content.into(),
            created_at: created_at.into(),
            allow_comments: true,
        }
    }

    /// Set whether the post accepts comments.
    pub fn with_allow_comments(mut self, allow_comments: bool) -> Self {
        self.allow_comments = allow_comments;
        self
    }
}
