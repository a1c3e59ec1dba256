//! Comment entity.

use serde::{Deserialize, Serialize};

/// A comment on a post, optionally replying to another comment.
///
/// `parent_id` links replies into a tree under one post. The store does not
/// check that the parent exists or shares the post; the query layer does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// Opaque unique identifier, doubles as the pagination cursor.
    pub id: String,
    /// Owning post.
    pub post_id: String,
    /// Comment this one replies to, if any.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub parent_id: Option<String>,
    /// Author display name.
    pub author: String,
    /// Comment body, at most [`MAX_COMMENT_LENGTH`](crate::MAX_COMMENT_LENGTH) characters.
    pub content: String,
    /// RFC 3339 creation timestamp, kept as text.
    pub created_at: String,
}

impl Comment {
    /// Create a top-level comment.
    pub fn new(
        id: impl Into<String>,
        post_id: impl Into<String>,
        author: impl Into<String>,
        content: impl Into<String>,
        created_at: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            post_id: post_id.into(),
            parent_id: None,
            author: author.into(),
            content: content.into(),
            created_at: created_at.into(),
        }
    }

    /// Make this comment a reply to `parent_id`.
    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    /// True when the comment replies directly to the post.
    pub fn is_top_level(&self) -> bool {
        self.parent_id.is_none()
    }
}
