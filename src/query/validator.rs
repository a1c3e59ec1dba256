//! Input validation for mutations.
//!
//! Every check runs and all failures are reported together, except when the
//! parent comment cannot be loaded: its post cannot be compared then.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::store::{CommentStore, PostStore};
use crate::MAX_COMMENT_LENGTH;

/// One failed field check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Input field name, as exposed to clients.
    pub field: String,
    /// Human-readable reason.
    pub message: String,
}

impl ValidationError {
    /// Create a validation error.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "validation error in field '{}': {}", self.field, self.message)
    }
}

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// Check the fields of a new post.
pub fn validate_create_post(title: &str, author: &str, content: &str) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if is_blank(title) {
        errors.push(ValidationError::new("title", "title cannot be empty"));
    }
    if is_blank(author) {
        errors.push(ValidationError::new("author", "author cannot be empty"));
    }
    if is_blank(content) {
        errors.push(ValidationError::new("content", "content cannot be empty"));
    }

    errors
}

/// Check the fields of a new comment and its references.
///
/// Looks up the post and, when given, the parent comment. A missing entity
/// is a validation error; any other store failure is returned as `Err`.
pub async fn validate_create_comment(
    posts: &dyn PostStore,
    comments: &dyn CommentStore,
    author: &str,
    content: &str,
    post_id: &str,
    parent_id: Option<&str>,
) -> Result<Vec<ValidationError>, StoreError> {
    let mut errors = Vec::new();

    if is_blank(author) {
        errors.push(ValidationError::new("author", "author cannot be empty"));
    }
    if is_blank(content) {
        errors.push(ValidationError::new("content", "content cannot be empty"));
    }
    if content.chars().count() > MAX_COMMENT_LENGTH {
        errors.push(ValidationError::new(
            "content",
            format!("comment cannot be longer than {MAX_COMMENT_LENGTH} characters"),
        ));
    }

    if is_blank(post_id) {
        errors.push(ValidationError::new("postId", "postId cannot be empty"));
    } else {
        match posts.get_post_by_id(post_id).await {
            Ok(post) if !post.allow_comments => errors.push(ValidationError::new(
                "postId",
                format!("comments are disabled for post with id {post_id}"),
            )),
            Ok(_) => {}
            Err(e) if e.is_not_found() => errors.push(ValidationError::new(
                "postId",
                format!("post with id {post_id} not found"),
            )),
            Err(e) => {
                tracing::warn!(
                    post_id = %post_id,
                    error = %e,
                    "Post lookup failed during validation"
                );
                return Err(e);
            }
        }
    }

    if let Some(parent_id) = parent_id {
        if is_blank(parent_id) {
            errors.push(ValidationError::new("parentId", "parentId cannot be empty"));
            return Ok(errors);
        }

        match comments.get_comment_by_id(parent_id).await {
            Ok(parent) if parent.post_id != post_id => errors.push(ValidationError::new(
                "parentId",
                format!(
                    "parent comment with id {parent_id} does not belong to post with id {post_id}"
                ),
            )),
            Ok(_) => {}
            Err(e) if e.is_not_found() => errors.push(ValidationError::new(
                "parentId",
                format!("parent comment with id {parent_id} not found"),
            )),
            Err(e) => {
                tracing::warn!(
                    comment_id = %parent_id,
                    error = %e,
                    "Parent lookup failed during validation"
                );
                return Err(e);
            }
        }
    }

    Ok(errors)
}
