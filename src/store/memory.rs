//! In-memory stores for tests, development and the default deployment.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use parking_lot::RwLock;

use crate::error::StoreError;
use crate::pagination::{paginate, PageRequest, SortOrder};
use crate::types::{
    format_timestamp, Comment, CommentConnection, EntityKind, Post, PostConnection,
};
use super::{CommentStore, PostStore};

/// In-memory post table.
///
/// Many readers may list concurrently; an insert holds the write lock for
/// the single check-and-insert.
#[derive(Debug, Default)]
pub struct InMemoryPostStore {
    posts: RwLock<HashMap<String, Post>>,
}

impl InMemoryPostStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert synchronously. Rejects duplicate ids.
    pub fn insert(&self, post: Post) -> Result<(), StoreError> {
        let mut posts = self.posts.write();
        match posts.entry(post.id.clone()) {
            Entry::Occupied(_) => {
                tracing::warn!(post_id = %post.id, "Rejected duplicate post id");
                Err(StoreError::conflict(EntityKind::Post, post.id))
            }
            Entry::Vacant(slot) => {
                slot.insert(post);
                Ok(())
            }
        }
    }

    /// Get number of posts.
    pub fn len(&self) -> usize {
        self.posts.read().len()
    }

    /// Check if the store holds no posts.
    pub fn is_empty(&self) -> bool {
        self.posts.read().is_empty()
    }
}

#[async_trait]
impl PostStore for InMemoryPostStore {
    async fn add_post(&self, post: Post) -> Result<(), StoreError> {
        let post_id = post.id.clone();
        self.insert(post)?;
        tracing::debug!(post_id = %post_id, "Post added");
        Ok(())
    }

    async fn get_post_by_id(&self, id: &str) -> Result<Post, StoreError> {
        self.posts
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::not_found(EntityKind::Post, id))
    }

    async fn get_posts(&self, page: &PageRequest) -> Result<PostConnection, StoreError> {
        let posts = self.posts.read();
        let connection = paginate(posts.values(), SortOrder::Descending, page)?;

        tracing::debug!(
            edges = connection.len(),
            has_next_page = connection.page_info.has_next_page,
            "Listed posts"
        );
        Ok(connection)
    }
}

/// In-memory comment table.
#[derive(Debug, Default)]
pub struct InMemoryCommentStore {
    comments: RwLock<HashMap<String, Comment>>,
}

impl InMemoryCommentStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert synchronously. Rejects duplicate ids.
    pub fn insert(&self, comment: Comment) -> Result<(), StoreError> {
        let mut comments = self.comments.write();
        match comments.entry(comment.id.clone()) {
            Entry::Occupied(_) => {
                tracing::warn!(comment_id = %comment.id, "Rejected duplicate comment id");
                Err(StoreError::conflict(EntityKind::Comment, comment.id))
            }
            Entry::Vacant(slot) => {
                slot.insert(comment);
                Ok(())
            }
        }
    }

    /// Get number of comments.
    pub fn len(&self) -> usize {
        self.comments.read().len()
    }

    /// Check if the store holds no comments.
    pub fn is_empty(&self) -> bool {
        self.comments.read().is_empty()
    }

    /// Filter and paginate under one read guard.
    fn list_where<F>(&self, page: &PageRequest, keep: F) -> Result<CommentConnection, StoreError>
    where
        F: Fn(&Comment) -> bool,
    {
        let comments = self.comments.read();
        paginate(
            comments.values().filter(|c| keep(*c)),
            SortOrder::Ascending,
            page,
        )
    }
}

#[async_trait]
impl CommentStore for InMemoryCommentStore {
    async fn add_comment(&self, comment: Comment) -> Result<(), StoreError> {
        let comment_id = comment.id.clone();
        let post_id = comment.post_id.clone();
        self.insert(comment)?;
        tracing::debug!(comment_id = %comment_id, post_id = %post_id, "Comment added");
        Ok(())
    }

    async fn get_comment_by_id(&self, id: &str) -> Result<Comment, StoreError> {
        self.comments
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::not_found(EntityKind::Comment, id))
    }

    async fn get_comments_for_post(
        &self,
        post_id: &str,
        page: &PageRequest,
    ) -> Result<CommentConnection, StoreError> {
        let connection = self.list_where(page, |c| c.post_id == post_id)?;
        tracing::debug!(
            post_id = %post_id,
            edges = connection.len(),
            has_next_page = connection.page_info.has_next_page,
            "Listed comments for post"
        );
        Ok(connection)
    }

    async fn get_replies_for_comment(
        &self,
        parent_id: &str,
        page: &PageRequest,
    ) -> Result<CommentConnection, StoreError> {
        let connection = self.list_where(page, |c| c.parent_id.as_deref() == Some(parent_id))?;
        tracing::debug!(
            comment_id = %parent_id,
            edges = connection.len(),
            has_next_page = connection.page_info.has_next_page,
            "Listed replies for comment"
        );
        Ok(connection)
    }
}

/// Both in-memory tables, shareable across request handlers.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    /// Post table.
    pub posts: Arc<InMemoryPostStore>,
    /// Comment table.
    pub comments: Arc<InMemoryCommentStore>,
}

impl InMemoryStore {
    /// Create empty tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create tables pre-filled with a small demo discussion.
    ///
    /// Post `1` accepts comments and carries comment `1`, its reply `2`,
    /// and a second top-level comment `3`. Post `2` has comments disabled.
    pub fn with_demo_data() -> Self {
        let store = Self::new();
        store.seed_demo_data();
        store
    }

    fn seed_demo_data(&self) {
        let now = Utc::now();
        let at = |minutes: i64| format_timestamp(now + Duration::minutes(minutes));

        let posts = [
            Post::new("1", "Author 1", "First post", "Content of the first post", at(60)),
            Post::new("2", "Author 2", "Second post", "Content of the second post", at(0))
                .with_allow_comments(false),
        ];
        let comments = [
            Comment::new("1", "1", "Commenter 1", "First comment on the first post", at(61)),
            Comment::new("2", "1", "Commenter 2", "Reply to the first comment", at(62))
                .with_parent("1"),
            Comment::new("3", "1", "Commenter 3", "Second comment on the first post", at(63)),
        ];

        for post in posts {
            if let Err(e) = self.posts.insert(post) {
                tracing::warn!(error = %e, "Skipped demo post");
            }
        }
        for comment in comments {
            if let Err(e) = self.comments.insert(comment) {
                tracing::warn!(error = %e, "Skipped demo comment");
            }
        }

        tracing::info!(
            posts = self.posts.len(),
            comments = self.comments.len(),
            "Seeded in-memory store with demo data"
        );
    }
}
