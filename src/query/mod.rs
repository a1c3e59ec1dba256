//! Query front end over the store traits.
//!
//! Field-level operations as a client-facing API would expose them: page
//! size defaults, input validation, id and timestamp assignment, and reply
//! tree materialization. Only the store traits are used, never a concrete
//! backend.

pub mod validator;

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::pagination::PageRequest;
use crate::store::{CommentStore, PostStore};
use crate::types::{now_timestamp, Comment, CommentConnection, Post, PostConnection};
use crate::DEFAULT_PAGE_SIZE;

pub use validator::{validate_create_comment, validate_create_post, ValidationError};

/// Error returned by [`Resolver`] operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    /// Input failed one or more checks.
    #[error("validation errors: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
    /// The store failed the operation.
    #[error(transparent)]
    Store(#[from] StoreError),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl QueryError {
    /// Validation failures, if this is a validation error.
    pub fn validation_errors(&self) -> Option<&[ValidationError]> {
        match self {
            Self::Validation(errors) => Some(errors),
            Self::Store(_) => None,
        }
    }
}

/// Input for [`Resolver::create_post`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostInput {
    /// Post title.
    pub title: String,
    /// Author display name.
    pub author: String,
    /// Post body.
    pub content: String,
    /// Whether the post accepts comments.
    pub allow_comments: bool,
}

/// Input for [`Resolver::create_comment`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentInput {
    /// Post to comment on.
    pub post_id: String,
    /// Comment being replied to, if any.
    #[serde(default)]
    pub parent_id: Option<String>,
    /// Author display name.
    pub author: String,
    /// Comment body.
    pub content: String,
}

/// Limits for [`Resolver::thread`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreadOptions {
    /// Comments per level; `0` loads every comment.
    pub page_size: usize,
    /// Reply levels below the top-level comments to load.
    pub max_depth: usize,
}

impl Default for ThreadOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            max_depth: 8,
        }
    }
}

/// A comment with its loaded replies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadNode {
    /// The comment.
    pub comment: Comment,
    /// Loaded replies, oldest first.
    pub replies: Vec<ThreadNode>,
    /// Replies exist that were not loaded (page or depth limit).
    pub has_more_replies: bool,
}

/// A post with its materialized reply tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Thread {
    /// The post.
    pub post: Post,
    /// Top-level comments, oldest first.
    pub comments: Vec<ThreadNode>,
    /// Top-level comments exist that were not loaded.
    pub has_more_comments: bool,
}

type NodesFuture<'a> =
    Pin<Box<dyn Future<Output = Result<(Vec<ThreadNode>, bool), StoreError>> + Send + 'a>>;

/// Resolves client operations against injected stores.
#[derive(Clone)]
pub struct Resolver {
    posts: Arc<dyn PostStore>,
    comments: Arc<dyn CommentStore>,
}

impl Resolver {
    /// Create a resolver over the given stores.
    pub fn new(posts: Arc<dyn PostStore>, comments: Arc<dyn CommentStore>) -> Self {
        Self { posts, comments }
    }

    /// Fetch one post.
    pub async fn post(&self, id: &str) -> Result<Post, QueryError> {
        Ok(self.posts.get_post_by_id(id).await?)
    }

    /// List posts newest first. `first` defaults to [`DEFAULT_PAGE_SIZE`].
    pub async fn posts(
        &self,
        first: Option<i32>,
        after: Option<String>,
    ) -> Result<PostConnection, QueryError> {
        let page = page_request(first, after)?;
        Ok(self.posts.get_posts(&page).await?)
    }

    /// Fetch one comment.
    pub async fn comment(&self, id: &str) -> Result<Comment, QueryError> {
        Ok(self.comments.get_comment_by_id(id).await?)
    }

    /// The post a comment belongs to.
    pub async fn post_of_comment(&self, comment: &Comment) -> Result<Post, QueryError> {
        Ok(self.posts.get_post_by_id(&comment.post_id).await?)
    }

    /// List every comment of a post, oldest first.
    pub async fn comments_for_post(
        &self,
        post_id: &str,
        first: Option<i32>,
        after: Option<String>,
    ) -> Result<CommentConnection, QueryError> {
        let page = page_request(first, after)?;
        Ok(self.comments.get_comments_for_post(post_id, &page).await?)
    }

    /// List direct replies to a comment, oldest first.
    pub async fn replies(
        &self,
        comment_id: &str,
        first: Option<i32>,
        after: Option<String>,
    ) -> Result<CommentConnection, QueryError> {
        let page = page_request(first, after)?;
        Ok(self.comments.get_replies_for_comment(comment_id, &page).await?)
    }

    /// Validate and store a new post with a fresh id and timestamp.
    pub async fn create_post(&self, input: CreatePostInput) -> Result<Post, QueryError> {
        let errors = validate_create_post(&input.title, &input.author, &input.content);
        if !errors.is_empty() {
            tracing::warn!(errors = errors.len(), "Rejected post input");
            return Err(QueryError::Validation(errors));
        }

        let post = Post::new(
            uuid::Uuid::new_v4().to_string(),
            input.author,
            input.title,
            input.content,
            now_timestamp(),
        )
        .with_allow_comments(input.allow_comments);

        self.posts.add_post(post.clone()).await?;
        tracing::info!(post_id = %post.id, "Post created");
        Ok(post)
    }

    /// Validate and store a new comment with a fresh id and timestamp.
    pub async fn create_comment(&self, input: CreateCommentInput) -> Result<Comment, QueryError> {
        let errors = validate_create_comment(
            self.posts.as_ref(),
            self.comments.as_ref(),
            &input.author,
            &input.content,
            &input.post_id,
            input.parent_id.as_deref(),
        )
        .await?;
        if !errors.is_empty() {
            tracing::warn!(
                post_id = %input.post_id,
                errors = errors.len(),
                "Rejected comment input"
            );
            return Err(QueryError::Validation(errors));
        }

        let mut comment = Comment::new(
            uuid::Uuid::new_v4().to_string(),
            input.post_id,
            input.author,
            input.content,
            now_timestamp(),
        );
        comment.parent_id = input.parent_id;

        self.comments.add_comment(comment.clone()).await?;
        tracing::info!(
            comment_id = %comment.id,
            post_id = %comment.post_id,
            parent_id = ?comment.parent_id,
            "Comment created"
        );
        Ok(comment)
    }

    /// Load a post and its reply tree.
    ///
    /// Top-level comments come from one listing of the post; each level
    /// below is one [`CommentStore::get_replies_for_comment`] call per node.
    pub async fn thread(
        &self,
        post_id: &str,
        options: ThreadOptions,
    ) -> Result<Thread, QueryError> {
        let post = self.posts.get_post_by_id(post_id).await?;

        let all = self
            .comments
            .get_comments_for_post(post_id, &PageRequest::all())
            .await?;
        let mut roots: Vec<Comment> = all
            .into_nodes()
            .into_iter()
            .filter(Comment::is_top_level)
            .collect();

        let has_more_comments = options.page_size != 0 && roots.len() > options.page_size;
        if has_more_comments {
            roots.truncate(options.page_size);
        }

        let mut comments = Vec::with_capacity(roots.len());
        for root in roots {
            let (replies, has_more_replies) = self.load_replies(&root.id, 1, options).await?;
            comments.push(ThreadNode {
                comment: root,
                replies,
                has_more_replies,
            });
        }

        tracing::debug!(
            post_id = %post_id,
            top_level = comments.len(),
            has_more_comments,
            "Thread materialized"
        );
        Ok(Thread {
            post,
            comments,
            has_more_comments,
        })
    }

    fn load_replies<'a>(
        &'a self,
        parent_id: &'a str,
        depth: usize,
        options: ThreadOptions,
    ) -> NodesFuture<'a> {
        Box::pin(async move {
            let page = PageRequest::new(options.page_size);
            let replies = self.comments.get_replies_for_comment(parent_id, &page).await?;

            if depth > options.max_depth {
                return Ok((Vec::new(), !replies.is_empty()));
            }

            let has_more = replies.page_info.has_next_page;
            let mut nodes = Vec::with_capacity(replies.len());
            for reply in replies.into_nodes() {
                let (children, has_more_replies) =
                    self.load_replies(&reply.id, depth + 1, options).await?;
                nodes.push(ThreadNode {
                    comment: reply,
                    replies: children,
                    has_more_replies,
                });
            }
            Ok((nodes, has_more))
        })
    }
}

/// Translate client paging arguments into a [`PageRequest`].
fn page_request(first: Option<i32>, after: Option<String>) -> Result<PageRequest, QueryError> {
    let first = match first {
        None => DEFAULT_PAGE_SIZE,
        Some(n) => usize::try_from(n).map_err(|_| {
            QueryError::Validation(vec![ValidationError::new("first", "first cannot be negative")])
        })?,
    };
    Ok(PageRequest { first, after })
}
