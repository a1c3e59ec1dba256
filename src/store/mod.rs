//! Post and comment storage backends.
//!
//! Both stores are async traits so the query layer can hold
//! `Arc<dyn PostStore>` / `Arc<dyn CommentStore>` and stay unaware of the
//! concrete backend. Every backend must:
//!
//! - reject a duplicate id with [`StoreError::Conflict`] without touching the
//!   stored entity;
//! - return [`StoreError::NotFound`] from point lookups that miss;
//! - list through [`paginate`](crate::pagination::paginate), so ordering and
//!   cursor handling are shared.
//!
//! Dropping a returned future cancels the call. A write either lands in full
//! or not at all, and a listing is computed against one snapshot.

pub mod memory;

#[cfg(feature = "postgres")]
pub mod migrations;
#[cfg(feature = "postgres")]
pub mod postgres;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::pagination::PageRequest;
use crate::types::{Comment, CommentConnection, Post, PostConnection};

/// Storage for posts.
#[async_trait]
pub trait PostStore: Send + Sync {
    /// Insert a post keyed by its id.
    async fn add_post(&self, post: Post) -> Result<(), StoreError>;

    /// Fetch a post by id.
    async fn get_post_by_id(&self, id: &str) -> Result<Post, StoreError>;

    /// List posts newest first.
    async fn get_posts(&self, page: &PageRequest) -> Result<PostConnection, StoreError>;
}

/// Storage for comments and their reply tree.
#[async_trait]
pub trait CommentStore: Send + Sync {
    /// Insert a comment keyed by its id.
    async fn add_comment(&self, comment: Comment) -> Result<(), StoreError>;

    /// Fetch a comment by id.
    async fn get_comment_by_id(&self, id: &str) -> Result<Comment, StoreError>;

    /// List every comment of a post (replies included), oldest first.
    async fn get_comments_for_post(
        &self,
        post_id: &str,
        page: &PageRequest,
    ) -> Result<CommentConnection, StoreError>;

    /// List direct replies to a comment, oldest first.
    async fn get_replies_for_comment(
        &self,
        parent_id: &str,
        page: &PageRequest,
    ) -> Result<CommentConnection, StoreError>;
}

pub use memory::{InMemoryCommentStore, InMemoryPostStore, InMemoryStore};

#[cfg(feature = "postgres")]
pub use postgres::{PostgresCommentStore, PostgresConfig, PostgresPostStore, PostgresStores};
