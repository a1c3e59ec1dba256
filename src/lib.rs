//! # discussion-store
//!
//! Posts and threaded comments behind pluggable storage, listed through
//! Relay-style cursor pagination.
//!
//! ## Core Contract
//!
//! 1. [`PostStore`] and [`CommentStore`] are the only interfaces callers use
//! 2. Every listing returns a [`Connection`] whose cursors are entity ids
//! 3. Both backends page identically because they share [`pagination::paginate`]
//!
//! ## Architecture
//!
//! ```text
//! Resolver (query front end) → PostStore / CommentStore
//!                                     ↓
//!                     InMemory or Postgres candidates
//!                                     ↓
//!                      paginate → Connection<Post | Comment>
//! ```
//!
//! ## Ordering Guarantees
//!
//! - Posts list newest first, comments oldest first
//! - Ties on `createdAt` are ordered by id
//! - An unparseable `createdAt` fails the whole listing

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod types;
pub mod error;
pub mod pagination;
pub mod store;
pub mod config;
pub mod query;

// Re-exports
pub use types::{
    Post, Comment, Edge, PageInfo, Connection, PostConnection, CommentConnection, EntityKind,
};
pub use error::StoreError;
pub use pagination::{paginate, PageRequest, Paginated, SortOrder};
pub use store::{
    PostStore, CommentStore, InMemoryStore, InMemoryPostStore, InMemoryCommentStore,
};
#[cfg(feature = "postgres")]
pub use store::{PostgresConfig, PostgresStores, PostgresPostStore, PostgresCommentStore};
pub use config::{open_stores, StoreConfig, StoreHandles, StorageKind};
pub use query::{
    Resolver, QueryError, ValidationError, CreatePostInput, CreateCommentInput,
    Thread, ThreadNode, ThreadOptions,
};

/// Page size used when a client omits `first`.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Maximum comment length in characters.
pub const MAX_COMMENT_LENGTH: usize = 2000;
