//! Core types for the discussion store.

pub mod post;
pub mod comment;
pub mod connection;
pub mod timestamp;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use post::Post;
pub use comment::Comment;
pub use connection::{Edge, PageInfo, Connection, PostConnection, CommentConnection};
pub use timestamp::{parse_timestamp, now_timestamp, format_timestamp};

/// Kind of entity an operation or error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// A [`Post`].
    Post,
    /// A [`Comment`].
    Comment,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Post => write!(f, "post"),
            Self::Comment => write!(f, "comment"),
        }
    }
}
