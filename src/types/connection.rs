//! Relay-style connection envelope shared by every listing.

use serde::{Deserialize, Serialize};

use super::{Comment, Post};

/// One `(cursor, node)` pair inside a [`Connection`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge<T> {
    /// Resume position; equals the node id.
    pub cursor: String,
    /// The entity itself.
    pub node: T,
}

impl<T> Edge<T> {
    /// Create an edge.
    pub fn new(cursor: impl Into<String>, node: T) -> Self {
        Self {
            cursor: cursor.into(),
            node,
        }
    }
}

/// Page metadata derived from the returned edges.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// More entries exist after the last returned edge.
    pub has_next_page: bool,
    /// An `after` cursor was supplied. Not a real look-back check.
    pub has_previous_page: bool,
    /// Cursor of the first edge.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub start_cursor: Option<String>,
    /// Cursor of the last edge.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub end_cursor: Option<String>,
}

impl PageInfo {
    /// Derive page info from a slice of edges.
    pub fn from_edges<T>(edges: &[Edge<T>], has_next_page: bool, has_previous_page: bool) -> Self {
        Self {
            has_next_page,
            has_previous_page,
            start_cursor: edges.first().map(|e| e.cursor.clone()),
            end_cursor: edges.last().map(|e| e.cursor.clone()),
        }
    }
}

/// An ordered page of edges plus its [`PageInfo`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection<T> {
    /// Edges in listing order.
    pub edges: Vec<Edge<T>>,
    /// Page metadata.
    pub page_info: PageInfo,
}

impl<T> Connection<T> {
    /// A connection with no edges and no further pages.
    pub fn empty() -> Self {
        Self {
            edges: Vec::new(),
            page_info: PageInfo::default(),
        }
    }

    /// Number of edges on this page.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Check if the page has no edges.
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Iterate over the nodes in listing order.
    pub fn nodes(&self) -> impl Iterator<Item = &T> {
        self.edges.iter().map(|e| &e.node)
    }

    /// Consume the connection, keeping only the nodes.
    pub fn into_nodes(self) -> Vec<T> {
        self.edges.into_iter().map(|e| e.node).collect()
    }

    /// Cursors of every edge, in order.
    pub fn cursors(&self) -> Vec<&str> {
        self.edges.iter().map(|e| e.cursor.as_str()).collect()
    }
}

/// A page of posts.
pub type PostConnection = Connection<Post>;

/// A page of comments.
pub type CommentConnection = Connection<Comment>;
