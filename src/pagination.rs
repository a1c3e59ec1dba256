//! Cursor pagination shared by every listing and every backend.
//!
//! Backends only produce the filtered candidate set. Everything after that
//! is done here, so the in-memory and PostgreSQL stores page identically:
//!
//! ```text
//! candidates → parse createdAt → sort → locate cursor → slice → PageInfo
//! ```
//!
//! ## Rules
//!
//! - Any unparseable `createdAt` fails the whole call with
//!   [`StoreError::DataIntegrity`]; no partial page is produced.
//! - Ties on `createdAt` are broken by id ascending.
//! - An empty, unknown or stale `after` cursor starts from the beginning.
//! - `first == 0` returns every remaining entry.

use crate::error::StoreError;
use crate::types::{parse_timestamp, Comment, Connection, Edge, EntityKind, PageInfo, Post};

/// An entity that can be listed through a [`Connection`].
pub trait Paginated: Clone {
    /// Kind reported in integrity errors.
    const KIND: EntityKind;

    /// Cursor for this entity (its id).
    fn cursor(&self) -> &str;

    /// Raw `createdAt` text.
    fn created_at(&self) -> &str;
}

impl Paginated for Post {
    const KIND: EntityKind = EntityKind::Post;

    fn cursor(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> &str {
        &self.created_at
    }
}

impl Paginated for Comment {
    const KIND: EntityKind = EntityKind::Comment;

    fn cursor(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> &str {
        &self.created_at
    }
}

/// Direction of the `createdAt` sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Oldest first (comment threads).
    Ascending,
    /// Newest first (post feed).
    Descending,
}

/// Forward pagination parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageRequest {
    /// Maximum edges to return; `0` means all remaining.
    pub first: usize,
    /// Return entries strictly after the edge with this cursor.
    pub after: Option<String>,
}

impl PageRequest {
    /// First page of `first` entries.
    pub fn new(first: usize) -> Self {
        Self { first, after: None }
    }

    /// Every entry in one page.
    pub fn all() -> Self {
        Self::default()
    }

    /// Resume after `cursor`.
    pub fn after(mut self, cursor: impl Into<String>) -> Self {
        self.after = Some(cursor.into());
        self
    }

    /// The `after` cursor, treating an empty string as absent.
    pub fn after_cursor(&self) -> Option<&str> {
        self.after.as_deref().filter(|c| !c.is_empty())
    }
}

/// Sort, slice and wrap `candidates` into a [`Connection`].
///
/// Only the returned slice is cloned.
pub fn paginate<'a, T, I>(
    candidates: I,
    order: SortOrder,
    request: &PageRequest,
) -> Result<Connection<T>, StoreError>
where
    T: Paginated + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut keyed = Vec::new();
    for node in candidates {
        let at = parse_timestamp(node.created_at()).map_err(|e| StoreError::DataIntegrity {
            kind: T::KIND,
            id: node.cursor().to_string(),
            value: node.created_at().to_string(),
            reason: e.to_string(),
        })?;
        keyed.push((at, node));
    }

    keyed.sort_by(|a, b| {
        let by_time = match order {
            SortOrder::Ascending => a.0.cmp(&b.0),
            SortOrder::Descending => b.0.cmp(&a.0),
        };
        by_time.then_with(|| a.1.cursor().cmp(b.1.cursor()))
    });

    let after = request.after_cursor();
    let start = after
        .and_then(|cursor| keyed.iter().position(|(_, node)| node.cursor() == cursor))
        .map_or(0, |index| index + 1);

    let len = keyed.len();
    let end = if request.first == 0 {
        len
    } else {
        start.saturating_add(request.first).min(len)
    };

    let edges: Vec<Edge<T>> = keyed[start..end]
        .iter()
        .map(|(_, node)| Edge::new(node.cursor(), (*node).clone()))
        .collect();
    let page_info = PageInfo::from_edges(&edges, end < len, after.is_some());

    Ok(Connection { edges, page_info })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(id: &str, created_at: &str) -> Post {
        Post::new(id, "author", "title", "content", created_at)
    }

    fn feed() -> Vec<Post> {
        vec![
            post("a", "2024-01-15T10:00:00Z"),
            post("b", "2024-01-15T12:00:00Z"),
            post("c", "2024-01-15T11:00:00Z"),
            post("d", "2024-01-15T09:00:00Z"),
        ]
    }

    #[test]
    fn test_descending_order() {
        let posts = feed();
        let page = paginate(&posts, SortOrder::Descending, &PageRequest::all()).unwrap();

        assert_eq!(page.cursors(), vec!["b", "c", "a", "d"]);
        assert!(!page.page_info.has_next_page);
        assert!(!page.page_info.has_previous_page);
    }

    #[test]
    fn test_ascending_order() {
        let posts = feed();
        let page = paginate(&posts, SortOrder::Ascending, &PageRequest::all()).unwrap();
        assert_eq!(page.cursors(), vec!["d", "a", "c", "b"]);
    }

    #[test]
    fn test_ties_broken_by_id() {
        let posts = vec![
            post("z", "2024-01-15T10:00:00Z"),
            post("m", "2024-01-15T10:00:00Z"),
            post("a", "2024-01-15T10:00:00Z"),
        ];
        let desc = paginate(&posts, SortOrder::Descending, &PageRequest::all()).unwrap();
        let asc = paginate(&posts, SortOrder::Ascending, &PageRequest::all()).unwrap();

        assert_eq!(desc.cursors(), vec!["a", "m", "z"]);
        assert_eq!(asc.cursors(), vec!["a", "m", "z"]);
    }

    #[test]
    fn test_first_limits_and_sets_next_page() {
        let posts = feed();
        let page = paginate(&posts, SortOrder::Descending, &PageRequest::new(2)).unwrap();

        assert_eq!(page.cursors(), vec!["b", "c"]);
        assert!(page.page_info.has_next_page);
        assert_eq!(page.page_info.start_cursor.as_deref(), Some("b"));
        assert_eq!(page.page_info.end_cursor.as_deref(), Some("c"));
    }

    #[test]
    fn test_after_cursor_is_excluded() {
        let posts = feed();
        let request = PageRequest::new(2).after("c");
        let page = paginate(&posts, SortOrder::Descending, &request).unwrap();

        assert_eq!(page.cursors(), vec!["a", "d"]);
        assert!(!page.page_info.has_next_page);
        assert!(page.page_info.has_previous_page);
    }

    #[test]
    fn test_first_zero_returns_remaining() {
        let posts = feed();
        let request = PageRequest::new(0).after("b");
        let page = paginate(&posts, SortOrder::Descending, &request).unwrap();

        assert_eq!(page.cursors(), vec!["c", "a", "d"]);
        assert!(!page.page_info.has_next_page);
    }

    #[test]
    fn test_first_larger_than_remaining_is_clamped() {
        let posts = feed();
        let request = PageRequest::new(50).after("a");
        let page = paginate(&posts, SortOrder::Descending, &request).unwrap();

        assert_eq!(page.cursors(), vec!["d"]);
        assert!(!page.page_info.has_next_page);
    }

    #[test]
    fn test_unknown_cursor_restarts() {
        let posts = feed();
        let request = PageRequest::new(2).after("gone");
        let page = paginate(&posts, SortOrder::Descending, &request).unwrap();

        assert_eq!(page.cursors(), vec!["b", "c"]);
        assert!(page.page_info.has_previous_page);
    }

    #[test]
    fn test_empty_cursor_is_absent() {
        let posts = feed();
        let request = PageRequest::new(1).after("");
        let page = paginate(&posts, SortOrder::Descending, &request).unwrap();

        assert_eq!(page.cursors(), vec!["b"]);
        assert!(!page.page_info.has_previous_page);
    }

    #[test]
    fn test_last_cursor_yields_empty_page() {
        let posts = feed();
        let request = PageRequest::new(10).after("d");
        let page = paginate(&posts, SortOrder::Descending, &request).unwrap();

        assert!(page.is_empty());
        assert!(!page.page_info.has_next_page);
        assert_eq!(page.page_info.start_cursor, None);
        assert_eq!(page.page_info.end_cursor, None);
    }

    #[test]
    fn test_bad_timestamp_fails_whole_listing() {
        let mut posts = feed();
        posts.push(post("bad", "not-a-date"));

        let err = paginate(&posts, SortOrder::Descending, &PageRequest::new(1)).unwrap_err();
        match err {
            StoreError::DataIntegrity { kind, id, value, .. } => {
                assert_eq!(kind, EntityKind::Post);
                assert_eq!(id, "bad");
                assert_eq!(value, "not-a-date");
            }
            other => panic!("expected DataIntegrity, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_candidates() {
        let posts: Vec<Post> = Vec::new();
        let page = paginate(&posts, SortOrder::Descending, &PageRequest::new(10)).unwrap();
        assert_eq!(page, Connection::empty());
    }
}
