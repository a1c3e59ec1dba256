//! Store contract checks shared by every backend's integration tests.
//!
//! Ids are prefixed so the checks can run against a database that already
//! holds other rows.

#![allow(dead_code)]

use chrono::{DateTime, FixedOffset};
use discussion_store::types::parse_timestamp;
use discussion_store::{Comment, CommentStore, PageRequest, Post, PostStore, StoreError};

fn instant(raw: &str) -> DateTime<FixedOffset> {
    parse_timestamp(raw).unwrap()
}

pub fn id(prefix: &str, name: &str) -> String {
    format!("{prefix}{name}")
}

pub fn post(prefix: &str, name: &str, created_at: &str) -> Post {
    Post::new(id(prefix, name), "author", format!("title {name}"), "content", created_at)
}

pub fn comment(prefix: &str, name: &str, post: &str, created_at: &str) -> Comment {
    Comment::new(id(prefix, name), id(prefix, post), "commenter", "text", created_at)
}

pub async fn round_trip(posts: &dyn PostStore, prefix: &str) {
    let original = post(prefix, "rt", "2024-01-15T10:30:00Z").with_allow_comments(false);
    posts.add_post(original.clone()).await.unwrap();

    let fetched = posts.get_post_by_id(&original.id).await.unwrap();
    assert_eq!(fetched, original);
}

pub async fn duplicate_ids_rejected(
    posts: &dyn PostStore,
    comments: &dyn CommentStore,
    prefix: &str,
) {
    let first = post(prefix, "dup", "2024-01-15T10:30:00Z");
    posts.add_post(first.clone()).await.unwrap();
    let err = posts
        .add_post(post(prefix, "dup", "2025-01-01T00:00:00Z"))
        .await
        .unwrap_err();
    assert!(err.is_conflict(), "{err:?}");
    assert_eq!(posts.get_post_by_id(&first.id).await.unwrap(), first);

    let c = comment(prefix, "dupc", "dup", "2024-01-15T10:31:00Z");
    comments.add_comment(c.clone()).await.unwrap();
    let err = comments.add_comment(c).await.unwrap_err();
    assert!(err.is_conflict(), "{err:?}");
}

/// Walks the whole post feed `k` at a time, checking order and coverage.
pub async fn posts_exhaust_in_order(posts: &dyn PostStore, prefix: &str, k: usize) {
    let times = [
        "2024-01-10T08:00:00Z",
        "2024-01-12T08:00:00Z",
        "2024-01-11T08:00:00Z",
        "2024-01-15T08:00:00Z",
        "2024-01-13T08:00:00+02:00",
        "2024-01-14T08:00:00Z",
        "2024-01-09T08:00:00Z",
    ];
    let mut ours = Vec::new();
    for (i, t) in times.iter().enumerate() {
        let p = post(prefix, &format!("feed{i}"), t);
        ours.push(p.id.clone());
        posts.add_post(p).await.unwrap();
    }

    let mut seen: Vec<Post> = Vec::new();
    let mut after: Option<String> = None;
    loop {
        let page = posts
            .get_posts(&PageRequest { first: k, after: after.clone() })
            .await
            .unwrap();
        assert!(page.len() <= k);
        if let Some(cursor) = &after {
            assert!(page.cursors().iter().all(|c| *c != cursor.as_str()), "cursor edge repeated");
        }
        assert_eq!(page.page_info.has_previous_page, after.is_some());
        seen.extend(page.nodes().cloned());

        if !page.page_info.has_next_page {
            break;
        }
        after = page.page_info.end_cursor.clone();
        assert!(after.is_some());
    }

    for pair in seen.windows(2) {
        let a = instant(&pair[0].created_at);
        let b = instant(&pair[1].created_at);
        assert!(a >= b, "posts out of order: {} before {}", pair[0].id, pair[1].id);
    }
    for id in &ours {
        assert_eq!(seen.iter().filter(|p| &p.id == id).count(), 1, "{id} not visited once");
    }
}

pub async fn comments_ascending(posts: &dyn PostStore, comments: &dyn CommentStore, prefix: &str) {
    posts.add_post(post(prefix, "asc", "2024-01-15T09:00:00Z")).await.unwrap();
    for (name, t) in [
        ("a3", "2024-01-15T10:30:00Z"),
        ("a1", "2024-01-15T10:00:00Z"),
        ("a4", "2024-01-15T11:00:00Z"),
        ("a2", "2024-01-15T10:15:00Z"),
    ] {
        comments.add_comment(comment(prefix, name, "asc", t)).await.unwrap();
    }

    let page = comments
        .get_comments_for_post(&id(prefix, "asc"), &PageRequest::new(10))
        .await
        .unwrap();
    let expected: Vec<String> = ["a1", "a2", "a3", "a4"].iter().map(|n| id(prefix, n)).collect();
    assert_eq!(page.cursors(), expected.iter().map(String::as_str).collect::<Vec<_>>());
    assert!(!page.page_info.has_next_page);
}

pub async fn comment_cursor_exclusion(comments: &dyn CommentStore, prefix: &str) {
    for (name, t) in [
        ("x1", "2024-01-15T10:00:00Z"),
        ("x2", "2024-01-15T10:01:00Z"),
        ("x3", "2024-01-15T10:02:00Z"),
    ] {
        comments.add_comment(comment(prefix, name, "excl", t)).await.unwrap();
    }
    let post_id = id(prefix, "excl");

    let first = comments
        .get_comments_for_post(&post_id, &PageRequest::new(2))
        .await
        .unwrap();
    assert!(first.page_info.has_next_page);
    let cursor = first.page_info.end_cursor.clone().unwrap();
    assert_eq!(cursor, id(prefix, "x2"));

    let second = comments
        .get_comments_for_post(&post_id, &PageRequest::new(2).after(cursor.clone()))
        .await
        .unwrap();
    assert_eq!(second.cursors(), vec![id(prefix, "x3").as_str()]);
    assert!(!second.page_info.has_next_page);

    let stale = comments
        .get_comments_for_post(&post_id, &PageRequest::new(2).after(id(prefix, "gone")))
        .await
        .unwrap();
    assert_eq!(stale.cursors(), first.cursors());
}

pub async fn basic_reply_thread(posts: &dyn PostStore, comments: &dyn CommentStore, prefix: &str) {
    posts.add_post(post(prefix, "P1", "2024-01-15T09:00:00Z")).await.unwrap();
    let c1 = comment(prefix, "C1", "P1", "2024-01-15T10:00:00Z");
    let c2 = comment(prefix, "C2", "P1", "2024-01-15T10:05:00Z").with_parent(c1.id.clone());
    let c3 = comment(prefix, "C3", "P1", "2024-01-15T10:10:00Z").with_parent(c1.id.clone());
    comments.add_comment(c3.clone()).await.unwrap();
    comments.add_comment(c1.clone()).await.unwrap();
    comments.add_comment(c2.clone()).await.unwrap();

    let replies = comments
        .get_replies_for_comment(&c1.id, &PageRequest::new(10))
        .await
        .unwrap();
    assert_eq!(replies.into_nodes(), vec![c2, c3]);
}

pub async fn integrity_failure(comments: &dyn CommentStore, prefix: &str) {
    comments
        .add_comment(comment(prefix, "ok", "bad", "2024-01-15T10:00:00Z"))
        .await
        .unwrap();
    comments
        .add_comment(comment(prefix, "broken", "bad", "not-a-date"))
        .await
        .unwrap();

    let err = comments
        .get_comments_for_post(&id(prefix, "bad"), &PageRequest::new(10))
        .await
        .unwrap_err();
    match err {
        StoreError::DataIntegrity { id: bad_id, value, .. } => {
            assert_eq!(bad_id, id(prefix, "broken"));
            assert_eq!(value, "not-a-date");
        }
        other => panic!("expected DataIntegrity, got {other:?}"),
    }
}

pub async fn lookups_not_found(posts: &dyn PostStore, comments: &dyn CommentStore, prefix: &str) {
    let err = comments.get_comment_by_id(&id(prefix, "nonexistent")).await.unwrap_err();
    assert!(err.is_not_found(), "{err:?}");
    let err = posts.get_post_by_id(&id(prefix, "nonexistent")).await.unwrap_err();
    assert!(err.is_not_found(), "{err:?}");
}
