//! Store contract tests against PostgreSQL.
//!
//! Ignored by default. Run with a disposable database:
//!
//! ```bash
//! DATABASE_URL=postgresql://localhost/discussion_test \
//!     cargo test --features postgres --test postgres_contract -- --ignored
//! ```

#![cfg(feature = "postgres")]

mod common;

use discussion_store::{PostgresConfig, PostgresStores};

async fn connect() -> (PostgresStores, String) {
    let stores = PostgresStores::connect(&PostgresConfig::from_env())
        .await
        .expect("DATABASE_URL must point at a reachable database");
    stores.migrate().await.unwrap();
    let prefix = format!("pg-{}-", uuid::Uuid::new_v4());
    (stores, prefix)
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_migrations_are_idempotent() {
    let (stores, _) = connect().await;
    assert_eq!(stores.migrate().await.unwrap(), 0);
    assert!(stores.is_healthy().await);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_round_trip() {
    let (stores, prefix) = connect().await;
    common::round_trip(&stores.post_store(), &prefix).await;
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_duplicate_ids_rejected() {
    let (stores, prefix) = connect().await;
    common::duplicate_ids_rejected(&stores.post_store(), &stores.comment_store(), &prefix).await;
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_posts_exhaust_in_order() {
    let (stores, prefix) = connect().await;
    common::posts_exhaust_in_order(&stores.post_store(), &prefix, 3).await;
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_comments_ascending() {
    let (stores, prefix) = connect().await;
    common::comments_ascending(&stores.post_store(), &stores.comment_store(), &prefix).await;
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_comment_cursor_exclusion() {
    let (stores, prefix) = connect().await;
    common::comment_cursor_exclusion(&stores.comment_store(), &prefix).await;
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_basic_reply_thread() {
    let (stores, prefix) = connect().await;
    common::basic_reply_thread(&stores.post_store(), &stores.comment_store(), &prefix).await;
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_integrity_failure() {
    let (stores, prefix) = connect().await;
    common::integrity_failure(&stores.comment_store(), &prefix).await;
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_lookups_not_found() {
    let (stores, prefix) = connect().await;
    common::lookups_not_found(&stores.post_store(), &stores.comment_store(), &prefix).await;
}
