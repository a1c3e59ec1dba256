//! Discussion Store Bootstrap Binary
//!
//! Prepares a storage backend before the query front end starts:
//! - Structured JSON or pretty logging
//! - Backend selection from the environment
//! - PostgreSQL connection and schema migrations
//! - Demo data for the in-memory backend
//!
//! ## Configuration
//!
//! Environment variables:
//! - `STORAGE_TYPE`: `inmemory` or `postgres` (default: inmemory)
//! - `SEED_DEMO_DATA`: seed in-memory demo data (default: true)
//! - `DATABASE_URL`: PostgreSQL connection string (postgres only)
//! - `RUST_LOG`: Log level filter (default: info)
//! - `LOG_FORMAT`: "json" for structured logs, "pretty" for development (default: json)
//!
//! ## Usage
//!
//! ```bash
//! STORAGE_TYPE=postgres DATABASE_URL=postgresql://... cargo run --bin discussion_store_bootstrap --features bootstrap,postgres
//! ```

use std::time::{Duration, Instant};

use tracing::{error, info};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use discussion_store::{
    open_stores, CommentStore, PageRequest, PostStore, StoreConfig, DEFAULT_PAGE_SIZE,
};

/// Initialize the tracing subscriber with JSON or pretty format
fn init_tracing() {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "discussion_store=info,discussion_store_bootstrap=info,sqlx=warn".into()
    });

    if log_format == "pretty" {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_span_events(FmtSpan::CLOSE)
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_current_span(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .flatten_event(true)
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let version = env!("CARGO_PKG_VERSION");
    let build_sha = option_env!("BUILD_SHA").unwrap_or("dev");

    info!(
        version = version,
        build_sha = build_sha,
        "Starting Discussion Store bootstrap"
    );

    let config = StoreConfig::from_env();
    info!(storage = %config.storage, "Opening storage backend");

    let open_start = Instant::now();
    let handles = match tokio::time::timeout(Duration::from_secs(30), open_stores(&config)).await {
        Ok(Ok(handles)) => handles,
        Ok(Err(e)) => {
            error!(error = %e, "Failed to open storage backend");
            return Err(e.into());
        }
        Err(_) => {
            error!("Storage backend open timeout after 30s");
            return Err("Storage backend open timeout".into());
        }
    };

    info!(
        latency_ms = open_start.elapsed().as_millis() as u64,
        "Storage backend ready"
    );

    // Read back the first page so broken rows surface at startup.
    let feed = handles.posts.get_posts(&PageRequest::new(DEFAULT_PAGE_SIZE)).await?;
    for post in feed.nodes() {
        let comments = handles
            .comments
            .get_comments_for_post(&post.id, &PageRequest::all())
            .await?;
        info!(
            post_id = %post.id,
            title = %post.title,
            comments = comments.len(),
            "Post available"
        );
    }

    info!(
        posts_on_first_page = feed.len(),
        has_next_page = feed.page_info.has_next_page,
        "Discussion Store bootstrap complete"
    );

    Ok(())
}
