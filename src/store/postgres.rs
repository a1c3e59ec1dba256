//! PostgreSQL stores for production use.
//!
//! ## Configuration
//!
//! All settings can be configured via environment variables:
//! - `DATABASE_URL`: PostgreSQL connection string (required)
//! - `DB_MAX_CONNECTIONS`: Maximum pool size (default: 10)
//! - `DB_MIN_CONNECTIONS`: Minimum idle connections (default: 2)
//! - `DB_CONNECT_TIMEOUT_SECS`: Connection timeout (default: 10)
//! - `DB_IDLE_TIMEOUT_SECS`: Idle connection timeout (default: 300)
//! - `DB_MAX_LIFETIME_SECS`: Max connection lifetime (default: 1800)
//!
//! Each operation is a single statement; there are no multi-statement
//! transactions. Listing queries only filter, then hand rows to
//! [`paginate`] so ordering matches the in-memory backend exactly.

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;
use std::time::Duration;

use crate::error::StoreError;
use crate::pagination::{paginate, PageRequest, SortOrder};
use crate::types::{Comment, CommentConnection, EntityKind, Post, PostConnection};
use super::{migrations, CommentStore, PostStore};

/// Configuration for PostgreSQL connection pool.
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL.
    pub database_url: String,
    /// Maximum connections in pool (default: 10).
    pub max_connections: u32,
    /// Minimum idle connections to keep warm (default: 2).
    pub min_connections: u32,
    /// Connection acquire timeout in seconds (default: 10).
    pub connect_timeout_secs: u64,
    /// Idle connection timeout in seconds (default: 300 = 5 min).
    pub idle_timeout_secs: u64,
    /// Maximum connection lifetime in seconds (default: 1800 = 30 min).
    pub max_lifetime_secs: u64,
}

impl PostgresConfig {
    /// Load configuration from environment variables with production defaults.
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgresql://localhost/discussion".to_string()),
            max_connections: env_or("DB_MAX_CONNECTIONS", 10),
            min_connections: env_or("DB_MIN_CONNECTIONS", 2),
            connect_timeout_secs: env_or("DB_CONNECT_TIMEOUT_SECS", 10),
            idle_timeout_secs: env_or("DB_IDLE_TIMEOUT_SECS", 300),
            max_lifetime_secs: env_or("DB_MAX_LIFETIME_SECS", 1800),
        }
    }
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

/// Pool statistics for monitoring.
#[derive(Debug, Clone, serde::Serialize)]
pub struct PoolStats {
    /// Current pool size.
    pub size: u32,
    /// Number of idle connections.
    pub idle: usize,
    /// Maximum pool size.
    pub max: u32,
}

/// Connection pool shared by the post and comment stores.
#[derive(Debug, Clone)]
pub struct PostgresStores {
    pool: PgPool,
}

impl PostgresStores {
    /// Open a pool with the given configuration.
    pub async fn connect(config: &PostgresConfig) -> Result<Self, StoreError> {
        tracing::info!(
            max_connections = config.max_connections,
            min_connections = config.min_connections,
            connect_timeout_secs = config.connect_timeout_secs,
            idle_timeout_secs = config.idle_timeout_secs,
            max_lifetime_secs = config.max_lifetime_secs,
            "Initializing PostgreSQL connection pool"
        );

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
            .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
            .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
            .test_before_acquire(true)
            .connect(&config.database_url)
            .await
            .map_err(|e| StoreError::persistence("connect", e))?;

        Ok(Self { pool })
    }

    /// Wrap an existing pool.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Apply pending schema migrations. Returns how many ran.
    pub async fn migrate(&self) -> Result<usize, StoreError> {
        migrations::run_migrations(&self.pool)
            .await
            .map_err(|e| StoreError::persistence("migrate", e))
    }

    /// Post store over this pool.
    pub fn post_store(&self) -> PostgresPostStore {
        PostgresPostStore {
            pool: self.pool.clone(),
        }
    }

    /// Comment store over this pool.
    pub fn comment_store(&self) -> PostgresCommentStore {
        PostgresCommentStore {
            pool: self.pool.clone(),
        }
    }

    /// Get the connection pool for health checks.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Check if the database is reachable.
    pub async fn is_healthy(&self) -> bool {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .is_ok()
    }

    /// Get pool statistics for monitoring.
    pub fn pool_stats(&self) -> PoolStats {
        PoolStats {
            size: self.pool.size(),
            idle: self.pool.num_idle(),
            max: self.pool.options().get_max_connections(),
        }
    }
}

/// Map an insert failure, turning unique violations into conflicts.
fn insert_error(
    err: sqlx::Error,
    kind: EntityKind,
    id: &str,
    operation: &'static str,
) -> StoreError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            tracing::warn!(kind = %kind, id = %id, "Rejected duplicate id");
            StoreError::conflict(kind, id)
        }
        _ => StoreError::persistence_for(operation, id, err),
    }
}

/// PostgreSQL post store.
#[derive(Debug, Clone)]
pub struct PostgresPostStore {
    pool: PgPool,
}

impl PostgresPostStore {
    fn parse_post_row(row: &PgRow) -> Result<Post, sqlx::Error> {
        Ok(Post {
            id: row.try_get("id")?,
            author: row.try_get("author")?,
            title: row.try_get("title")?,
            content: row.try_get("content")?,
            created_at: row.try_get("created_at")?,
            allow_comments: row.try_get("allow_comments")?,
        })
    }
}

#[async_trait]
impl PostStore for PostgresPostStore {
    async fn add_post(&self, post: Post) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO posts (id, author, title, content, created_at, allow_comments)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#
        )
        .bind(&post.id)
        .bind(&post.author)
        .bind(&post.title)
        .bind(&post.content)
        .bind(&post.created_at)
        .bind(post.allow_comments)
        .execute(&self.pool)
        .await
        .map_err(|e| insert_error(e, EntityKind::Post, &post.id, "add_post"))?;

        tracing::debug!(post_id = %post.id, "Post added");
        Ok(())
    }

    async fn get_post_by_id(&self, id: &str) -> Result<Post, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, author, title, content, created_at, allow_comments
            FROM posts
            WHERE id = $1
            "#
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::persistence_for("get_post_by_id", id, e))?;

        match row {
            Some(ref r) => Self::parse_post_row(r)
                .map_err(|e| StoreError::persistence_for("get_post_by_id", id, e)),
            None => Err(StoreError::not_found(EntityKind::Post, id)),
        }
    }

    async fn get_posts(&self, page: &PageRequest) -> Result<PostConnection, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, author, title, content, created_at, allow_comments
            FROM posts
            ORDER BY id
            "#
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::persistence("get_posts", e))?;

        let posts = rows
            .iter()
            .map(Self::parse_post_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| StoreError::persistence("get_posts", e))?;

        let connection = paginate(&posts, SortOrder::Descending, page)?;
        tracing::debug!(
            edges = connection.len(),
            has_next_page = connection.page_info.has_next_page,
            "Listed posts"
        );
        Ok(connection)
    }
}

/// PostgreSQL comment store.
#[derive(Debug, Clone)]
pub struct PostgresCommentStore {
    pool: PgPool,
}

impl PostgresCommentStore {
    fn parse_comment_row(row: &PgRow) -> Result<Comment, sqlx::Error> {
        Ok(Comment {
            id: row.try_get("id")?,
            post_id: row.try_get("post_id")?,
            parent_id: row.try_get("parent_id")?,
            author: row.try_get("author")?,
            content: row.try_get("content")?,
            created_at: row.try_get("created_at")?,
        })
    }

    /// Run a single-bind filter query and paginate the rows.
    async fn list_where(
        &self,
        sql: &'static str,
        key: &str,
        page: &PageRequest,
        operation: &'static str,
    ) -> Result<CommentConnection, StoreError> {
        let rows = sqlx::query(sql)
            .bind(key)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::persistence(operation, e))?;

        let comments = rows
            .iter()
            .map(Self::parse_comment_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| StoreError::persistence(operation, e))?;

        paginate(&comments, SortOrder::Ascending, page)
    }
}

#[async_trait]
impl CommentStore for PostgresCommentStore {
    async fn add_comment(&self, comment: Comment) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO comments (id, post_id, parent_id, author, content, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#
        )
        .bind(&comment.id)
        .bind(&comment.post_id)
        .bind(&comment.parent_id)
        .bind(&comment.author)
        .bind(&comment.content)
        .bind(&comment.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| insert_error(e, EntityKind::Comment, &comment.id, "add_comment"))?;

        tracing::debug!(comment_id = %comment.id, post_id = %comment.post_id, "Comment added");
        Ok(())
    }

    async fn get_comment_by_id(&self, id: &str) -> Result<Comment, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, post_id, parent_id, author, content, created_at
            FROM comments
            WHERE id = $1
            "#
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::persistence_for("get_comment_by_id", id, e))?;

        match row {
            Some(ref r) => Self::parse_comment_row(r)
                .map_err(|e| StoreError::persistence_for("get_comment_by_id", id, e)),
            None => Err(StoreError::not_found(EntityKind::Comment, id)),
        }
    }

    async fn get_comments_for_post(
        &self,
        post_id: &str,
        page: &PageRequest,
    ) -> Result<CommentConnection, StoreError> {
        let connection = self
            .list_where(
                r#"
                SELECT id, post_id, parent_id, author, content, created_at
                FROM comments
                WHERE post_id = $1
                ORDER BY id
                "#,
                post_id,
                page,
                "get_comments_for_post",
            )
            .await?;

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
        let connection = self
            .list_where(
                r#"
                SELECT id, post_id, parent_id, author, content, created_at
                FROM comments
                WHERE parent_id = $1
                ORDER BY id
                "#,
                parent_id,
                page,
                "get_replies_for_comment",
            )
            .await?;

        tracing::debug!(
            comment_id = %parent_id,
            edges = connection.len(),
            has_next_page = connection.page_info.has_next_page,
            "Listed replies for comment"
        );
        Ok(connection)
    }
}
