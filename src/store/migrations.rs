//! Schema migrations for the PostgreSQL stores.
//!
//! Each step is a single idempotent statement. Applied versions are recorded
//! in `schema_migrations`, so running the list twice is a no-op.
//!
//! `created_at` is stored as `TEXT` and parsed on read, which keeps the
//! data-integrity check identical to the in-memory backend. No foreign keys:
//! referential checks belong to the query layer.

use sqlx::postgres::PgPool;
use sqlx::Row;

/// One schema step.
#[derive(Debug, Clone, Copy)]
pub struct Migration {
    /// Monotonic version.
    pub version: i64,
    /// Short name recorded alongside the version.
    pub name: &'static str,
    /// Single SQL statement.
    pub sql: &'static str,
}

/// Bookkeeping table, created before anything else.
pub const MIGRATIONS_TABLE_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS schema_migrations (
    version    BIGINT PRIMARY KEY,
    name       TEXT NOT NULL,
    applied_at TIMESTAMPTZ NOT NULL DEFAULT now()
)
"#;

/// Ordered schema steps.
pub const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "create_posts",
        sql: r#"
        CREATE TABLE IF NOT EXISTS posts (
            id             TEXT PRIMARY KEY,
            author         TEXT NOT NULL,
            title          TEXT NOT NULL,
            content        TEXT NOT NULL,
            created_at     TEXT NOT NULL,
            allow_comments BOOLEAN NOT NULL DEFAULT TRUE
        )
        "#,
    },
    Migration {
        version: 2,
        name: "create_comments",
        sql: r#"
        CREATE TABLE IF NOT EXISTS comments (
            id         TEXT PRIMARY KEY,
            post_id    TEXT NOT NULL,
            parent_id  TEXT,
            author     TEXT NOT NULL,
            content    TEXT NOT NULL,
            created_at TEXT NOT NULL
        )
        "#,
    },
    Migration {
        version: 3,
        name: "index_comments_post_id",
        sql: "CREATE INDEX IF NOT EXISTS idx_comments_post_id ON comments (post_id)",
    },
    Migration {
        version: 4,
        name: "index_comments_parent_id",
        sql: "CREATE INDEX IF NOT EXISTS idx_comments_parent_id ON comments (parent_id) \
              WHERE parent_id IS NOT NULL",
    },
];

/// Apply every migration not yet recorded. Returns how many ran.
pub async fn run_migrations(pool: &PgPool) -> Result<usize, sqlx::Error> {
    sqlx::query(MIGRATIONS_TABLE_SCHEMA).execute(pool).await?;

    let applied: Vec<i64> = sqlx::query("SELECT version FROM schema_migrations")
        .fetch_all(pool)
        .await?
        .iter()
        .map(|row| row.try_get("version"))
        .collect::<Result<_, _>>()?;

    let mut ran = 0;
    for migration in pending(MIGRATIONS, &applied) {
        tracing::info!(
            version = migration.version,
            name = migration.name,
            "Applying migration"
        );
        sqlx::query(migration.sql).execute(pool).await?;
        sqlx::query("INSERT INTO schema_migrations (version, name) VALUES ($1, $2)")
            .bind(migration.version)
            .bind(migration.name)
            .execute(pool)
            .await?;
        ran += 1;
    }

    tracing::info!(applied = ran, total = MIGRATIONS.len(), "Schema migrations complete");
    Ok(ran)
}

/// Migrations whose version is not in `applied`, in version order.
fn pending<'a>(migrations: &'a [Migration], applied: &[i64]) -> Vec<&'a Migration> {
    let mut pending: Vec<_> = migrations
        .iter()
        .filter(|m| !applied.contains(&m.version))
        .collect();
    pending.sort_by_key(|m| m.version);
    pending
}
