//! Environment configuration and backend selection.
//!
//! ## Environment
//!
//! - `STORAGE_TYPE`: `inmemory` or `postgres` (default: `inmemory`)
//! - `SEED_DEMO_DATA`: seed the in-memory backend with a demo discussion
//!   (default: `true`)
//! - PostgreSQL settings, see [`PostgresConfig`](crate::store::PostgresConfig)

use std::fmt;
use std::sync::Arc;

use crate::error::StoreError;
use crate::query::Resolver;
use crate::store::{CommentStore, InMemoryStore, PostStore};

/// Which storage backend to open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StorageKind {
    /// Process-local tables.
    #[default]
    InMemory,
    /// PostgreSQL via `DATABASE_URL`.
    Postgres,
}

impl StorageKind {
    /// Parse storage kind from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "inmemory" | "in-memory" | "memory" => Some(Self::InMemory),
            "postgres" | "postgresql" => Some(Self::Postgres),
            _ => None,
        }
    }
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InMemory => write!(f, "inmemory"),
            Self::Postgres => write!(f, "postgres"),
        }
    }
}

/// Store configuration.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Backend to open.
    pub storage: StorageKind,
    /// Seed demo data into the in-memory backend.
    pub seed_demo_data: bool,
    /// PostgreSQL pool settings.
    #[cfg(feature = "postgres")]
    pub postgres: crate::store::PostgresConfig,
}

impl StoreConfig {
    /// Load configuration from environment variables.
    ///
    /// An unknown or missing `STORAGE_TYPE` falls back to in-memory.
    pub fn from_env() -> Self {
        let storage = match std::env::var("STORAGE_TYPE") {
            Ok(raw) => StorageKind::from_str(&raw).unwrap_or_else(|| {
                tracing::warn!(
                    storage_type = %raw,
                    "Unknown STORAGE_TYPE, using in-memory storage"
                );
                StorageKind::InMemory
            }),
            Err(_) => {
                tracing::info!("STORAGE_TYPE not set, using in-memory storage");
                StorageKind::InMemory
            }
        };

        let seed_demo_data = std::env::var("SEED_DEMO_DATA")
            .ok()
            .and_then(|s| parse_bool(&s))
            .unwrap_or(true);

        Self {
            storage,
            seed_demo_data,
            #[cfg(feature = "postgres")]
            postgres: crate::store::PostgresConfig::from_env(),
        }
    }

    /// In-memory configuration without demo data.
    pub fn in_memory() -> Self {
        Self {
            storage: StorageKind::InMemory,
            seed_demo_data: false,
            #[cfg(feature = "postgres")]
            postgres: crate::store::PostgresConfig::from_env(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Opened stores behind their traits.
#[derive(Clone)]
pub struct StoreHandles {
    /// Post store.
    pub posts: Arc<dyn PostStore>,
    /// Comment store.
    pub comments: Arc<dyn CommentStore>,
}

impl StoreHandles {
    /// Build a query resolver over these stores.
    pub fn resolver(&self) -> Resolver {
        Resolver::new(Arc::clone(&self.posts), Arc::clone(&self.comments))
    }
}

impl From<InMemoryStore> for StoreHandles {
    fn from(store: InMemoryStore) -> Self {
        Self {
            posts: store.posts,
            comments: store.comments,
        }
    }
}

/// Open the configured backend.
///
/// PostgreSQL is connected and migrated before the handles are returned.
pub async fn open_stores(config: &StoreConfig) -> Result<StoreHandles, StoreError> {
    match config.storage {
        StorageKind::InMemory => {
            tracing::info!(seed_demo_data = config.seed_demo_data, "Using in-memory storage");
            let store = if config.seed_demo_data {
                InMemoryStore::with_demo_data()
            } else {
                InMemoryStore::new()
            };
            Ok(store.into())
        }
        StorageKind::Postgres => open_postgres(config).await,
    }
}

#[cfg(feature = "postgres")]
async fn open_postgres(config: &StoreConfig) -> Result<StoreHandles, StoreError> {
    let stores = crate::store::PostgresStores::connect(&config.postgres).await?;
    let applied = stores.migrate().await?;
    tracing::info!(migrations_applied = applied, "Using PostgreSQL storage");

    Ok(StoreHandles {
        posts: Arc::new(stores.post_store()),
        comments: Arc::new(stores.comment_store()),
    })
}

#[cfg(not(feature = "postgres"))]
async fn open_postgres(_config: &StoreConfig) -> Result<StoreHandles, StoreError> {
    Err(StoreError::persistence(
        "open_stores",
        "PostgreSQL storage requested but the `postgres` feature is not enabled",
    ))
}
