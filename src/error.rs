//! Store error taxonomy shared by every backend.

use crate::types::EntityKind;

/// Error returned by [`PostStore`](crate::store::PostStore) and
/// [`CommentStore`](crate::store::CommentStore) operations.
///
/// Listings are all-or-nothing: an error is never returned alongside a
/// partial page. No variant is retried inside the store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Point lookup by id found nothing.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Entity kind looked up.
        kind: EntityKind,
        /// Requested id.
        id: String,
    },

    /// A stored record failed an invariant at read time.
    #[error("{kind} {id} has invalid createdAt {value:?}: {reason}")]
    DataIntegrity {
        /// Entity kind of the bad record.
        kind: EntityKind,
        /// Id of the bad record.
        id: String,
        /// The stored value that failed to parse.
        value: String,
        /// Parser message.
        reason: String,
    },

    /// An entity with the same id already exists.
    #[error("{kind} already exists: {id}")]
    Conflict {
        /// Entity kind being added.
        kind: EntityKind,
        /// Duplicate id.
        id: String,
    },

    /// The underlying medium failed the operation.
    #[error("persistence failure during {operation}{}: {message}", id_suffix(.id))]
    Persistence {
        /// Store operation that failed, e.g. `get_posts`.
        operation: &'static str,
        /// Entity id the operation targeted; `None` for listings.
        id: Option<String>,
        /// Backend error message.
        message: String,
    },
}

fn id_suffix(id: &Option<String>) -> String {
    match id {
        Some(id) => format!(" of {id}"),
        None => String::new(),
    }
}

impl StoreError {
    /// Build a [`StoreError::NotFound`].
    pub fn not_found(kind: EntityKind, id: impl Into<String>) -> Self {
        Self::NotFound { kind, id: id.into() }
    }

    /// Build a [`StoreError::Conflict`].
    pub fn conflict(kind: EntityKind, id: impl Into<String>) -> Self {
        Self::Conflict { kind, id: id.into() }
    }

    /// Build a [`StoreError::Persistence`] from any displayable backend error.
    pub fn persistence(operation: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Persistence {
            operation,
            id: None,
            message: err.to_string(),
        }
    }

    /// Build a [`StoreError::Persistence`] for an operation on one entity.
    pub fn persistence_for(
        operation: &'static str,
        id: impl Into<String>,
        err: impl std::fmt::Display,
    ) -> Self {
        Self::Persistence {
            operation,
            id: Some(id.into()),
            message: err.to_string(),
        }
    }

    /// Check if this is a [`StoreError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a [`StoreError::DataIntegrity`].
    pub fn is_data_integrity(&self) -> bool {
        matches!(self, Self::DataIntegrity { .. })
    }

    /// Check if this is a [`StoreError::Conflict`].
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}
