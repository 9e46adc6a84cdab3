//! Infrastructure error model shared by every storage backend.

use thiserror::Error;

/// Storage operation error.
///
/// These are **infrastructure errors** (connectivity, backend faults), as
/// opposed to business outcomes such as "not found" or "insufficient stock",
/// which stores report through their return values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The backend could not be reached (pool exhausted/closed, IO, TLS).
    /// Transient: the operation did not run.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The backend ran the operation and rejected it, or returned data that
    /// does not decode into a domain record.
    #[error("store backend error: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}

/// Map a SQLx error into a `StoreError`.
///
/// | SQLx Error | PostgreSQL code | StoreError |
/// |------------|-----------------|------------|
/// | Database (unique violation) | `23505` | `Backend` (duplicate key) |
/// | Database (check violation) | `23514` | `Backend` (constraint) |
/// | Database (other) | any | `Backend` |
/// | PoolTimedOut / PoolClosed / Io / Tls | n/a | `Unavailable` |
/// | anything else | n/a | `Backend` |
pub(crate) fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {}: {}", operation, db_err.message());
            match db_err.code().as_deref() {
                Some("23505") => StoreError::Backend(format!("duplicate key: {msg}")),
                Some("23514") => StoreError::Backend(format!("constraint violated: {msg}")),
                _ => StoreError::Backend(msg),
            }
        }
        sqlx::Error::PoolTimedOut => {
            StoreError::Unavailable(format!("connection pool timed out in {}", operation))
        }
        sqlx::Error::PoolClosed => {
            StoreError::Unavailable(format!("connection pool closed in {}", operation))
        }
        sqlx::Error::Io(e) => StoreError::Unavailable(format!("io error in {}: {}", operation, e)),
        sqlx::Error::Tls(e) => {
            StoreError::Unavailable(format!("tls error in {}: {}", operation, e))
        }
        _ => StoreError::Backend(format!("sqlx error in {}: {}", operation, err)),
    }
}
