//! Error handling utilities for the repository

use sqlx::Error as SqlxError;
use wormhole_core::WormholeError;

/// Convert SQLx error to WormholeError
pub fn map_db_error(e: SqlxError) -> WormholeError {
    WormholeError::Database(e.to_string())
}

/// Check for unique violation and return appropriate error or fallback
pub fn map_unique_violation<F>(e: SqlxError, on_unique: F) -> WormholeError
where
    F: FnOnce() -> WormholeError,
{
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return on_unique();
        }
    }
    WormholeError::Database(e.to_string())
}
