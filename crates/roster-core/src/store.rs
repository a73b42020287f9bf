use async_trait::async_trait;
use thiserror::Error;

use crate::models::{NewUser, User};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx_core::Error),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence port for user rows.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Creates the backing table if it does not exist yet.
    async fn ensure_schema(&self) -> StoreResult<()>;

    /// First row with the given name; ties among duplicates are arbitrary.
    async fn find_by_name(&self, name: &str) -> StoreResult<Option<User>>;

    /// Inserts all rows as one unit and returns how many were written.
    async fn insert_many(&self, users: &[NewUser]) -> StoreResult<u64>;

    async fn count(&self) -> StoreResult<u64>;
}
