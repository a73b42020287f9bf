use roster_core::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UsersError {
    #[error("not_found")]
    NotFound,
    #[error("db_error: {0}")]
    Db(#[from] StoreError),
}
