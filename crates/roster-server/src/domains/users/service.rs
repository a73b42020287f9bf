use std::sync::Arc;

use rand::Rng;
use roster_core::{fake_user_name, User, UserStore, FAKE_USER_COUNT};

use crate::domains::errors::UsersError;
use crate::infra::metrics;

/// Read side over the user table, shared by every request handler.
#[derive(Clone)]
pub struct UserQueries {
    store: Arc<dyn UserStore>,
}

impl UserQueries {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    pub async fn count_users(&self) -> Result<u64, UsersError> {
        self.store.count().await.map_err(|err| {
            tracing::error!(event = "user_count_failed", error = %err);
            UsersError::Db(err)
        })
    }

    /// Picks an index below the seed constant, not the live row count, so a
    /// table seeded with fewer rows yields misses.
    pub async fn random_user(&self) -> Result<User, UsersError> {
        let index = rand::thread_rng().gen_range(0..FAKE_USER_COUNT);
        self.user_by_index(index).await
    }

    pub async fn user_by_index(&self, index: u64) -> Result<User, UsersError> {
        let name = fake_user_name(index);
        tracing::info!(event = "random_user_lookup", name = %name, "get user {name}");
        match self.store.find_by_name(&name).await {
            Ok(Some(user)) => {
                metrics::user_lookup("hit");
                tracing::debug!(event = "random_user_found", user = %user);
                Ok(user)
            }
            Ok(None) => {
                metrics::user_lookup("miss");
                tracing::info!(event = "random_user_missing", index, name = %name);
                Err(UsersError::NotFound)
            }
            Err(err) => {
                metrics::user_lookup("error");
                tracing::error!(event = "random_user_failed", index, error = %err);
                Err(UsersError::Db(err))
            }
        }
    }
}
