//! In-memory [`UserStore`] used by tests across the workspace.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::models::{NewUser, User};
use crate::store::{StoreError, StoreResult, UserStore};

#[derive(Debug, Default)]
pub struct MemoryUserStore {
    rows: Mutex<Vec<User>>,
    unavailable: AtomicBool,
    insert_calls: AtomicUsize,
    schema_calls: AtomicUsize,
}

impl MemoryUserStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_users(users: Vec<NewUser>) -> Self {
        let store = Self::new();
        store.push_all(users);
        store
    }

    /// Makes every subsequent call fail until reset.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn rows(&self) -> Vec<User> {
        self.lock().clone()
    }

    pub fn insert_calls(&self) -> usize {
        self.insert_calls.load(Ordering::SeqCst)
    }

    pub fn schema_calls(&self) -> usize {
        self.schema_calls.load(Ordering::SeqCst)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<User>> {
        match self.rows.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn check_available(&self) -> StoreResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store offline".to_string()));
        }
        Ok(())
    }

    fn push_all(&self, users: Vec<NewUser>) -> u64 {
        let mut rows = self.lock();
        let mut next_id = rows.last().map_or(1, |row| row.id + 1);
        let mut inserted = 0;
        for user in users {
            rows.push(user.into_user(next_id));
            next_id += 1;
            inserted += 1;
        }
        inserted
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn ensure_schema(&self) -> StoreResult<()> {
        self.schema_calls.fetch_add(1, Ordering::SeqCst);
        self.check_available()
    }

    async fn find_by_name(&self, name: &str) -> StoreResult<Option<User>> {
        self.check_available()?;
        Ok(self.lock().iter().find(|row| row.name == name).cloned())
    }

    async fn insert_many(&self, users: &[NewUser]) -> StoreResult<u64> {
        self.insert_calls.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        Ok(self.push_all(users.to_vec()))
    }

    async fn count(&self) -> StoreResult<u64> {
        self.check_available()?;
        Ok(self.lock().len() as u64)
    }
}
