//! Startup seeding of deterministic fake users.
//!
//! A row named `fake-0` is taken as proof that seeding already ran. A run that
//! died after writing it is indistinguishable from a finished one and is not
//! completed on the next start.

use roster_core::{fake_users, StoreError, UserStore, SEED_MARKER_NAME};

use crate::infra::metrics;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    AlreadySeeded,
    Seeded { inserted: u64 },
}

pub async fn seed_fake_users(
    store: &dyn UserStore,
    count: u64,
) -> Result<SeedOutcome, StoreError> {
    match store.find_by_name(SEED_MARKER_NAME).await {
        Ok(Some(_)) => {
            tracing::info!(event = "fake_users_present", "users already exist");
            return Ok(SeedOutcome::AlreadySeeded);
        }
        Ok(None) => {}
        Err(err) => {
            tracing::warn!(event = "seed_marker_lookup_failed", error = %err);
        }
    }

    let users = fake_users(count);
    let inserted = store.insert_many(&users).await?;
    tracing::info!(event = "fake_users_seeded", inserted, "fake users created");
    Ok(SeedOutcome::Seeded { inserted })
}

/// Ensures the schema and seeds the table. Failures are logged and swallowed
/// so the server still starts against a missing or partial dataset.
pub async fn prepare_store(store: &dyn UserStore, count: u64) {
    match store.ensure_schema().await {
        Ok(()) => tracing::info!(event = "schema_ready", "create schema: done"),
        Err(err) => tracing::error!(event = "schema_create_failed", error = %err),
    }

    match seed_fake_users(store, count).await {
        Ok(SeedOutcome::AlreadySeeded) => metrics::seed_run("skipped"),
        Ok(SeedOutcome::Seeded { .. }) => metrics::seed_run("seeded"),
        Err(err) => {
            metrics::seed_run("failed");
            tracing::error!(event = "fake_users_seed_failed", error = %err);
        }
    }
}
