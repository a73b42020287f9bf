#![allow(clippy::pedantic)]
#![allow(clippy::nursery)]
#![deny(clippy::unwrap_used)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::needless_raw_string_hashes)]

use sqlx_core::pool::{Pool, PoolOptions};
use sqlx_postgres::{PgConnectOptions, Postgres};
use std::str::FromStr;

pub mod repo;

pub type PgPool = Pool<Postgres>;

pub const DEFAULT_POOL_MAX: u32 = 10;

/// Parses the DSN and builds a pool without opening a connection.
///
/// Only a malformed DSN fails here; an unreachable server surfaces on first use.
pub fn connect_postgres_lazy(dsn: &str, max_connections: u32) -> Result<PgPool, sqlx_core::Error> {
    let options = PgConnectOptions::from_str(dsn)?;
    Ok(PoolOptions::new()
        .max_connections(max_connections)
        .connect_lazy_with(options))
}
