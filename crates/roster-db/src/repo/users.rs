use async_trait::async_trait;
use sqlx_core::query_builder::QueryBuilder;
use sqlx_postgres::Postgres;

use super::prelude::*;

/// Rows per `INSERT` statement. Two binds per row keeps each statement well
/// below the 65535 bind-parameter limit of the Postgres protocol.
pub const INSERT_CHUNK_ROWS: usize = 1000;

const CREATE_USERS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS users (
        id BIGSERIAL PRIMARY KEY,
        name TEXT,
        emails TEXT[]
    )
"#;

const CREATE_USERS_NAME_INDEX: &str = "CREATE INDEX IF NOT EXISTS users_name_idx ON users (name)";

#[derive(Clone)]
pub struct UserRepo {
    pool: PgPool,
}

impl UserRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for UserRepo {
    async fn ensure_schema(&self) -> StoreResult<()> {
        query!(CREATE_USERS_TABLE).execute(&self.pool).await?;
        query!(CREATE_USERS_NAME_INDEX).execute(&self.pool).await?;
        Ok(())
    }

    async fn find_by_name(&self, name: &str) -> StoreResult<Option<User>> {
        let user = query_as!(
            User,
            r#"
            SELECT id, name, emails
            FROM users
            WHERE name = $1
            LIMIT 1
            "#,
            name
        )
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn insert_many(&self, users: &[NewUser]) -> StoreResult<u64> {
        if users.is_empty() {
            return Ok(0);
        }
        let mut tx = self.pool.begin().await?;
        let mut inserted = 0;
        for chunk in users.chunks(INSERT_CHUNK_ROWS) {
            let mut builder = QueryBuilder::<Postgres>::new("INSERT INTO users (name, emails) ");
            builder.push_values(chunk, |mut row, user| {
                row.push_bind(user.name.clone())
                    .push_bind(user.emails.clone());
            });
            let result = builder.build().execute(&mut *tx).await?;
            inserted += result.rows_affected();
        }
        tx.commit().await?;
        tracing::debug!(event = "users_inserted", rows = inserted);
        Ok(inserted)
    }

    async fn count(&self) -> StoreResult<u64> {
        let count = query_scalar!(i64, "SELECT count(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(u64::try_from(count).unwrap_or_default())
    }
}
