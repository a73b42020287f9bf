macro_rules! query {
    ($sql:expr $(, $arg:expr)* $(,)?) => {{
        #[allow(unused_mut)]
        let mut q = sqlx_core::query::query::<sqlx_postgres::Postgres>($sql);
        $(q = q.bind($arg);)*
        q
    }};
}

macro_rules! query_as {
    ($ty:ty, $sql:expr $(, $arg:expr)* $(,)?) => {{
        #[allow(unused_mut)]
        let mut q = sqlx_core::query_as::query_as::<sqlx_postgres::Postgres, $ty>($sql);
        $(q = q.bind($arg);)*
        q
    }};
}

macro_rules! query_scalar {
    ($ty:ty, $sql:expr $(, $arg:expr)* $(,)?) => {{
        #[allow(unused_mut)]
        let mut q = sqlx_core::query_scalar::query_scalar::<sqlx_postgres::Postgres, $ty>($sql);
        $(q = q.bind($arg);)*
        q
    }};
}

pub(crate) mod prelude {
    pub(crate) use crate::PgPool;
    pub(crate) use roster_core::{NewUser, StoreResult, User, UserStore};
}

mod users;

pub use users::{UserRepo, INSERT_CHUNK_ROWS};
