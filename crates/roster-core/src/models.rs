use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "Id")]
    pub id: i64,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Emails")]
    pub emails: Vec<String>,
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "User<{} {} [{}]>", self.id, self.name, self.emails.join(" "))
    }
}

/// Insert payload; the store assigns `id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub emails: Vec<String>,
}

impl NewUser {
    #[must_use]
    pub fn into_user(self, id: i64) -> User {
        User {
            id,
            name: self.name,
            emails: self.emails,
        }
    }
}

#[cfg(feature = "postgres")]
mod from_row {
    use sqlx_core::from_row::FromRow;
    use sqlx_core::row::Row;
    use sqlx_postgres::PgRow;

    use super::User;

    // `name` and `emails` are nullable columns; rows written outside the
    // seeding path may leave them empty.
    impl FromRow<'_, PgRow> for User {
        fn from_row(row: &PgRow) -> Result<Self, sqlx_core::Error> {
            let name: Option<String> = row.try_get("name")?;
            let emails: Option<Vec<String>> = row.try_get("emails")?;
            Ok(Self {
                id: row.try_get("id")?,
                name: name.unwrap_or_default(),
                emails: emails.unwrap_or_default(),
            })
        }
    }
}
