//! Persistence seam for the import pipeline.
//!
//! The pipeline only needs two operations: find the next id and insert a row
//! under it. [`PgUserStore`] runs them against the session handed in by the
//! caller; tests substitute an in-memory implementation.

use sqlx::error::ErrorKind;
use sqlx::postgres::PgConnection;

use crate::error::StoreError;
use crate::models::{User, UserRecord};
use crate::schema::PRIMARY_KEY_CONSTRAINT;

#[allow(async_fn_in_trait)]
pub trait UserStore {
    /// Current maximum id plus one, or 1 when the table is empty.
    async fn next_id(&mut self) -> Result<i32, StoreError>;

    /// Insert `user` under the explicit `id`.
    async fn insert(&mut self, id: i32, user: &UserRecord) -> Result<(), StoreError>;
}

/// [`UserStore`] backed by a borrowed PostgreSQL session.
///
/// `next_id` and `insert` are separate statements with no surrounding
/// transaction; two importers writing the same table can race on ids.
pub struct PgUserStore<'c> {
    conn: &'c mut PgConnection,
}

impl<'c> PgUserStore<'c> {
    pub fn new(conn: &'c mut PgConnection) -> Self {
        Self { conn }
    }

    /// All rows ordered by id.
    pub async fn list_users(&mut self) -> Result<Vec<User>, StoreError> {
        let users = sqlx::query_as::<_, User>(
            "SELECT id, name, surname, email FROM users ORDER BY id",
        )
        .fetch_all(&mut *self.conn)
        .await?;
        Ok(users)
    }
}

impl UserStore for PgUserStore<'_> {
    async fn next_id(&mut self) -> Result<i32, StoreError> {
        let id: i32 = sqlx::query_scalar("SELECT COALESCE(MAX(id), 0) + 1 FROM users")
            .fetch_one(&mut *self.conn)
            .await?;
        Ok(id)
    }

    async fn insert(&mut self, id: i32, user: &UserRecord) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO users (id, name, surname, email) VALUES ($1, $2, $3, $4)")
            .bind(id)
            .bind(&user.name)
            .bind(&user.surname)
            .bind(&user.email)
            .execute(&mut *self.conn)
            .await?;

        log::trace!("inserted user {} with id {}", user.email, id);
        Ok(())
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err)
                if matches!(db_err.kind(), ErrorKind::UniqueViolation)
                    && db_err.constraint() != Some(PRIMARY_KEY_CONSTRAINT) =>
            {
                StoreError::duplicate_email(err.to_string())
            }
            _ => StoreError::other(err.to_string()),
        }
    }
}
