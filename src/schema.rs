//! DDL for the `users` table.
//!
//! There are no migrations: [`create_table`] drops whatever is there and
//! recreates it, so every call loses all existing rows.

use sqlx::Connection;
use sqlx::postgres::PgConnection;

use crate::error::SchemaError;

pub const USERS_TABLE: &str = "users";
pub const PRIMARY_KEY_CONSTRAINT: &str = "users_pkey";
pub const EMAIL_UNIQUE_CONSTRAINT: &str = "users_email_key";
pub const EMAIL_INDEX: &str = "idx_users_email";

const DROP_USERS: &str = "DROP TABLE IF EXISTS users";

const CREATE_USERS: &str = r#"CREATE TABLE users (
    id SERIAL,
    name VARCHAR(100) NOT NULL,
    surname VARCHAR(100) NOT NULL,
    email VARCHAR(255) NOT NULL,
    CONSTRAINT users_pkey PRIMARY KEY (id),
    CONSTRAINT users_email_key UNIQUE (email)
)"#;

// Redundant with the unique constraint's own index, kept explicit for lookups by email.
const CREATE_EMAIL_INDEX: &str = "CREATE INDEX idx_users_email ON users (email)";

/// Drop and recreate the `users` table in a single transaction.
pub async fn create_table(conn: &mut PgConnection) -> Result<(), SchemaError> {
    log::info!("recreating {} table", USERS_TABLE);

    let mut tx = conn.begin().await?;

    sqlx::query(DROP_USERS).execute(&mut *tx).await?;
    sqlx::query(CREATE_USERS).execute(&mut *tx).await?;
    sqlx::query(CREATE_EMAIL_INDEX).execute(&mut *tx).await?;

    tx.commit().await?;

    log::info!("{} table created with index {}", USERS_TABLE, EMAIL_INDEX);
    Ok(())
}
