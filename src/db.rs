use log::LevelFilter;
use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::{ConnectOptions, Connection};

use crate::config::ConnectionConfig;
use crate::error::ConnectionError;

/// Open a single session to the users database. No retries.
pub async fn connect(config: &ConnectionConfig) -> Result<PgConnection, ConnectionError> {
    log::debug!(
        "connecting to postgres at {}:{} as {} (database {})",
        config.host,
        config.port,
        config.username,
        config.database
    );

    let options = PgConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .username(&config.username)
        .password(&config.password)
        .database(&config.database)
        .log_statements(LevelFilter::Debug);

    let conn = options.connect().await?;
    log::debug!("postgres session established");
    Ok(conn)
}

/// Close the session, flushing the terminate message to the server.
pub async fn close(conn: PgConnection) -> Result<(), ConnectionError> {
    conn.close().await?;
    log::debug!("postgres session closed");
    Ok(())
}
