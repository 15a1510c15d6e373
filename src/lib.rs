pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod import;
pub mod models;
pub mod schema;
pub mod store;
pub mod validation;

#[cfg_attr(not(test), allow(dead_code))]
pub mod test_support {
    pub use database::{TestDatabase, TestDatabaseError};

    pub mod database {
        use sqlx::postgres::PgConnection;
        use testcontainers_modules::postgres::Postgres;
        use testcontainers_modules::testcontainers::{
            ContainerAsync, core::error::TestcontainersError, runners::AsyncRunner,
        };
        use thiserror::Error;

        use crate::config::{ConnectionConfig, DATABASE_NAME};
        use crate::db;
        use crate::error::ConnectionError;

        pub const TEST_USER: &str = "postgres";
        pub const TEST_PASSWORD: &str = "postgres";

        #[derive(Debug, Error)]
        pub enum TestDatabaseError {
            #[error("container error: {0}")]
            Container(#[from] TestcontainersError),
            #[error("connection error: {0}")]
            Connection(#[from] ConnectionError),
        }

        /// Disposable PostgreSQL container hosting the `moodle_users` database.
        pub struct TestDatabase {
            config: ConnectionConfig,
            container: ContainerAsync<Postgres>,
        }

        impl TestDatabase {
            /// Launch a fresh container. Fails when no container runtime is reachable.
            pub async fn new() -> Result<Self, TestDatabaseError> {
                let container = Postgres::default()
                    .with_db_name(DATABASE_NAME)
                    .with_user(TEST_USER)
                    .with_password(TEST_PASSWORD)
                    .start()
                    .await?;

                let host = container.get_host().await?.to_string();
                let port = container.get_host_port_ipv4(5432).await?;
                let config =
                    ConnectionConfig::with_default_port(&host, TEST_USER, TEST_PASSWORD, port);

                Ok(Self { config, container })
            }

            pub fn config(&self) -> &ConnectionConfig {
                &self.config
            }

            /// Value for the `-h` flag, including the mapped port.
            pub fn host_arg(&self) -> String {
                format!("{}:{}", self.config.host, self.config.port)
            }

            pub async fn connect(&self) -> Result<PgConnection, TestDatabaseError> {
                Ok(db::connect(&self.config).await?)
            }

            /// Stop the container. Dropping the value also removes it.
            pub async fn close(self) -> Result<(), TestDatabaseError> {
                self.container.stop().await?;
                Ok(())
            }
        }
    }
}
