use std::env;
use std::fmt;

/// Name of the database every session connects to.
pub const DATABASE_NAME: &str = "moodle_users";

pub const DEFAULT_PORT: u16 = 5432;

/// `env_logger` filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "warn";

fn env_u16(key: &str, default: u16) -> u16 {
    env::var(key)
        .ok()
        .and_then(|value| value.trim().parse::<u16>().ok())
        .unwrap_or(default)
}

/// Connection parameters for the users database.
#[derive(Clone)]
pub struct ConnectionConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database: String,
}

impl ConnectionConfig {
    /// Build a config from the `-h`, `-u` and `-p` flags.
    ///
    /// The port comes from a `host:port` suffix when present, otherwise from
    /// `USER_UPLOAD_DB_PORT`, otherwise 5432.
    pub fn from_args(host: &str, username: &str, password: &str) -> Self {
        Self::with_default_port(
            host,
            username,
            password,
            env_u16("USER_UPLOAD_DB_PORT", DEFAULT_PORT),
        )
    }

    pub fn with_default_port(host: &str, username: &str, password: &str, default_port: u16) -> Self {
        let (host, port) = split_host_port(host.trim()).unwrap_or((host.trim(), default_port));

        Self {
            host: host.to_string(),
            port,
            username: username.to_string(),
            password: password.to_string(),
            database: DATABASE_NAME.to_string(),
        }
    }
}

// Bare IPv6 addresses contain several colons and are left untouched.
fn split_host_port(host: &str) -> Option<(&str, u16)> {
    if host.matches(':').count() != 1 {
        return None;
    }
    let (name, port) = host.split_once(':')?;
    let port = port.parse::<u16>().ok()?;
    if name.is_empty() {
        return None;
    }
    Some((name, port))
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"***")
            .field("database", &self.database)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_host_uses_default_port() {
        let config = ConnectionConfig::with_default_port("localhost", "postgres", "secret", 6543);
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 6543);
        assert_eq!(config.database, DATABASE_NAME);
    }

    #[test]
    fn host_port_suffix_overrides_default() {
        let config = ConnectionConfig::with_default_port("db.internal:5433", "u", "p", DEFAULT_PORT);
        assert_eq!(config.host, "db.internal");
        assert_eq!(config.port, 5433);
    }

    #[test]
    fn unparseable_suffix_is_kept_as_host() {
        let config = ConnectionConfig::with_default_port("db:abc", "u", "p", DEFAULT_PORT);
        assert_eq!(config.host, "db:abc");
        assert_eq!(config.port, DEFAULT_PORT);

        let ipv6 = ConnectionConfig::with_default_port("::1", "u", "p", DEFAULT_PORT);
        assert_eq!(ipv6.host, "::1");
        assert_eq!(ipv6.port, DEFAULT_PORT);
    }

    #[test]
    fn debug_output_redacts_password() {
        let config = ConnectionConfig::with_default_port("localhost", "postgres", "hunter2", DEFAULT_PORT);
        let debug = format!("{config:?}");
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("***"));
    }
}
