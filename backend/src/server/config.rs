//! HTTP server configuration loaded from the environment.

use std::env;
use std::net::SocketAddr;

use actix_web::cookie::Key;
use backend::outbound::persistence::DbPool;
use tracing::warn;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) database_url: Option<String>,
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    /// Read configuration from the environment.
    ///
    /// - `BIND_ADDR`: listen address, default `0.0.0.0:8080`.
    /// - `DATABASE_URL`: PostgreSQL DSN; absent means in-memory stores.
    /// - `SESSION_KEY_FILE`: session key material, default
    ///   `/var/run/secrets/session_key`. Missing material is fatal outside
    ///   debug builds unless `SESSION_ALLOW_EPHEMERAL=1`.
    /// - `SESSION_COOKIE_SECURE`: any value but `0` keeps the flag on.
    pub fn from_env() -> std::io::Result<Self> {
        let bind_addr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8080".to_owned())
            .parse::<SocketAddr>()
            .map_err(|err| std::io::Error::other(format!("invalid BIND_ADDR: {err}")))?;

        let database_url = env::var("DATABASE_URL").ok();

        let key_path = env::var("SESSION_KEY_FILE")
            .unwrap_or_else(|_| "/var/run/secrets/session_key".to_owned());
        let key = match std::fs::read(&key_path) {
            Ok(bytes) => Key::derive_from(&bytes),
            Err(err) => {
                let allow_dev = env::var("SESSION_ALLOW_EPHEMERAL").ok().as_deref() == Some("1");
                if cfg!(debug_assertions) || allow_dev {
                    warn!(path = %key_path, error = %err, "using temporary session key (dev only)");
                    Key::generate()
                } else {
                    return Err(std::io::Error::other(format!(
                        "failed to read session key at {key_path}: {err}"
                    )));
                }
            }
        };

        let cookie_secure = env::var("SESSION_COOKIE_SECURE")
            .map(|v| v != "0")
            .unwrap_or(true);

        Ok(Self {
            bind_addr,
            database_url,
            key,
            cookie_secure,
            db_pool: None,
        })
    }

    /// The configured PostgreSQL DSN, if any.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url.as_deref()
    }

    /// Attach a database connection pool for persistence adapters.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }
}
