//! Server configuration module

use clap::Parser;

use crate::config::{
    db::DatabaseConfig,
    observability::{LoggingConfig, ObservabilityConfig},
    server::ServerRuntimeConfig,
    session::SessionConfig,
};

pub(crate) mod db;
pub(crate) mod observability;
pub(crate) mod server;
pub(crate) mod session;

/// Cartwheel JSON API Server configuration
#[derive(Debug, Parser)]
#[command(name = "cartwheel-json", about = "Cartwheel JSON API Server", long_about = None)]
pub struct ServerConfig {
    /// Server network settings.
    #[command(flatten)]
    pub server: ServerRuntimeConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Observability (traces, slow request warnings) settings.
    #[command(flatten)]
    pub observability: ObservabilityConfig,

    /// Application database settings.
    #[command(flatten)]
    pub database: DatabaseConfig,

    /// Cart session cookie settings.
    #[command(flatten)]
    pub session: SessionConfig,
}

impl ServerConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Get the socket address for binding
    #[must_use]
    pub fn socket_addr(&self) -> String {
        self.server.socket_addr()
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    const SECRET: &str = "0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef";

    #[test]
    fn parses_required_settings_with_defaults() -> TestResult {
        let config = ServerConfig::try_parse_from([
            "cartwheel-json",
            "--database-url",
            "postgres://localhost/cartwheel",
            "--session-secret",
            SECRET,
        ])?;

        assert_eq!(config.database.database_url, "postgres://localhost/cartwheel");
        assert_eq!(config.session.session_cookie_name, "cartwheel.sid");
        assert_eq!(config.session.session_ttl().as_secs(), 604_800);
        assert_eq!(config.session.cleanup_interval().as_secs(), 300);
        assert!(config.socket_addr().ends_with(":8080"));

        Ok(())
    }

    #[test]
    fn short_session_secret_is_rejected() {
        let result = ServerConfig::try_parse_from([
            "cartwheel-json",
            "--database-url",
            "postgres://localhost/cartwheel",
            "--session-secret",
            "too-short",
        ]);

        assert!(result.is_err(), "secrets under 64 bytes must be rejected");
    }

    #[test]
    fn zero_cleanup_interval_is_rejected() {
        let result = ServerConfig::try_parse_from([
            "cartwheel-json",
            "--database-url",
            "postgres://localhost/cartwheel",
            "--session-secret",
            SECRET,
            "--session-cleanup-interval-seconds",
            "0",
        ]);

        assert!(result.is_err(), "a zero cleanup interval must be rejected");
    }
}
