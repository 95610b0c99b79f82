//! Session Config

use std::time::Duration;

use clap::Args;

/// Minimum secret length accepted for signing session cookies.
pub(crate) const MIN_SESSION_SECRET_BYTES: usize = 64;

/// Cart session settings.
#[derive(Debug, Args)]
pub struct SessionConfig {
    /// Secret used to sign session cookies (at least 64 bytes)
    #[arg(
        long,
        env = "SESSION_SECRET",
        hide_env_values = true,
        value_parser = parse_session_secret
    )]
    pub session_secret: String,

    /// Name of the session cookie
    #[arg(long, env = "SESSION_COOKIE_NAME", default_value = "cartwheel.sid")]
    pub session_cookie_name: String,

    /// Seconds a session lives after its last use
    #[arg(
        long,
        env = "SESSION_TTL_SECONDS",
        default_value_t = 604_800_u64,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub session_ttl_seconds: u64,

    /// Seconds between sweeps that drop expired sessions
    #[arg(
        long,
        env = "SESSION_CLEANUP_INTERVAL_SECONDS",
        default_value_t = 300_u64,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub session_cleanup_interval_seconds: u64,
}

impl SessionConfig {
    pub(crate) fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_seconds)
    }

    pub(crate) fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.session_cleanup_interval_seconds)
    }
}

fn parse_session_secret(value: &str) -> Result<String, String> {
    if value.len() < MIN_SESSION_SECRET_BYTES {
        return Err(format!(
            "session secret must be at least {MIN_SESSION_SECRET_BYTES} bytes"
        ));
    }

    Ok(value.to_owned())
}
