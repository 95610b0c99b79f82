//! Session store lifecycle.
//!
//! Sessions live in memory and expire after the configured time to live.
//! Expired sessions are only dropped from the store by the reaper.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    time::Duration,
};

use salvo::session::{MemoryStore, SessionHandler};
use tokio::{
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};
use tracing::{debug, warn};

/// Session layer keeping cart snapshots in `store` behind a signed cookie.
pub(crate) fn session_handler(
    store: MemoryStore,
    secret: &str,
    cookie_name: &str,
    ttl: Duration,
) -> Result<SessionHandler<MemoryStore>, salvo::Error> {
    SessionHandler::builder(store, secret.as_bytes())
        .cookie_name(cookie_name)
        .session_ttl(Some(ttl))
        .build()
}

/// Periodically removes expired sessions from the in-memory store.
pub(crate) struct SessionReaper {
    store: MemoryStore,
    every: Duration,
}

impl Debug for SessionReaper {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("SessionReaper")
            .field("every", &self.every)
            .finish_non_exhaustive()
    }
}

impl SessionReaper {
    pub(crate) fn new(store: MemoryStore, every: Duration) -> Self {
        Self { store, every }
    }

    /// Run the reaper until the process exits.
    pub(crate) fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = time::interval(self.every);

            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                interval.tick().await;

                self.run_once().await;
            }
        })
    }

    /// Drop every expired session, returning how many were removed.
    pub(crate) async fn run_once(&self) -> usize {
        let before = self.store.count().await;

        if let Err(error) = self.store.cleanup().await {
            warn!("failed to remove expired sessions: {error}");

            return 0;
        }

        let removed = before.saturating_sub(self.store.count().await);

        if removed > 0 {
            debug!(removed, remaining = before - removed, "removed expired sessions");
        }

        removed
    }
}
