use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::{SignedUrlCache, EXPIRATION_WINDOW};

/// Background task that periodically drops expired entries from a [`SignedUrlCache`]
///
/// Lazy expiry on read never cleans up keys that stop being requested (e.g. deleted objects),
/// so the sweep bounds the size of the persisted cache.
pub struct ExpirationSweep {
    cache: Arc<SignedUrlCache>,
    period: Duration,
    shutdown_token: CancellationToken,
}

impl ExpirationSweep {
    /// Creates a sweep running once per [`EXPIRATION_WINDOW`]
    #[must_use]
    pub fn new(cache: Arc<SignedUrlCache>) -> Self {
        Self::with_period(cache, EXPIRATION_WINDOW)
    }

    /// Creates a sweep running once per `period`
    #[must_use]
    pub fn with_period(cache: Arc<SignedUrlCache>, period: Duration) -> Self {
        Self {
            cache,
            period,
            shutdown_token: CancellationToken::new(),
        }
    }

    /// Returns a clone of the shutdown token for external control
    #[must_use]
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown_token.clone()
    }

    /// Removes expired entries once, returning how many were removed
    pub fn sweep_once(&self) -> usize {
        let removed = self.cache.remove_expired(crate::now_millis());
        if removed > 0 {
            info!("Expiration sweep removed {removed} signed URL cache entries");
        } else {
            debug!("Expiration sweep found no expired entries");
        }
        removed
    }

    /// Sweeps immediately, then once per period until the shutdown token is cancelled
    pub async fn run(self) {
        let mut interval = tokio::time::interval(self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                () = self.shutdown_token.cancelled() => {
                    debug!("Expiration sweep stopped");
                    break;
                }
                _ = interval.tick() => {
                    self.sweep_once();
                }
            }
        }
    }

    /// Spawns [`Self::run`] on the current tokio runtime
    #[must_use]
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }
}
