use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::errors::ApiError;

/// One accepted submission per client address per window. A zero window disables the limit.
///
/// Clones share the same limiter, so the window holds across every server worker.
#[derive(Clone)]
pub struct SubmitRateLimit {
    limiter: Option<Arc<DefaultKeyedRateLimiter<IpAddr>>>,
}

impl SubmitRateLimit {
    pub fn new(window: Duration) -> Self {
        let limiter = Quota::with_period(window).map(|quota| Arc::new(RateLimiter::keyed(quota)));
        Self { limiter }
    }

    pub fn disabled() -> Self {
        Self { limiter: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.limiter.is_some()
    }

    /// Number of clients currently tracked.
    pub fn tracked_clients(&self) -> usize {
        self.limiter.as_ref().map_or(0, |limiter| limiter.len())
    }

    /// Forgets clients whose window has fully elapsed.
    pub fn prune(&self) {
        if let Some(limiter) = &self.limiter {
            limiter.retain_recent();
            limiter.shrink_to_fit();
        }
    }

    /// Prunes every `interval` on a background task. Nothing is spawned when the limit is off.
    pub fn spawn_pruner(&self, interval: Duration) -> Option<JoinHandle<()>> {
        self.limiter.as_ref()?;
        let limit = self.clone();
        Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                limit.prune();
            }
        }))
    }

    /// Consumes the client's slot for the current window.
    pub fn check(&self, client: Option<IpAddr>) -> Result<(), ApiError> {
        let Some(limiter) = &self.limiter else {
            return Ok(());
        };
        // Requests without a peer address share one slot.
        let client = client.unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        limiter.check_key(&client).map_err(|_| {
            tracing::warn!(client = %client, "Submission rate limit exceeded");
            ApiError::RateLimited
        })
    }
}
