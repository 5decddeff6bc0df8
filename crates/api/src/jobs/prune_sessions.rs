//! Expired-session and idle rate-limit cleanup.

use std::sync::Arc;
use std::time::Duration;

use crate::middleware::RateLimiterState;
use crate::services::sessions::SessionStore;

use super::scheduler::Job;

/// Drops expired sessions and forgets rate-limit state for idle clients.
pub struct PruneSessionsJob {
    sessions: Arc<SessionStore>,
    rate_limiter: Option<Arc<RateLimiterState>>,
    interval: Duration,
}

impl PruneSessionsJob {
    pub fn new(
        sessions: Arc<SessionStore>,
        rate_limiter: Option<Arc<RateLimiterState>>,
        interval: Duration,
    ) -> Self {
        Self {
            sessions,
            rate_limiter,
            interval,
        }
    }
}

#[async_trait::async_trait]
impl Job for PruneSessionsJob {
    fn name(&self) -> &'static str {
        "prune_sessions"
    }

    fn interval(&self) -> Duration {
        self.interval
    }

    async fn execute(&self) -> Result<(), String> {
        let pruned = self.sessions.prune_expired().await;
        if pruned > 0 {
            tracing::info!(pruned, "Pruned expired sessions");
        }
        metrics::gauge!("active_sessions").set(self.sessions.len().await as f64);

        if let Some(limiter) = &self.rate_limiter {
            limiter.retain_recent();
            tracing::debug!(clients = limiter.tracked_clients(), "Rate limiter state trimmed");
        }

        Ok(())
    }
}
