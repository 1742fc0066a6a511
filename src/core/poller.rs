//! Export operation poller
//!
//! Polls an export operation's status with capped exponential backoff
//! plus jitter. Attempt `n` (0-indexed) sleeps `2^n` seconds plus a
//! uniform jitter in `[0, 1)` seconds before querying, returning as soon
//! as the operation reports DONE. With the default 8 attempts the
//! worst-case wait is about 255 seconds plus jitter: the poll duration
//! is bounded, completion detection is not.
//!
//! Exhausting the attempts is deliberately NOT an error: the last
//! observed status is returned as [`PollOutcome::Exhausted`] and the
//! caller decides whether to escalate.

use crate::adapters::database::DatabaseAdmin;
use crate::domain::ids::OperationId;
use crate::domain::operation::OperationStatus;
use crate::domain::Result;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;

/// Default number of status poll attempts
pub const DEFAULT_POLL_ATTEMPTS: u32 = 8;

/// Terminal result of a poll loop
///
/// `Exhausted` carries the last observed status so callers can
/// distinguish "still running when we gave up" from an outright remote
/// failure. Whether exhaustion should be escalated is the caller's
/// policy, not the poller's.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// The operation reached DONE within the attempt budget
    Completed(OperationStatus),

    /// All attempts were used without observing DONE
    Exhausted(OperationStatus),
}

impl PollOutcome {
    /// The status observed last, regardless of how the loop ended
    pub fn last_status(&self) -> OperationStatus {
        match self {
            PollOutcome::Completed(status) | PollOutcome::Exhausted(status) => *status,
        }
    }
}

/// Status poller for export operations
pub struct OperationPoller {
    admin: Arc<dyn DatabaseAdmin>,
    max_attempts: u32,
}

impl OperationPoller {
    /// Create a poller with the default attempt budget
    pub fn new(admin: Arc<dyn DatabaseAdmin>) -> Self {
        Self::with_max_attempts(admin, DEFAULT_POLL_ATTEMPTS)
    }

    /// Create a poller with an explicit attempt budget
    pub fn with_max_attempts(admin: Arc<dyn DatabaseAdmin>, max_attempts: u32) -> Self {
        Self {
            admin,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Poll the operation until DONE or the attempt budget runs out
    ///
    /// # Errors
    ///
    /// Returns an error only if a status query itself fails; an
    /// operation that never reaches DONE is an `Ok(Exhausted(_))`.
    pub async fn poll(&self, id: &OperationId) -> Result<PollOutcome> {
        let mut last = OperationStatus::Unknown;

        for attempt in 0..self.max_attempts {
            tokio::time::sleep(backoff_delay(attempt)).await;

            last = self.admin.operation_status(id).await?;

            if last == OperationStatus::Done {
                tracing::debug!(
                    operation = %id,
                    attempts = attempt + 1,
                    "Export operation completed"
                );
                return Ok(PollOutcome::Completed(last));
            }

            tracing::debug!(
                operation = %id,
                attempt = attempt + 1,
                max_attempts = self.max_attempts,
                status = %last,
                "Export operation still pending"
            );
        }

        Ok(PollOutcome::Exhausted(last))
    }
}

/// Delay before attempt `n`: `2^n` seconds plus uniform jitter in `[0, 1)`
fn backoff_delay(attempt: u32) -> Duration {
    let base = 2u64.pow(attempt);
    let jitter: f64 = rand::thread_rng().gen_range(0.0..1.0);
    Duration::from_secs_f64(base as f64 + jitter)
}
