use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{
    error::RepositoryError,
    models::{credential::Identifier, outcome::LoginAttempt},
};

/// Append-only sink for login attempts. Downstream lockout logic consumes it.
///
/// Each call must be atomic with respect to other calls for the same
/// identifier so that no failure is lost under concurrency.
#[async_trait]
pub trait AttemptTracker: Send + Sync {
    async fn record(&self, attempt: &LoginAttempt) -> Result<(), RepositoryError>;
}

/// Lockout state owned by a collaborator; the verifier only asks.
///
/// The check and the later [`AttemptTracker::record`] are not one step.
/// Attempts already past the check when the lock is set still complete, so
/// an identifier can exceed the failure threshold by at most the number of
/// attempts in flight at that moment.
#[async_trait]
pub trait LockoutStatus: Send + Sync {
    async fn is_locked(
        &self,
        identifier: &Identifier,
        now: DateTime<Utc>,
    ) -> Result<bool, RepositoryError>;
}
