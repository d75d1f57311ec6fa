use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::warn;

use crate::{
    config::LockoutConfig,
    domain::{
        error::RepositoryError,
        models::{credential::Identifier, outcome::LoginAttempt},
        repositories::attempt_tracker::{AttemptTracker, LockoutStatus},
    },
};

#[derive(Debug, Default)]
struct FailureHistory {
    failures: Vec<DateTime<Utc>>,
    locked_until: Option<DateTime<Utc>>,
}

impl FailureHistory {
    /// Nothing left that could count towards or enforce a lock.
    fn is_stale(&self, window_start: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        self.failures.iter().all(|at| *at <= window_start)
            && self.locked_until.is_none_or(|until| until <= now)
    }
}

/// Process-local attempt tracker: counts failures per identifier inside a
/// sliding window and locks the identifier once the threshold is reached.
#[derive(Clone)]
pub struct InMemoryAttemptTracker {
    config: LockoutConfig,
    histories: Arc<Mutex<HashMap<Identifier, FailureHistory>>>,
}

impl InMemoryAttemptTracker {
    pub fn new(config: LockoutConfig) -> Self {
        Self {
            config,
            histories: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn histories(
        &self,
    ) -> Result<MutexGuard<'_, HashMap<Identifier, FailureHistory>>, RepositoryError> {
        self.histories
            .lock()
            .map_err(|_| RepositoryError::TrackerUnavailable("lock poisoned".to_string()))
    }
}

#[async_trait]
impl AttemptTracker for InMemoryAttemptTracker {
    async fn record(&self, attempt: &LoginAttempt) -> Result<(), RepositoryError> {
        let mut histories = self.histories()?;
        let window_start = attempt.timestamp - self.config.window;
        histories.retain(|_, history| !history.is_stale(window_start, attempt.timestamp));

        if attempt.success {
            histories.remove(&attempt.identifier);
            return Ok(());
        }

        let history = histories.entry(attempt.identifier.clone()).or_default();
        history.failures.retain(|at| *at > window_start);
        history.failures.push(attempt.timestamp);

        if history.failures.len() >= self.config.max_failures as usize {
            let until = attempt.timestamp + self.config.lockout_duration;
            history.locked_until = Some(until);
            warn!(
                identifier = %attempt.identifier,
                failures = history.failures.len(),
                %until,
                "identifier locked out"
            );
        }

        Ok(())
    }
}

#[async_trait]
impl LockoutStatus for InMemoryAttemptTracker {
    async fn is_locked(
        &self,
        identifier: &Identifier,
        now: DateTime<Utc>,
    ) -> Result<bool, RepositoryError> {
        let histories = self.histories()?;
        Ok(histories
            .get(identifier)
            .and_then(|history| history.locked_until)
            .is_some_and(|until| now < until))
    }
}
