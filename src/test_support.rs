//! Mock collaborators shared by the unit tests.

use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use secrecy::SecretString;
use uuid::Uuid;

use crate::{
    config::{HashingParams, VerifierConfig},
    domain::{
        error::{DomainError, RepositoryError},
        models::{
            credential::{AlgorithmTag, CredentialRecord, HashAlgorithm, HashedPassword, Identifier},
            outcome::LoginAttempt,
        },
        repositories::{
            attempt_tracker::{AttemptTracker, LockoutStatus},
            credential_repository::CredentialRepository,
        },
        services::password_service::PasswordHasher,
    },
    infrastructure::argon2_password_hasher::Argon2PasswordHasher,
};

pub const ALICE_ID: &str = "00000000-0000-0000-0000-000000000001";
pub const ALICE_PASSWORD: &str = "correcthorse";

pub fn secret(s: &str) -> SecretString {
    SecretString::from(s.to_string())
}

pub fn identifier(s: &str) -> Identifier {
    Identifier::parse(s, 254).unwrap()
}

/// Cheapest cost Argon2 accepts, so tests stay fast.
pub fn fast_hashing() -> HashingParams {
    HashingParams {
        memory_kib: 8,
        iterations: 1,
        parallelism: 1,
    }
}

pub fn test_config() -> VerifierConfig {
    VerifierConfig {
        hashing: fast_hashing(),
        ..VerifierConfig::default()
    }
}

/// Argon2 hasher that counts how many verifications it ran.
#[derive(Clone)]
pub struct CountingHasher {
    inner: Argon2PasswordHasher,
    verifications: Arc<AtomicUsize>,
}

impl CountingHasher {
    pub fn new(hashing: HashingParams) -> Self {
        Self {
            inner: Argon2PasswordHasher::new(hashing).unwrap(),
            verifications: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn verifications(&self) -> usize {
        self.verifications.load(Ordering::SeqCst)
    }
}

impl PasswordHasher for CountingHasher {
    fn algorithm(&self) -> HashAlgorithm {
        self.inner.algorithm()
    }

    fn hash(&self, plain_password: &SecretString) -> Result<HashedPassword, DomainError> {
        self.inner.hash(plain_password)
    }

    fn verify(
        &self,
        plain_password: &SecretString,
        hashed_password: &HashedPassword,
        algorithm: HashAlgorithm,
    ) -> Result<bool, DomainError> {
        self.verifications.fetch_add(1, Ordering::SeqCst);
        self.inner.verify(plain_password, hashed_password, algorithm)
    }
}

// mock credential store
#[derive(Clone, Default)]
pub struct MockCredentialRepository {
    records: Arc<HashMap<Identifier, CredentialRecord>>,
    fetches: Arc<AtomicUsize>,
    delay: Option<Duration>,
}

impl MockCredentialRepository {
    /// Store holding:
    /// - `alice`: argon2id hash of [`ALICE_PASSWORD`]
    /// - `mallory`: record tagged with an unsupported algorithm
    /// - `eve`: record whose hash is not a PHC string
    pub fn seeded(hasher: &impl PasswordHasher) -> Self {
        let alice_hash = hasher.hash(&secret(ALICE_PASSWORD)).unwrap();

        let records = [
            CredentialRecord::new(
                Uuid::parse_str(ALICE_ID).unwrap(),
                identifier("alice"),
                alice_hash.clone(),
                HashAlgorithm::Argon2id.tag(),
            ),
            CredentialRecord::new(
                Uuid::new_v4(),
                identifier("mallory"),
                alice_hash,
                AlgorithmTag::new("md5".to_string()),
            ),
            CredentialRecord::new(
                Uuid::new_v4(),
                identifier("eve"),
                HashedPassword::new("5f4dcc3b5aa765d61d8327deb882cf99".to_string()),
                HashAlgorithm::Argon2id.tag(),
            ),
        ];

        Self {
            records: Arc::new(
                records
                    .into_iter()
                    .map(|r| (r.identifier().clone(), r))
                    .collect(),
            ),
            ..Self::default()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CredentialRepository for MockCredentialRepository {
    async fn fetch(
        &self,
        identifier: &Identifier,
    ) -> Result<Option<CredentialRecord>, RepositoryError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        Ok(self.records.get(identifier).cloned())
    }
}

// mock attempt tracker
#[derive(Clone, Default)]
pub struct RecordingTracker {
    attempts: Arc<Mutex<Vec<LoginAttempt>>>,
    locked: bool,
    unavailable: bool,
}

impl RecordingTracker {
    pub fn locked() -> Self {
        Self {
            locked: true,
            ..Self::default()
        }
    }

    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    pub fn attempts(&self) -> Vec<LoginAttempt> {
        self.attempts.lock().unwrap().clone()
    }
}

#[async_trait]
impl AttemptTracker for RecordingTracker {
    async fn record(&self, attempt: &LoginAttempt) -> Result<(), RepositoryError> {
        if self.unavailable {
            return Err(RepositoryError::TrackerUnavailable("offline".to_string()));
        }
        self.attempts.lock().unwrap().push(attempt.clone());
        Ok(())
    }
}

#[async_trait]
impl LockoutStatus for RecordingTracker {
    async fn is_locked(
        &self,
        _identifier: &Identifier,
        _now: DateTime<Utc>,
    ) -> Result<bool, RepositoryError> {
        Ok(self.locked)
    }
}
