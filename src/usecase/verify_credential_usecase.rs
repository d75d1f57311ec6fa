use chrono::Utc;
use secrecy::{ExposeSecret, SecretString};
use tracing::{Span, debug, error, field, info, instrument, warn};

use crate::{
    config::VerifierConfig,
    domain::{
        error::{DomainError, InputValidationError},
        models::{
            credential::{CredentialRecord, HashAlgorithm, HashedPassword, Identifier},
            outcome::{FailureReason, LoginAttempt, VerificationOutcome},
        },
        repositories::{
            attempt_tracker::{AttemptTracker, LockoutStatus},
            credential_repository::CredentialRepository,
        },
        services::password_service::PasswordHasher,
    },
};

/// Compared against when there is no real record, so that an unknown or
/// locked identifier costs the same as a wrong password. Never matches
/// anything that matters: the outcome on that path is a failure regardless.
const DECOY_PASSWORD: &str = "decoy-credential-never-issued";

/// Decides whether a login attempt succeeds.
///
/// Holds no mutable state of its own; the store and the attempt tracker bring
/// their own synchronization, so one verifier can serve any number of
/// concurrent requests.
pub struct CredentialVerifier<C, A, P>
where
    C: CredentialRepository,
    A: AttemptTracker + LockoutStatus,
    P: PasswordHasher,
{
    credential_repository: C,
    attempt_tracker: A,
    password_hasher: P,
    decoy: HashedPassword,
    max_identifier_bytes: usize,
    max_password_bytes: usize,
}

impl<C, A, P> CredentialVerifier<C, A, P>
where
    C: CredentialRepository,
    A: AttemptTracker + LockoutStatus,
    P: PasswordHasher,
{
    pub fn new(
        credential_repository: C,
        attempt_tracker: A,
        password_hasher: P,
        config: &VerifierConfig,
    ) -> Result<Self, DomainError> {
        let decoy = password_hasher.hash(&SecretString::from(DECOY_PASSWORD.to_string()))?;

        Ok(Self {
            credential_repository,
            attempt_tracker,
            password_hasher,
            decoy,
            max_identifier_bytes: config.max_identifier_bytes,
            max_password_bytes: config.max_password_bytes,
        })
    }

    /// Verify `password` for `identifier`.
    ///
    /// The returned outcome tells *why* a login failed and must stay internal;
    /// hand callers [`VerificationOutcome::into_result`] instead. Errors are
    /// never authentication failures: they mean bad input, a corrupt record,
    /// or an unavailable collaborator.
    #[instrument(skip_all, fields(identifier = field::Empty))]
    pub async fn verify(
        &self,
        identifier: &str,
        password: SecretString,
    ) -> Result<VerificationOutcome, DomainError> {
        let identifier = Identifier::parse(identifier, self.max_identifier_bytes)?;
        self.check_password(&password)?;
        Span::current().record("identifier", identifier.as_str());

        let now = Utc::now();
        let locked = self.attempt_tracker.is_locked(&identifier, now).await?;
        // Fetched on every path so a locked identifier costs the same store
        // round trip as the others.
        let record = self.credential_repository.fetch(&identifier).await?;

        let outcome = match record {
            _ if locked => {
                self.compare_with_decoy(password).await?;
                VerificationOutcome::Failure(FailureReason::AccountLocked)
            }
            Some(record) => self.compare_with_record(&record, password).await?,
            None => {
                self.compare_with_decoy(password).await?;
                VerificationOutcome::Failure(FailureReason::NoSuchIdentifier)
            }
        };

        self.attempt_tracker
            .record(&LoginAttempt::new(identifier, now, outcome))
            .await?;

        match outcome {
            VerificationOutcome::Success => info!("credential verified"),
            VerificationOutcome::Failure(reason) => {
                warn!(reason = reason.as_str(), "credential rejected")
            }
        }

        Ok(outcome)
    }

    fn check_password(&self, password: &SecretString) -> Result<(), InputValidationError> {
        let len = password.expose_secret().len();
        if len == 0 {
            return Err(InputValidationError::EmptyPassword);
        }
        if len > self.max_password_bytes {
            return Err(InputValidationError::PasswordTooLong {
                max: self.max_password_bytes,
            });
        }
        Ok(())
    }

    async fn compare_with_record(
        &self,
        record: &CredentialRecord,
        password: SecretString,
    ) -> Result<VerificationOutcome, DomainError> {
        let matched = match HashAlgorithm::from_tag(record.algorithm()) {
            Ok(algorithm) => {
                self.run_comparison(password, record.password_hash().clone(), algorithm)
                    .await
            }
            Err(e) => Err(e.into()),
        };

        match matched {
            Ok(true) => Ok(VerificationOutcome::Success),
            Ok(false) => Ok(VerificationOutcome::Failure(
                FailureReason::IncorrectPassword,
            )),
            Err(DomainError::CorruptCredentialRecord(e)) => {
                error!(user_id = %record.user_id(), error = %e, "corrupt credential record");
                Err(DomainError::CorruptCredentialRecord(e))
            }
            Err(e) => Err(e),
        }
    }

    async fn compare_with_decoy(&self, password: SecretString) -> Result<(), DomainError> {
        debug!("comparing against decoy");
        self.run_comparison(password, self.decoy.clone(), self.password_hasher.algorithm())
            .await
            .map(|_| ())
    }

    /// Hashing is CPU-bound; keep it off the async workers.
    async fn run_comparison(
        &self,
        password: SecretString,
        stored: HashedPassword,
        algorithm: HashAlgorithm,
    ) -> Result<bool, DomainError> {
        let hasher = self.password_hasher.clone();
        tokio::task::spawn_blocking(move || hasher.verify(&password, &stored, algorithm))
            .await
            .map_err(|e| {
                error!(error = %e, "hashing task failed");
                DomainError::TaskFailed
            })?
    }
}
