use std::time::Duration;

use chrono::{DateTime, Utc};
use secrecy::SecretString;
use tracing::warn;

use crate::{
    domain::{
        error::DomainError,
        repositories::{
            attempt_tracker::{AttemptTracker, LockoutStatus},
            credential_repository::CredentialRepository,
        },
        services::password_service::PasswordHasher,
    },
    usecase::verify_credential_usecase::CredentialVerifier,
};

#[derive(Debug)]
pub struct LoginResult {
    pub identifier: String,
    pub authenticated_at: DateTime<Utc>,
}

/// What the login layer calls: bounds the whole verification in time and
/// hides the failure reason behind [`DomainError::AuthenticationFailed`].
pub struct LoginUsecase<C, A, P>
where
    C: CredentialRepository,
    A: AttemptTracker + LockoutStatus,
    P: PasswordHasher,
{
    verifier: CredentialVerifier<C, A, P>,
    timeout: Duration,
}

impl<C, A, P> LoginUsecase<C, A, P>
where
    C: CredentialRepository,
    A: AttemptTracker + LockoutStatus,
    P: PasswordHasher,
{
    pub fn new(verifier: CredentialVerifier<C, A, P>, timeout: Duration) -> Self {
        Self { verifier, timeout }
    }

    pub async fn login(
        &self,
        identifier: String,
        password: SecretString,
    ) -> Result<LoginResult, DomainError> {
        let outcome = tokio::time::timeout(self.timeout, self.verifier.verify(&identifier, password))
            .await
            .map_err(|_| {
                warn!(timeout_ms = self.timeout.as_millis() as u64, "verification timed out");
                DomainError::Timeout
            })??;

        outcome.into_result()?;

        Ok(LoginResult {
            identifier: identifier.trim().to_string(),
            authenticated_at: Utc::now(),
        })
    }
}
