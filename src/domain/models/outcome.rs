use chrono::{DateTime, Utc};

use crate::domain::{error::DomainError, models::credential::Identifier};

/// Why a verification failed. Internal only: used for logging and lockout,
/// never handed to an untrusted caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    NoSuchIdentifier,
    IncorrectPassword,
    AccountLocked,
}

impl FailureReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoSuchIdentifier => "no_such_identifier",
            Self::IncorrectPassword => "incorrect_password",
            Self::AccountLocked => "account_locked",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationOutcome {
    Success,
    Failure(FailureReason),
}

impl VerificationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// Collapse the outcome into what an untrusted caller may see.
    pub fn into_result(self) -> Result<(), DomainError> {
        match self {
            Self::Success => Ok(()),
            Self::Failure(_) => Err(DomainError::AuthenticationFailed),
        }
    }
}

/// One login attempt as reported to the attempt tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginAttempt {
    pub identifier: Identifier,
    pub timestamp: DateTime<Utc>,
    pub success: bool,
}

impl LoginAttempt {
    pub fn new(identifier: Identifier, timestamp: DateTime<Utc>, outcome: VerificationOutcome) -> Self {
        Self {
            identifier,
            timestamp,
            success: outcome.is_success(),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn success_maps_to_ok() {
        assert!(VerificationOutcome::Success.into_result().is_ok());
    }

    #[rstest]
    #[case(FailureReason::NoSuchIdentifier)]
    #[case(FailureReason::IncorrectPassword)]
    #[case(FailureReason::AccountLocked)]
    fn every_failure_collapses_to_the_same_error(#[case] reason: FailureReason) {
        let err = VerificationOutcome::Failure(reason).into_result().unwrap_err();
        assert!(matches!(err, DomainError::AuthenticationFailed));
        assert_eq!(err.to_string(), "Invalid credentials");
    }

    #[test]
    fn attempt_carries_success_flag() {
        let identifier = Identifier::parse("alice", 254).unwrap();
        let now = Utc::now();

        let ok = LoginAttempt::new(identifier.clone(), now, VerificationOutcome::Success);
        let failed = LoginAttempt::new(
            identifier,
            now,
            VerificationOutcome::Failure(FailureReason::IncorrectPassword),
        );

        assert!(ok.success);
        assert!(!failed.success);
        assert_eq!(ok.timestamp, now);
    }
}
