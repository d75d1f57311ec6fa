use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Carries no reason on purpose: unknown identifier, wrong password and
    /// locked account all surface as this one variant.
    #[error("Invalid credentials")]
    AuthenticationFailed,

    #[error("Invalid input: {0}")]
    InvalidInput(#[from] InputValidationError),

    #[error("Corrupt credential record: {0}")]
    CorruptCredentialRecord(#[from] CorruptRecordError),

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Background hashing task failed")]
    TaskFailed,

    #[error("Verification timed out")]
    Timeout,
}

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Attempt tracker unavailable: {0}")]
    TrackerUnavailable(String),
}

/// Rejections raised before any lookup or hashing work happens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputValidationError {
    #[error("identifier must not be empty")]
    EmptyIdentifier,

    #[error("identifier exceeds {max} bytes")]
    IdentifierTooLong { max: usize },

    #[error("password must not be empty")]
    EmptyPassword,

    #[error("password exceeds {max} bytes")]
    PasswordTooLong { max: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CorruptRecordError {
    #[error("unsupported hash algorithm tag `{0}`")]
    UnsupportedAlgorithm(String),

    #[error("stored hash uses `{found}` but record is tagged `{tag}`")]
    AlgorithmMismatch { tag: String, found: String },

    #[error("stored hash is not a valid PHC string: {0}")]
    MalformedHash(String),

    #[error("stored hash has no salt")]
    MissingSalt,

    #[error("stored hash has no output")]
    MissingOutput,

    #[error("stored hash parameters rejected: {0}")]
    InvalidParameters(String),
}
