use secrecy::SecretString;

use crate::domain::{
    error::DomainError,
    models::credential::{HashAlgorithm, HashedPassword},
};

/// Service for hashing and verifying passwords
///
/// Both operations are CPU-bound and blocking; async callers should run them
/// on the blocking pool.
pub trait PasswordHasher: Clone + Send + Sync + 'static {
    /// Algorithm used for hashes produced by [`PasswordHasher::hash`]
    fn algorithm(&self) -> HashAlgorithm;

    /// Hash a plain text password with a fresh salt
    fn hash(&self, plain_password: &SecretString) -> Result<HashedPassword, DomainError>;

    /// Verify a plain text password against a stored hash produced by `algorithm`.
    ///
    /// `Ok(false)` means the password is wrong. A hash that cannot be
    /// interpreted is `Err(DomainError::CorruptCredentialRecord)`, never `Ok(false)`.
    fn verify(
        &self,
        plain_password: &SecretString,
        hashed_password: &HashedPassword,
        algorithm: HashAlgorithm,
    ) -> Result<bool, DomainError>;
}
