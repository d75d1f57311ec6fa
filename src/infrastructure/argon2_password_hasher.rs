use argon2::{
    Algorithm, Argon2, Params, PasswordHash as Argon2Hash, Version,
    password_hash::{PasswordHasher as Argon2Hasher, Salt, SaltString},
};
use rand_core::OsRng;
use secrecy::{ExposeSecret, SecretString};

use crate::{
    config::HashingParams,
    domain::{
        error::{CorruptRecordError, DomainError},
        models::credential::{HashAlgorithm, HashedPassword},
        services::password_service::PasswordHasher,
    },
    infrastructure::constant_time::constant_time_eq,
};

/// Argon2 hasher. New hashes use Argon2id with the configured cost; stored
/// hashes are recomputed with whatever cost, version and salt they record.
#[derive(Clone)]
pub struct Argon2PasswordHasher {
    params: Params,
}

impl Argon2PasswordHasher {
    pub fn new(hashing: HashingParams) -> Result<Self, DomainError> {
        let params = Params::new(
            hashing.memory_kib,
            hashing.iterations,
            hashing.parallelism,
            None,
        )
        .map_err(|e| DomainError::Hashing(e.to_string()))?;

        Ok(Self { params })
    }
}

fn argon2_algorithm(algorithm: HashAlgorithm) -> Algorithm {
    match algorithm {
        HashAlgorithm::Argon2id => Algorithm::Argon2id,
        HashAlgorithm::Argon2i => Algorithm::Argon2i,
        HashAlgorithm::Argon2d => Algorithm::Argon2d,
    }
}

fn invalid_parameters(e: impl ToString) -> DomainError {
    CorruptRecordError::InvalidParameters(e.to_string()).into()
}

impl PasswordHasher for Argon2PasswordHasher {
    fn algorithm(&self) -> HashAlgorithm {
        HashAlgorithm::Argon2id
    }

    fn hash(&self, plain_password: &SecretString) -> Result<HashedPassword, DomainError> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone());

        let hash = argon2
            .hash_password(plain_password.expose_secret().as_bytes(), &salt)
            .map_err(|e| DomainError::Hashing(e.to_string()))?
            .to_string();

        Ok(HashedPassword::new(hash))
    }

    fn verify(
        &self,
        plain_password: &SecretString,
        hashed_password: &HashedPassword,
        algorithm: HashAlgorithm,
    ) -> Result<bool, DomainError> {
        let parsed = Argon2Hash::new(hashed_password.as_str())
            .map_err(|e| CorruptRecordError::MalformedHash(e.to_string()))?;

        if parsed.algorithm.as_str() != algorithm.as_str() {
            return Err(CorruptRecordError::AlgorithmMismatch {
                tag: algorithm.as_str().to_string(),
                found: parsed.algorithm.as_str().to_string(),
            }
            .into());
        }

        let salt = parsed.salt.ok_or(CorruptRecordError::MissingSalt)?;
        let expected = parsed.hash.ok_or(CorruptRecordError::MissingOutput)?;
        let params = Params::try_from(&parsed).map_err(invalid_parameters)?;
        let version = match parsed.version {
            Some(v) => Version::try_from(v).map_err(invalid_parameters)?,
            None => Version::default(),
        };

        let mut salt_buf = [0u8; Salt::MAX_LENGTH];
        let salt_bytes = salt.decode_b64(&mut salt_buf).map_err(invalid_parameters)?;

        // Recompute into a buffer sized like the stored output, then compare
        // without short-circuiting.
        let mut computed = vec![0u8; expected.len()];
        Argon2::new(argon2_algorithm(algorithm), version, params)
            .hash_password_into(
                plain_password.expose_secret().as_bytes(),
                salt_bytes,
                &mut computed,
            )
            .map_err(invalid_parameters)?;

        Ok(constant_time_eq(&computed, expected.as_bytes()))
    }
}
