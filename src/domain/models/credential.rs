use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::error::{CorruptRecordError, InputValidationError};

/// Value object representing a hashed password (PHC string, never plaintext)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashedPassword(String);

impl HashedPassword {
    /// Create a new HashedPassword from an already hashed string
    pub fn new(hash: String) -> Self {
        Self(hash)
    }

    /// Get the hash as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Login identifier (username or e-mail), trimmed and length-bounded.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier(String);

impl Identifier {
    pub fn parse(raw: &str, max_bytes: usize) -> Result<Self, InputValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(InputValidationError::EmptyIdentifier);
        }
        if trimmed.len() > max_bytes {
            return Err(InputValidationError::IdentifierTooLong { max: max_bytes });
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Algorithm tag exactly as the store holds it. May name something we
/// do not support; resolve it with [`HashAlgorithm::from_tag`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlgorithmTag(String);

impl AlgorithmTag {
    pub fn new(tag: String) -> Self {
        Self(tag)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashAlgorithm {
    Argon2id,
    Argon2i,
    Argon2d,
}

impl HashAlgorithm {
    pub fn from_tag(tag: &AlgorithmTag) -> Result<Self, CorruptRecordError> {
        match tag.as_str() {
            "argon2id" => Ok(Self::Argon2id),
            "argon2i" => Ok(Self::Argon2i),
            "argon2d" => Ok(Self::Argon2d),
            other => Err(CorruptRecordError::UnsupportedAlgorithm(other.to_string())),
        }
    }

    /// Identifier used in PHC strings
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Argon2id => "argon2id",
            Self::Argon2i => "argon2i",
            Self::Argon2d => "argon2d",
        }
    }

    pub fn tag(&self) -> AlgorithmTag {
        AlgorithmTag::new(self.as_str().to_string())
    }
}

/// Stored credential of a user. Read-only from the verifier's point of view;
/// it is created at registration and replaced on password rotation elsewhere.
#[derive(Debug, Clone)]
pub struct CredentialRecord {
    user_id: Uuid,
    identifier: Identifier,
    password_hash: HashedPassword,
    algorithm: AlgorithmTag,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CredentialRecord {
    pub fn new(
        user_id: Uuid,
        identifier: Identifier,
        password_hash: HashedPassword,
        algorithm: AlgorithmTag,
    ) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            identifier,
            password_hash,
            algorithm,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn reconstruct(
        user_id: Uuid,
        identifier: Identifier,
        password_hash: HashedPassword,
        algorithm: AlgorithmTag,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id,
            identifier,
            password_hash,
            algorithm,
            created_at,
            updated_at,
        }
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn identifier(&self) -> &Identifier {
        &self.identifier
    }

    pub fn password_hash(&self) -> &HashedPassword {
        &self.password_hash
    }

    pub fn algorithm(&self) -> &AlgorithmTag {
        &self.algorithm
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}
