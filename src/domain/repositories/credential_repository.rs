use async_trait::async_trait;

use crate::domain::{
    error::RepositoryError,
    models::credential::{CredentialRecord, Identifier},
};

/// Read-only access to the store that owns credential records.
#[async_trait]
pub trait CredentialRepository: Send + Sync {
    async fn fetch(&self, identifier: &Identifier)
    -> Result<Option<CredentialRecord>, RepositoryError>;
}
