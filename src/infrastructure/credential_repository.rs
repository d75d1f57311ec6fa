use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use tracing::debug;

use crate::{
    domain::{
        error::RepositoryError,
        models::credential::{AlgorithmTag, CredentialRecord, HashedPassword, Identifier},
        repositories::credential_repository::CredentialRepository,
    },
    infrastructure::entity::credentials,
};

pub struct SeaOrmCredentialRepository {
    db: DatabaseConnection,
}

impl SeaOrmCredentialRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CredentialRepository for SeaOrmCredentialRepository {
    async fn fetch(
        &self,
        identifier: &Identifier,
    ) -> Result<Option<CredentialRecord>, RepositoryError> {
        let credential = credentials::Entity::find()
            .filter(credentials::Column::Identifier.eq(identifier.as_str()))
            .one(&self.db)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        let Some(credential) = credential else {
            debug!(%identifier, "no credential stored");
            return Ok(None);
        };

        Ok(Some(CredentialRecord::reconstruct(
            credential.user_id,
            identifier.clone(),
            HashedPassword::new(credential.password_hash),
            AlgorithmTag::new(credential.hash_algorithm),
            credential.created_at.with_timezone(&Utc),
            credential.updated_at.with_timezone(&Utc),
        )))
    }
}
