//! Domain service for contracts between clients and the company.

use crate::domain::Session;
use crate::models::{Contract, ContractFilter, ContractUpdate, NewContract};
use thiserror::Error;

/// Errors specific to contract operations.
#[derive(Debug, Error)]
pub enum ContractError {
    #[error("Contract not found: {0}")]
    NotFound(i32),

    #[error("Client not found: {0}")]
    ClientNotFound(i32),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for ContractError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for ContractError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<sea_orm::DbErr>() {
            Ok(db) => Self::Database(db.to_string()),
            Err(other) => Self::Internal(format!("{other:#}")),
        }
    }
}

/// Domain service trait for contracts.
#[async_trait::async_trait]
pub trait ContractService: Send + Sync {
    /// Creates a contract; the client's commercial becomes its commercial.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError::Forbidden`] unless the session is management.
    async fn create(&self, session: &Session, input: NewContract)
    -> Result<Contract, ContractError>;

    async fn get(&self, id: i32) -> Result<Contract, ContractError>;

    async fn list(&self, filter: ContractFilter) -> Result<Vec<Contract>, ContractError>;

    /// Management may update any contract, a commercial only their own.
    async fn update(
        &self,
        session: &Session,
        id: i32,
        changes: ContractUpdate,
    ) -> Result<Contract, ContractError>;
}
