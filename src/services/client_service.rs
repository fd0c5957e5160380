//! Domain service for client records.

use crate::domain::Session;
use crate::models::{Client, ClientUpdate, NewClient};
use thiserror::Error;

/// Errors specific to client operations.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Client not found: {0}")]
    NotFound(i32),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for ClientError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for ClientError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<sea_orm::DbErr>() {
            Ok(db) => Self::Database(db.to_string()),
            Err(other) => Self::Internal(format!("{other:#}")),
        }
    }
}

/// Domain service trait for clients.
#[async_trait::async_trait]
pub trait ClientService: Send + Sync {
    /// Creates a client owned by the calling commercial.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Forbidden`] unless the session is a commercial.
    async fn create(&self, session: &Session, input: NewClient) -> Result<Client, ClientError>;

    async fn get(&self, id: i32) -> Result<Client, ClientError>;

    async fn list_all(&self) -> Result<Vec<Client>, ClientError>;

    /// Clients whose commercial contact is the session's collaborator.
    async fn list_mine(&self, session: &Session) -> Result<Vec<Client>, ClientError>;

    /// Updates a client. Commercials may only touch their own clients.
    async fn update(
        &self,
        session: &Session,
        id: i32,
        changes: ClientUpdate,
    ) -> Result<Client, ClientError>;
}
