//! Domain service for managing collaborator accounts.
//!
//! Account administration is reserved to management, except for the very
//! first account which bootstraps an empty database.

use crate::domain::{CollaboratorId, Session};
use crate::models::{Collaborator, CollaboratorUpdate, NewCollaborator};
use thiserror::Error;

/// Errors specific to collaborator operations.
#[derive(Debug, Error)]
pub enum CollaboratorError {
    #[error("Collaborator not found: {0}")]
    NotFound(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for CollaboratorError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for CollaboratorError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<sea_orm::DbErr>() {
            Ok(db) => Self::Database(db.to_string()),
            Err(other) => Self::Internal(format!("{other:#}")),
        }
    }
}

/// Domain service trait for collaborators.
#[async_trait::async_trait]
pub trait CollaboratorService: Send + Sync {
    /// Creates the first collaborator of an empty database.
    ///
    /// # Errors
    ///
    /// Returns [`CollaboratorError::Conflict`] once any collaborator exists.
    async fn bootstrap(&self, input: NewCollaborator) -> Result<Collaborator, CollaboratorError>;

    /// Creates a collaborator with freshly derived credentials.
    async fn create(
        &self,
        session: &Session,
        input: NewCollaborator,
    ) -> Result<Collaborator, CollaboratorError>;

    /// Lists collaborators ordered by username, optionally one username only.
    async fn list(
        &self,
        session: &Session,
        username: Option<&str>,
    ) -> Result<Vec<Collaborator>, CollaboratorError>;

    async fn list_commercials(&self) -> Result<Vec<Collaborator>, CollaboratorError>;

    /// Username for an id, or `"Unknown"` when there is none.
    async fn display_name(&self, id: Option<i32>) -> Result<String, CollaboratorError>;

    async fn update(
        &self,
        session: &Session,
        username: &str,
        changes: CollaboratorUpdate,
    ) -> Result<Collaborator, CollaboratorError>;

    /// Derives a new salt and hash for the collaborator.
    async fn reset_password(
        &self,
        session: &Session,
        username: &str,
        new_password: &str,
    ) -> Result<(), CollaboratorError>;

    async fn delete(&self, session: &Session, username: &str) -> Result<(), CollaboratorError>;

    async fn get(&self, id: CollaboratorId) -> Result<Collaborator, CollaboratorError>;
}
