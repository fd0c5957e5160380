//! Domain service for authentication and the single connected collaborator.
//!
//! At most one collaborator carries `is_connected = true`. A successful login
//! claims that flag and hands back a [`Session`]; the console passes the
//! session to every later operation and releases the flag when it exits.

use crate::domain::{CollaboratorId, Role, Session};
use thiserror::Error;

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown username or wrong password; deliberately not told apart.
    #[error("Authentication failed")]
    InvalidCredentials,

    #[error("{0} is already connected")]
    SessionActive(String),

    /// The session no longer holds the connected flag.
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<sea_orm::DbErr>() {
            Ok(db) => Self::Database(db.to_string()),
            Err(other) => Self::Internal(format!("{other:#}")),
        }
    }
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Verifies credentials and marks the collaborator as connected.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] for an unknown username or a
    /// wrong password, and [`AuthError::SessionActive`] while another
    /// collaborator holds a fresh session.
    async fn authenticate(&self, username: &str, password: &str) -> Result<Session, AuthError>;

    /// Returns the connected collaborator's id and role, if any.
    async fn current_connected(&self) -> Result<Option<(CollaboratorId, Role)>, AuthError>;

    /// Records activity for the session so it is not treated as stale.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Unauthorized`] when the session's connected flag
    /// was cleared by `disconnect` or by a later login reclaiming it.
    async fn touch(&self, session: &Session) -> Result<(), AuthError>;

    /// Clears the session's own connected flag and nobody else's.
    ///
    /// Returns false when the flag had already been cleared or taken over.
    async fn release(&self, session: &Session) -> Result<bool, AuthError>;

    /// Clears the connected flag wherever it is set.
    async fn disconnect(&self) -> Result<(), AuthError>;
}
