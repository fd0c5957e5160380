//! Domain service for events organised under signed contracts.

use crate::domain::Session;
use crate::models::{Event, EventFilter, EventUpdate, NewEvent};
use thiserror::Error;

/// Errors specific to event operations.
#[derive(Debug, Error)]
pub enum EventError {
    #[error("Event not found: {0}")]
    NotFound(i32),

    #[error("Contract not found: {0}")]
    ContractNotFound(i32),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for EventError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for EventError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<sea_orm::DbErr>() {
            Ok(db) => Self::Database(db.to_string()),
            Err(other) => Self::Internal(format!("{other:#}")),
        }
    }
}

/// Domain service trait for events.
#[async_trait::async_trait]
pub trait EventService: Send + Sync {
    /// Creates an event for a signed contract of one of the caller's clients.
    async fn create(&self, session: &Session, input: NewEvent) -> Result<Event, EventError>;

    async fn get(&self, id: i32) -> Result<Event, EventError>;

    /// Events matching `filter`, ordered by start time.
    async fn list(&self, filter: EventFilter) -> Result<Vec<Event>, EventError>;

    /// Events assigned to the session's collaborator.
    async fn list_mine(&self, session: &Session) -> Result<Vec<Event>, EventError>;

    /// Management may change anything including the support assignment;
    /// support may edit the events assigned to them.
    async fn update(
        &self,
        session: &Session,
        id: i32,
        changes: EventUpdate,
    ) -> Result<Event, EventError>;

    async fn delete(&self, session: &Session, id: i32) -> Result<(), EventError>;
}
