//! `SeaORM` implementation of the `EventService` trait.

use crate::db::Store;
use crate::domain::{CollaboratorId, Role, Session};
use crate::models::{Event, EventFilter, EventUpdate, NewEvent};
use crate::services::event_service::{EventError, EventService};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use tracing::info;

pub struct SeaOrmEventService {
    store: Store,
}

impl SeaOrmEventService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    fn validate_window(start: NaiveDateTime, end: NaiveDateTime) -> Result<(), EventError> {
        if end < start {
            return Err(EventError::Validation(
                "An event cannot end before it starts".to_string(),
            ));
        }
        Ok(())
    }

    fn validate_attendees(attendees: i32) -> Result<(), EventError> {
        if attendees < 0 {
            return Err(EventError::Validation(
                "Attendees cannot be negative".to_string(),
            ));
        }
        Ok(())
    }

    async fn validate_support(&self, support_id: i32) -> Result<(), EventError> {
        let support = self
            .store
            .get_collaborator(CollaboratorId::new(support_id))
            .await?;
        match support {
            Some(c) if c.role == Role::Support => Ok(()),
            Some(c) => Err(EventError::Validation(format!(
                "{} is not a support collaborator",
                c.username
            ))),
            None => Err(EventError::Validation(format!(
                "No collaborator with id {support_id}"
            ))),
        }
    }
}

#[async_trait]
impl EventService for SeaOrmEventService {
    async fn create(&self, session: &Session, input: NewEvent) -> Result<Event, EventError> {
        if session.role != Role::Commercial {
            return Err(EventError::Forbidden(
                "only commercials can create events".to_string(),
            ));
        }
        Self::validate_window(input.start_at, input.end_at)?;
        Self::validate_attendees(input.attendees)?;

        let contract = self
            .store
            .get_contract(input.contract_id)
            .await?
            .ok_or(EventError::ContractNotFound(input.contract_id))?;

        if !session.owns(contract.commercial_id) {
            return Err(EventError::Forbidden(format!(
                "contract {} belongs to another commercial",
                contract.id
            )));
        }
        if !contract.signed {
            return Err(EventError::Validation(format!(
                "contract {} is not signed yet",
                contract.id
            )));
        }

        let client = self
            .store
            .get_client(contract.client_id)
            .await?
            .ok_or_else(|| EventError::Internal(format!("client {} missing", contract.client_id)))?;

        let event = self.store.create_event(&input, &client.full_name).await?;
        info!(
            "{} created event {} for contract {}",
            session.username, event.id, contract.id
        );
        Ok(event)
    }

    async fn get(&self, id: i32) -> Result<Event, EventError> {
        self.store.get_event(id).await?.ok_or(EventError::NotFound(id))
    }

    async fn list(&self, filter: EventFilter) -> Result<Vec<Event>, EventError> {
        let now = chrono::Local::now().naive_local();
        Ok(self.store.list_events(filter, now).await?)
    }

    async fn list_mine(&self, session: &Session) -> Result<Vec<Event>, EventError> {
        Ok(self
            .store
            .list_events_by_support(session.collaborator_id.value())
            .await?)
    }

    async fn update(
        &self,
        session: &Session,
        id: i32,
        changes: EventUpdate,
    ) -> Result<Event, EventError> {
        let existing = self.get(id).await?;

        match session.role {
            Role::Management => {}
            Role::Support if session.owns(existing.support_id) => {
                if changes.support_id.is_some() {
                    return Err(EventError::Forbidden(
                        "only management can reassign support".to_string(),
                    ));
                }
            }
            _ => {
                return Err(EventError::Forbidden(format!(
                    "event {id} is not assigned to you"
                )));
            }
        }

        Self::validate_window(
            changes.start_at.unwrap_or(existing.start_at),
            changes.end_at.unwrap_or(existing.end_at),
        )?;
        if let Some(attendees) = changes.attendees {
            Self::validate_attendees(attendees)?;
        }
        if let Some(Some(support_id)) = changes.support_id {
            self.validate_support(support_id).await?;
        }

        let updated = self
            .store
            .update_event(id, &changes)
            .await?
            .ok_or(EventError::NotFound(id))?;
        info!("{} updated event {}", session.username, id);
        Ok(updated)
    }

    async fn delete(&self, session: &Session, id: i32) -> Result<(), EventError> {
        if !session.is_management() {
            return Err(EventError::Forbidden(
                "only management can delete events".to_string(),
            ));
        }
        if !self.store.delete_event(id).await? {
            return Err(EventError::NotFound(id));
        }
        info!("{} deleted event {}", session.username, id);
        Ok(())
    }
}
