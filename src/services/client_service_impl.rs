//! `SeaORM` implementation of the `ClientService` trait.

use crate::db::Store;
use crate::domain::{Role, Session};
use crate::models::{Client, ClientUpdate, DATE_FORMAT, NewClient};
use crate::services::client_service::{ClientError, ClientService};
use async_trait::async_trait;
use tracing::info;

pub struct SeaOrmClientService {
    store: Store,
}

impl SeaOrmClientService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    fn today() -> String {
        chrono::Local::now()
            .date_naive()
            .format(DATE_FORMAT)
            .to_string()
    }

    fn validate_email(email: &str) -> Result<(), ClientError> {
        match email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
            _ => Err(ClientError::Validation(format!("Invalid email: {email}"))),
        }
    }

    fn validate_new(input: &NewClient) -> Result<(), ClientError> {
        if input.full_name.trim().is_empty() {
            return Err(ClientError::Validation(
                "Client name cannot be empty".to_string(),
            ));
        }
        Self::validate_email(input.email.trim())
    }
}

#[async_trait]
impl ClientService for SeaOrmClientService {
    async fn create(&self, session: &Session, input: NewClient) -> Result<Client, ClientError> {
        if session.role != Role::Commercial {
            return Err(ClientError::Forbidden(
                "only commercials can add clients".to_string(),
            ));
        }
        Self::validate_new(&input)?;

        let client = self
            .store
            .create_client(&input, session.collaborator_id.value(), &Self::today())
            .await?;
        info!("{} added client {}", session.username, client.id);
        Ok(client)
    }

    async fn get(&self, id: i32) -> Result<Client, ClientError> {
        self.store
            .get_client(id)
            .await?
            .ok_or(ClientError::NotFound(id))
    }

    async fn list_all(&self) -> Result<Vec<Client>, ClientError> {
        Ok(self.store.list_clients().await?)
    }

    async fn list_mine(&self, session: &Session) -> Result<Vec<Client>, ClientError> {
        Ok(self
            .store
            .list_clients_by_commercial(session.collaborator_id.value())
            .await?)
    }

    async fn update(
        &self,
        session: &Session,
        id: i32,
        changes: ClientUpdate,
    ) -> Result<Client, ClientError> {
        let existing = self.get(id).await?;

        let allowed = session.is_management()
            || (session.role == Role::Commercial && session.owns(existing.commercial_id));
        if !allowed {
            return Err(ClientError::Forbidden(format!(
                "client {id} belongs to another commercial"
            )));
        }

        if let Some(name) = &changes.full_name
            && name.trim().is_empty()
        {
            return Err(ClientError::Validation(
                "Client name cannot be empty".to_string(),
            ));
        }
        if let Some(email) = &changes.email {
            Self::validate_email(email.trim())?;
        }

        let updated = self
            .store
            .update_client(id, &changes, &Self::today())
            .await?
            .ok_or(ClientError::NotFound(id))?;
        info!("{} updated client {}", session.username, id);
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_validation() {
        assert!(SeaOrmClientService::validate_email("a@b.io").is_ok());
        assert!(SeaOrmClientService::validate_email("@b.io").is_err());
        assert!(SeaOrmClientService::validate_email("a@b").is_err());
        assert!(SeaOrmClientService::validate_email("plain").is_err());
    }
}
