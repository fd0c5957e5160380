//! `SeaORM` implementation of the `CollaboratorService` trait.

use crate::config::SecurityConfig;
use crate::db::Store;
use crate::domain::{CollaboratorId, Role, Session};
use crate::models::{Collaborator, CollaboratorUpdate, NewCollaborator};
use crate::services::collaborator_service::{CollaboratorError, CollaboratorService};
use crate::services::credentials;
use async_trait::async_trait;
use tracing::info;

pub struct SeaOrmCollaboratorService {
    store: Store,
    security: SecurityConfig,
}

impl SeaOrmCollaboratorService {
    #[must_use]
    pub const fn new(store: Store, security: SecurityConfig) -> Self {
        Self { store, security }
    }

    fn require_management(session: &Session) -> Result<(), CollaboratorError> {
        if session.is_management() {
            Ok(())
        } else {
            Err(CollaboratorError::Forbidden(
                "only management can administer collaborators".to_string(),
            ))
        }
    }

    fn validate_username(username: &str) -> Result<(), CollaboratorError> {
        if username.is_empty() {
            return Err(CollaboratorError::Validation(
                "Username cannot be empty".to_string(),
            ));
        }
        if username.chars().any(char::is_whitespace) {
            return Err(CollaboratorError::Validation(
                "Username cannot contain whitespace".to_string(),
            ));
        }
        Ok(())
    }

    fn validate_password(&self, password: &str) -> Result<(), CollaboratorError> {
        if password.chars().count() < self.security.min_password_length {
            return Err(CollaboratorError::Validation(format!(
                "Password must be at least {} characters",
                self.security.min_password_length
            )));
        }
        Ok(())
    }

    async fn insert(&self, input: NewCollaborator) -> Result<Collaborator, CollaboratorError> {
        let username = input.username.trim();
        Self::validate_username(username)?;
        self.validate_password(&input.password)?;

        if self
            .store
            .get_collaborator_by_username(username)
            .await?
            .is_some()
        {
            return Err(CollaboratorError::Conflict(format!(
                "username '{username}' is taken"
            )));
        }

        let derived =
            credentials::derive_with_salt_bytes(&input.password, self.security.salt_bytes);
        let collaborator = self
            .store
            .create_collaborator(username, derived.hash, derived.salt, input.role)
            .await?;
        Ok(collaborator)
    }

    async fn find(&self, username: &str) -> Result<Collaborator, CollaboratorError> {
        self.store
            .get_collaborator_by_username(username)
            .await?
            .ok_or_else(|| CollaboratorError::NotFound(username.to_string()))
    }
}

#[async_trait]
impl CollaboratorService for SeaOrmCollaboratorService {
    async fn bootstrap(&self, input: NewCollaborator) -> Result<Collaborator, CollaboratorError> {
        if self.store.count_collaborators().await? > 0 {
            return Err(CollaboratorError::Conflict(
                "collaborators already exist; log in as management instead".to_string(),
            ));
        }
        self.insert(input).await
    }

    async fn create(
        &self,
        session: &Session,
        input: NewCollaborator,
    ) -> Result<Collaborator, CollaboratorError> {
        Self::require_management(session)?;
        let created = self.insert(input).await?;
        info!("{} created collaborator {}", session.username, created.username);
        Ok(created)
    }

    async fn list(
        &self,
        session: &Session,
        username: Option<&str>,
    ) -> Result<Vec<Collaborator>, CollaboratorError> {
        Self::require_management(session)?;
        Ok(self.store.list_collaborators(username).await?)
    }

    async fn list_commercials(&self) -> Result<Vec<Collaborator>, CollaboratorError> {
        Ok(self.store.list_collaborators_by_role(Role::Commercial).await?)
    }

    async fn display_name(&self, id: Option<i32>) -> Result<String, CollaboratorError> {
        let Some(id) = id else {
            return Ok("Unknown".to_string());
        };
        let collaborator = self.store.get_collaborator(CollaboratorId::new(id)).await?;
        Ok(collaborator.map_or_else(|| "Unknown".to_string(), |c| c.username))
    }

    async fn update(
        &self,
        session: &Session,
        username: &str,
        mut changes: CollaboratorUpdate,
    ) -> Result<Collaborator, CollaboratorError> {
        Self::require_management(session)?;
        let existing = self.find(username).await?;

        if let Some(new_name) = changes.username.take() {
            let new_name = new_name.trim().to_string();
            Self::validate_username(&new_name)?;
            if new_name != existing.username {
                if self
                    .store
                    .get_collaborator_by_username(&new_name)
                    .await?
                    .is_some()
                {
                    return Err(CollaboratorError::Conflict(format!(
                        "username '{new_name}' is taken"
                    )));
                }
                changes.username = Some(new_name);
            }
        }

        if changes.is_empty() {
            return Ok(existing);
        }

        let updated = self
            .store
            .update_collaborator(existing.id, &changes)
            .await?
            .ok_or_else(|| CollaboratorError::NotFound(username.to_string()))?;
        info!("{} updated collaborator {}", session.username, updated.username);
        Ok(updated)
    }

    async fn reset_password(
        &self,
        session: &Session,
        username: &str,
        new_password: &str,
    ) -> Result<(), CollaboratorError> {
        Self::require_management(session)?;
        self.validate_password(new_password)?;
        let existing = self.find(username).await?;

        let derived =
            credentials::derive_with_salt_bytes(new_password, self.security.salt_bytes);
        self.store
            .set_collaborator_credentials(existing.id, derived.hash, derived.salt)
            .await?;
        info!("{} reset the password of {}", session.username, username);
        Ok(())
    }

    async fn delete(&self, session: &Session, username: &str) -> Result<(), CollaboratorError> {
        Self::require_management(session)?;
        let existing = self.find(username).await?;
        if existing.id == session.collaborator_id {
            return Err(CollaboratorError::Validation(
                "You cannot delete your own account".to_string(),
            ));
        }

        if !self.store.delete_collaborator(username).await? {
            return Err(CollaboratorError::NotFound(username.to_string()));
        }
        info!("{} deleted collaborator {}", session.username, username);
        Ok(())
    }

    async fn get(&self, id: CollaboratorId) -> Result<Collaborator, CollaboratorError> {
        self.store
            .get_collaborator(id)
            .await?
            .ok_or_else(|| CollaboratorError::NotFound(id.to_string()))
    }
}
