//! `SeaORM` implementation of the `AuthService` trait.

use crate::config::SessionConfig;
use crate::db::{ClaimOutcome, Store};
use crate::domain::{CollaboratorId, Role, Session};
use crate::services::auth_service::{AuthError, AuthService};
use crate::services::credentials;
use async_trait::async_trait;
use chrono::Utc;
use tracing::{info, warn};

pub struct SeaOrmAuthService {
    store: Store,
    stale_after: chrono::Duration,
}

impl SeaOrmAuthService {
    #[must_use]
    pub fn new(store: Store, config: &SessionConfig) -> Self {
        Self {
            store,
            stale_after: chrono::Duration::minutes(i64::from(config.stale_after_minutes)),
        }
    }
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn authenticate(&self, username: &str, password: &str) -> Result<Session, AuthError> {
        let Some(stored) = self.store.get_collaborator_credentials(username).await? else {
            warn!("Login rejected");
            return Err(AuthError::InvalidCredentials);
        };

        if !credentials::verify(password, &stored.salt, &stored.password_hash) {
            warn!("Login rejected");
            return Err(AuthError::InvalidCredentials);
        }

        let collaborator = stored.collaborator;
        match self
            .store
            .claim_connection(collaborator.id, Utc::now(), self.stale_after)
            .await?
        {
            ClaimOutcome::Claimed { reclaimed } => {
                if !reclaimed.is_empty() {
                    info!("Reclaimed stale sessions: {}", reclaimed.join(", "));
                }
            }
            ClaimOutcome::Held { username: holder } => {
                warn!(
                    "Login for {} refused, session held by {}",
                    collaborator.username, holder
                );
                return Err(AuthError::SessionActive(holder));
            }
        }

        info!(
            "Collaborator {} connected as {}",
            collaborator.username, collaborator.role
        );
        Ok(Session::new(
            collaborator.id,
            collaborator.username,
            collaborator.role,
        ))
    }

    async fn current_connected(&self) -> Result<Option<(CollaboratorId, Role)>, AuthError> {
        let connected = self.store.first_connected_collaborator().await?;
        Ok(connected.map(|c| (c.id, c.role)))
    }

    async fn touch(&self, session: &Session) -> Result<(), AuthError> {
        if !self
            .store
            .touch_collaborator(session.collaborator_id, Utc::now())
            .await?
        {
            warn!("Session of {} is no longer connected", session.username);
            return Err(AuthError::Unauthorized);
        }
        Ok(())
    }

    async fn release(&self, session: &Session) -> Result<bool, AuthError> {
        let released = self
            .store
            .release_collaborator(session.collaborator_id)
            .await?;
        if released {
            info!("{} logged out", session.username);
        } else {
            info!(
                "Session of {} was already closed or taken over",
                session.username
            );
        }
        Ok(released)
    }

    async fn disconnect(&self) -> Result<(), AuthError> {
        let cleared = self.store.disconnect_all().await?;
        if cleared > 0 {
            info!("Connected flag cleared ({} row(s))", cleared);
        }
        Ok(())
    }
}
