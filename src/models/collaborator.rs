use crate::domain::{CollaboratorId, Role};
use crate::entities::collaborators;
use anyhow::Context;
use serde::Serialize;

/// Collaborator data returned from the repository, without credential fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Collaborator {
    pub id: CollaboratorId,
    pub username: String,
    pub role: Role,
    pub is_connected: bool,
    pub last_seen_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl TryFrom<collaborators::Model> for Collaborator {
    type Error = anyhow::Error;

    fn try_from(model: collaborators::Model) -> Result<Self, Self::Error> {
        let role = model
            .role
            .parse::<Role>()
            .with_context(|| format!("Collaborator {} has an invalid role", model.id))?;

        Ok(Self {
            id: CollaboratorId::new(model.id),
            username: model.username,
            role,
            is_connected: model.is_connected,
            last_seen_at: model.last_seen_at,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

#[derive(Debug, Clone)]
pub struct NewCollaborator {
    pub username: String,
    pub password: String,
    pub role: Role,
}

/// Profile changes; `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct CollaboratorUpdate {
    pub username: Option<String>,
    pub role: Option<Role>,
}

impl CollaboratorUpdate {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.username.is_none() && self.role.is_none()
    }
}
