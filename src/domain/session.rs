//! Explicit login context handed from the session gate to every operation
//! that needs authorization.

use super::{CollaboratorId, Role};
use serde::Serialize;

/// The authenticated collaborator for the lifetime of one console session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub collaborator_id: CollaboratorId,
    pub username: String,
    pub role: Role,
}

impl Session {
    #[must_use]
    pub const fn new(collaborator_id: CollaboratorId, username: String, role: Role) -> Self {
        Self {
            collaborator_id,
            username,
            role,
        }
    }

    #[must_use]
    pub fn has_role(&self, roles: &[Role]) -> bool {
        roles.contains(&self.role)
    }

    #[must_use]
    pub fn is_management(&self) -> bool {
        self.role == Role::Management
    }

    /// Whether `owner` is this session's collaborator.
    #[must_use]
    pub fn owns(&self, owner: Option<i32>) -> bool {
        owner == Some(self.collaborator_id.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(role: Role) -> Session {
        Session::new(CollaboratorId::new(4), "bob".to_string(), role)
    }

    #[test]
    fn has_role_matches_any_listed() {
        let s = session(Role::Support);
        assert!(s.has_role(&[Role::Management, Role::Support]));
        assert!(!s.has_role(&[Role::Commercial]));
    }

    #[test]
    fn owns_compares_ids() {
        let s = session(Role::Commercial);
        assert!(s.owns(Some(4)));
        assert!(!s.owns(Some(5)));
        assert!(!s.owns(None));
    }
}
