//! Domain primitives shared by the services and the console.
//!
//! Identifiers use the newtype pattern so a collaborator id cannot be passed
//! where a client or event id is expected.

pub mod session;

pub use session::Session;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Unique identifier for a collaborator (staff member).
///
/// # Examples
///
/// ```rust
/// use epicrm::domain::CollaboratorId;
///
/// let id = CollaboratorId::new(7);
/// assert_eq!(id.value(), 7);
/// assert_eq!(id.to_string(), "7");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollaboratorId(i32);

impl CollaboratorId {
    #[must_use]
    pub const fn new(id: i32) -> Self {
        debug_assert!(id >= 0, "CollaboratorId should be non-negative");
        Self(id)
    }

    #[must_use]
    pub const fn value(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for CollaboratorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<CollaboratorId> for i32 {
    fn from(id: CollaboratorId) -> Self {
        id.0
    }
}

impl From<i32> for CollaboratorId {
    fn from(id: i32) -> Self {
        Self::new(id)
    }
}

/// Category of a collaborator. Drives what the console lets them do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Commercial,
    Support,
    Management,
}

impl Role {
    pub const ALL: [Self; 3] = [Self::Commercial, Self::Support, Self::Management];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Commercial => "commercial",
            Self::Support => "support",
            Self::Management => "management",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown role '{0}' (expected commercial, support or management)")]
pub struct ParseRoleError(pub String);

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "commercial" => Ok(Self::Commercial),
            "support" => Ok(Self::Support),
            "management" => Ok(Self::Management),
            other => Err(ParseRoleError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_str() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>(), Ok(role));
        }
    }

    #[test]
    fn role_parse_is_case_insensitive() {
        assert_eq!(" Management ".parse::<Role>(), Ok(Role::Management));
    }

    #[test]
    fn role_parse_rejects_unknown() {
        let err = "admin".parse::<Role>().unwrap_err();
        assert_eq!(err, ParseRoleError("admin".to_string()));
    }

    #[test]
    fn collaborator_id_converts() {
        let id = CollaboratorId::from(3);
        assert_eq!(i32::from(id), 3);
    }
}
