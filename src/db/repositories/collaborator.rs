use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait, sea_query::Expr,
};
use tracing::{info, warn};

use crate::domain::{CollaboratorId, Role};
use crate::entities::{collaborators, prelude::*};
use crate::models::{Collaborator, CollaboratorUpdate};

/// Stored credential fields for a username, used only for verification.
#[derive(Debug, Clone)]
pub struct StoredCredentials {
    pub collaborator: Collaborator,
    pub password_hash: String,
    pub salt: String,
}

/// Result of trying to mark a collaborator as the connected one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimOutcome {
    /// The flag is set. Lists usernames whose stale flag was cleared first.
    Claimed { reclaimed: Vec<String> },
    /// Another collaborator is connected and was seen recently.
    Held { username: String },
}

#[must_use]
pub fn timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Secs, true)
}

pub struct CollaboratorRepository {
    conn: DatabaseConnection,
}

impl CollaboratorRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_models(rows: Vec<collaborators::Model>) -> Result<Vec<Collaborator>> {
        rows.into_iter().map(Collaborator::try_from).collect()
    }

    pub async fn create(
        &self,
        username: &str,
        password_hash: String,
        salt: String,
        role: Role,
    ) -> Result<Collaborator> {
        let now = timestamp(Utc::now());
        let active = collaborators::ActiveModel {
            username: Set(username.to_string()),
            password_hash: Set(password_hash),
            salt: Set(salt),
            role: Set(role.as_str().to_string()),
            is_connected: Set(false),
            last_seen_at: Set(None),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .with_context(|| format!("Failed to insert collaborator {username}"))?;

        info!("Created collaborator {} ({})", model.username, model.role);
        Collaborator::try_from(model)
    }

    pub async fn count(&self) -> Result<u64> {
        Collaborators::find()
            .count(&self.conn)
            .await
            .context("Failed to count collaborators")
    }

    pub async fn get_by_id(&self, id: CollaboratorId) -> Result<Option<Collaborator>> {
        let row = Collaborators::find_by_id(id.value())
            .one(&self.conn)
            .await
            .context("Failed to query collaborator by ID")?;

        row.map(Collaborator::try_from).transpose()
    }

    pub async fn get_by_username(&self, username: &str) -> Result<Option<Collaborator>> {
        let row = Collaborators::find()
            .filter(collaborators::Column::Username.eq(username))
            .one(&self.conn)
            .await
            .context("Failed to query collaborator by username")?;

        row.map(Collaborator::try_from).transpose()
    }

    /// Get a collaborator together with its hash and salt.
    pub async fn get_credentials(&self, username: &str) -> Result<Option<StoredCredentials>> {
        let row = Collaborators::find()
            .filter(collaborators::Column::Username.eq(username))
            .one(&self.conn)
            .await
            .context("Failed to query collaborator for password verification")?;

        let Some(row) = row else {
            return Ok(None);
        };

        let password_hash = row.password_hash.clone();
        let salt = row.salt.clone();
        Ok(Some(StoredCredentials {
            collaborator: Collaborator::try_from(row)?,
            password_hash,
            salt,
        }))
    }

    /// First collaborator flagged as connected, lowest id first.
    pub async fn first_connected(&self) -> Result<Option<Collaborator>> {
        let row = Collaborators::find()
            .filter(collaborators::Column::IsConnected.eq(true))
            .order_by_asc(collaborators::Column::Id)
            .one(&self.conn)
            .await
            .context("Failed to query connected collaborator")?;

        row.map(Collaborator::try_from).transpose()
    }

    /// All collaborators, optionally restricted to one username, by username.
    pub async fn list(&self, username: Option<&str>) -> Result<Vec<Collaborator>> {
        let mut query = Collaborators::find().order_by_asc(collaborators::Column::Username);

        if let Some(username) = username {
            query = query.filter(collaborators::Column::Username.eq(username));
        }

        let rows = query
            .all(&self.conn)
            .await
            .context("Failed to list collaborators")?;
        Self::map_models(rows)
    }

    pub async fn list_by_role(&self, role: Role) -> Result<Vec<Collaborator>> {
        let rows = Collaborators::find()
            .filter(collaborators::Column::Role.eq(role.as_str()))
            .order_by_asc(collaborators::Column::Username)
            .all(&self.conn)
            .await
            .context("Failed to list collaborators by role")?;
        Self::map_models(rows)
    }

    pub async fn update(
        &self,
        id: CollaboratorId,
        changes: &CollaboratorUpdate,
    ) -> Result<Option<Collaborator>> {
        let Some(row) = Collaborators::find_by_id(id.value())
            .one(&self.conn)
            .await
            .context("Failed to query collaborator for update")?
        else {
            return Ok(None);
        };

        let mut active: collaborators::ActiveModel = row.into();
        if let Some(username) = &changes.username {
            active.username = Set(username.clone());
        }
        if let Some(role) = changes.role {
            active.role = Set(role.as_str().to_string());
        }
        active.updated_at = Set(timestamp(Utc::now()));

        let model = active
            .update(&self.conn)
            .await
            .context("Failed to update collaborator")?;
        Collaborator::try_from(model).map(Some)
    }

    /// Replace hash and salt together.
    pub async fn set_credentials(
        &self,
        id: CollaboratorId,
        password_hash: String,
        salt: String,
    ) -> Result<bool> {
        let Some(row) = Collaborators::find_by_id(id.value())
            .one(&self.conn)
            .await
            .context("Failed to query collaborator for password reset")?
        else {
            return Ok(false);
        };

        let mut active: collaborators::ActiveModel = row.into();
        active.password_hash = Set(password_hash);
        active.salt = Set(salt);
        active.updated_at = Set(timestamp(Utc::now()));
        active.update(&self.conn).await?;
        Ok(true)
    }

    pub async fn delete_by_username(&self, username: &str) -> Result<bool> {
        let result = Collaborators::delete_many()
            .filter(collaborators::Column::Username.eq(username))
            .exec(&self.conn)
            .await
            .context("Failed to delete collaborator")?;

        Ok(result.rows_affected > 0)
    }

    /// Mark `id` as the connected collaborator.
    ///
    /// Runs as one transaction: any other connected collaborator seen within
    /// `stale_after` keeps the session and the claim fails; older flags are
    /// cleared.
    pub async fn claim_connection(
        &self,
        id: CollaboratorId,
        now: DateTime<Utc>,
        stale_after: chrono::Duration,
    ) -> Result<ClaimOutcome> {
        let txn = self.conn.begin().await?;

        let others = Collaborators::find()
            .filter(collaborators::Column::IsConnected.eq(true))
            .filter(collaborators::Column::Id.ne(id.value()))
            .all(&txn)
            .await
            .context("Failed to query connected collaborators")?;

        let mut reclaimed = Vec::new();
        for other in others {
            if !is_stale(other.last_seen_at.as_deref(), now, stale_after) {
                txn.rollback().await?;
                return Ok(ClaimOutcome::Held {
                    username: other.username,
                });
            }

            warn!(
                "Clearing stale connection of {} (last seen {})",
                other.username,
                other.last_seen_at.as_deref().unwrap_or("never")
            );
            reclaimed.push(other.username.clone());
            let mut active: collaborators::ActiveModel = other.into();
            active.is_connected = Set(false);
            active.update(&txn).await?;
        }

        let row = Collaborators::find_by_id(id.value())
            .one(&txn)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Collaborator not found: {id}"))?;

        let mut active: collaborators::ActiveModel = row.into();
        active.is_connected = Set(true);
        active.last_seen_at = Set(Some(timestamp(now)));
        active.update(&txn).await?;

        txn.commit().await?;
        Ok(ClaimOutcome::Claimed { reclaimed })
    }

    /// Refresh `last_seen_at` while the collaborator stays connected.
    /// Returns false once the flag has been cleared elsewhere.
    pub async fn touch(&self, id: CollaboratorId, now: DateTime<Utc>) -> Result<bool> {
        let result = Collaborators::update_many()
            .col_expr(
                collaborators::Column::LastSeenAt,
                Expr::value(Some(timestamp(now))),
            )
            .filter(collaborators::Column::Id.eq(id.value()))
            .filter(collaborators::Column::IsConnected.eq(true))
            .exec(&self.conn)
            .await
            .context("Failed to refresh collaborator activity")?;
        Ok(result.rows_affected > 0)
    }

    /// Clear the flag of `id` only. Returns false when `id` no longer held it.
    pub async fn release(&self, id: CollaboratorId) -> Result<bool> {
        let result = Collaborators::update_many()
            .col_expr(collaborators::Column::IsConnected, Expr::value(false))
            .filter(collaborators::Column::Id.eq(id.value()))
            .filter(collaborators::Column::IsConnected.eq(true))
            .exec(&self.conn)
            .await
            .context("Failed to release collaborator session")?;

        Ok(result.rows_affected > 0)
    }

    /// Clear every connected flag. Returns how many rows changed.
    pub async fn disconnect_all(&self) -> Result<u64> {
        let result = Collaborators::update_many()
            .col_expr(collaborators::Column::IsConnected, Expr::value(false))
            .filter(collaborators::Column::IsConnected.eq(true))
            .exec(&self.conn)
            .await
            .context("Failed to clear connected collaborators")?;

        Ok(result.rows_affected)
    }
}

/// A flag with no parseable `last_seen_at` counts as stale.
fn is_stale(last_seen_at: Option<&str>, now: DateTime<Utc>, stale_after: chrono::Duration) -> bool {
    let Some(seen) = last_seen_at.and_then(|s| DateTime::parse_from_rfc3339(s).ok()) else {
        return true;
    };
    now.signed_duration_since(seen.with_timezone(&Utc)) >= stale_after
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recent_activity_is_not_stale() {
        let now = Utc::now();
        let seen = timestamp(now - chrono::Duration::minutes(5));
        assert!(!is_stale(Some(&seen), now, chrono::Duration::minutes(30)));
    }

    #[test]
    fn old_or_missing_activity_is_stale() {
        let now = Utc::now();
        let seen = timestamp(now - chrono::Duration::hours(2));
        assert!(is_stale(Some(&seen), now, chrono::Duration::minutes(30)));
        assert!(is_stale(None, now, chrono::Duration::minutes(30)));
        assert!(is_stale(Some("garbage"), now, chrono::Duration::minutes(30)));
    }
}
