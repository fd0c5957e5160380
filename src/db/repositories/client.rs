use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tracing::info;

use crate::entities::{clients, prelude::*};
use crate::models::{Client, ClientUpdate, NewClient};

/// Repository for client records
pub struct ClientRepository {
    conn: DatabaseConnection,
}

impl ClientRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn create(&self, client: &NewClient, commercial_id: i32, today: &str) -> Result<Client> {
        let active = clients::ActiveModel {
            full_name: Set(client.full_name.clone()),
            email: Set(client.email.clone()),
            phone: Set(client.phone.clone()),
            company_name: Set(client.company_name.clone()),
            created_at: Set(today.to_string()),
            last_contact_at: Set(today.to_string()),
            commercial_id: Set(Some(commercial_id)),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert client")?;
        info!("Added client {} ({})", model.id, model.full_name);
        Ok(Client::from(model))
    }

    pub async fn get(&self, id: i32) -> Result<Option<Client>> {
        let row = Clients::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query client")?;
        Ok(row.map(Client::from))
    }

    pub async fn list_all(&self) -> Result<Vec<Client>> {
        let rows = Clients::find()
            .order_by_asc(clients::Column::FullName)
            .all(&self.conn)
            .await
            .context("Failed to list clients")?;
        Ok(rows.into_iter().map(Client::from).collect())
    }

    pub async fn list_by_commercial(&self, commercial_id: i32) -> Result<Vec<Client>> {
        let rows = Clients::find()
            .filter(clients::Column::CommercialId.eq(commercial_id))
            .order_by_asc(clients::Column::FullName)
            .all(&self.conn)
            .await
            .context("Failed to list clients for commercial")?;
        Ok(rows.into_iter().map(Client::from).collect())
    }

    /// Apply changes and stamp `last_contact_at`.
    pub async fn update(&self, id: i32, changes: &ClientUpdate, today: &str) -> Result<Option<Client>> {
        let Some(row) = Clients::find_by_id(id).one(&self.conn).await? else {
            return Ok(None);
        };

        let mut active: clients::ActiveModel = row.into();
        if let Some(v) = &changes.full_name {
            active.full_name = Set(v.clone());
        }
        if let Some(v) = &changes.email {
            active.email = Set(v.clone());
        }
        if let Some(v) = &changes.phone {
            active.phone = Set(v.clone());
        }
        if let Some(v) = &changes.company_name {
            active.company_name = Set(v.clone());
        }
        active.last_contact_at = Set(today.to_string());

        let model = active
            .update(&self.conn)
            .await
            .context("Failed to update client")?;
        Ok(Some(Client::from(model)))
    }
}
