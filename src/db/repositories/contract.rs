use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tracing::info;

use crate::entities::{contracts, prelude::*};
use crate::models::{Contract, ContractFilter, ContractUpdate, NewContract};

/// Repository for contract records
pub struct ContractRepository {
    conn: DatabaseConnection,
}

impl ContractRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn create(
        &self,
        contract: &NewContract,
        commercial_id: Option<i32>,
        now: &str,
    ) -> Result<Contract> {
        let active = contracts::ActiveModel {
            client_id: Set(contract.client_id),
            commercial_id: Set(commercial_id),
            total_amount: Set(contract.total_amount.cents()),
            amount_due: Set(contract.amount_due.cents()),
            created_at: Set(now.to_string()),
            signed: Set(contract.signed),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert contract")?;
        info!(
            "Added contract {} for client {}",
            model.id, model.client_id
        );
        Ok(Contract::from(model))
    }

    pub async fn get(&self, id: i32) -> Result<Option<Contract>> {
        let row = Contracts::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query contract")?;
        Ok(row.map(Contract::from))
    }

    pub async fn list(&self, filter: ContractFilter) -> Result<Vec<Contract>> {
        let mut query = Contracts::find().order_by_asc(contracts::Column::Id);

        query = match filter {
            ContractFilter::All => query,
            ContractFilter::Unsigned => query.filter(contracts::Column::Signed.eq(false)),
            ContractFilter::Unpaid => query.filter(contracts::Column::AmountDue.gt(0)),
        };

        let rows = query
            .all(&self.conn)
            .await
            .context("Failed to list contracts")?;
        Ok(rows.into_iter().map(Contract::from).collect())
    }

    pub async fn update(&self, id: i32, changes: &ContractUpdate) -> Result<Option<Contract>> {
        let Some(row) = Contracts::find_by_id(id).one(&self.conn).await? else {
            return Ok(None);
        };

        let mut active: contracts::ActiveModel = row.into();
        if let Some(v) = changes.total_amount {
            active.total_amount = Set(v.cents());
        }
        if let Some(v) = changes.amount_due {
            active.amount_due = Set(v.cents());
        }
        if let Some(v) = changes.signed {
            active.signed = Set(v);
        }

        let model = active
            .update(&self.conn)
            .await
            .context("Failed to update contract")?;
        Ok(Some(Contract::from(model)))
    }
}
