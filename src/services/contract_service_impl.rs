//! `SeaORM` implementation of the `ContractService` trait.

use crate::db::{Store, timestamp};
use crate::domain::{Role, Session};
use crate::models::{Amount, Contract, ContractFilter, ContractUpdate, NewContract};
use crate::services::contract_service::{ContractError, ContractService};
use async_trait::async_trait;
use tracing::info;

pub struct SeaOrmContractService {
    store: Store,
}

impl SeaOrmContractService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    fn validate_amounts(total: Amount, due: Amount) -> Result<(), ContractError> {
        if due > total {
            return Err(ContractError::Validation(format!(
                "Amount due ({due}) cannot exceed the total ({total})"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl ContractService for SeaOrmContractService {
    async fn create(
        &self,
        session: &Session,
        input: NewContract,
    ) -> Result<Contract, ContractError> {
        if !session.is_management() {
            return Err(ContractError::Forbidden(
                "only management can create contracts".to_string(),
            ));
        }
        Self::validate_amounts(input.total_amount, input.amount_due)?;

        let client = self
            .store
            .get_client(input.client_id)
            .await?
            .ok_or(ContractError::ClientNotFound(input.client_id))?;

        let contract = self
            .store
            .create_contract(&input, client.commercial_id, &timestamp(chrono::Utc::now()))
            .await?;
        info!(
            "{} created contract {} for client {}",
            session.username, contract.id, client.id
        );
        Ok(contract)
    }

    async fn get(&self, id: i32) -> Result<Contract, ContractError> {
        self.store
            .get_contract(id)
            .await?
            .ok_or(ContractError::NotFound(id))
    }

    async fn list(&self, filter: ContractFilter) -> Result<Vec<Contract>, ContractError> {
        Ok(self.store.list_contracts(filter).await?)
    }

    async fn update(
        &self,
        session: &Session,
        id: i32,
        changes: ContractUpdate,
    ) -> Result<Contract, ContractError> {
        let existing = self.get(id).await?;

        let allowed = session.is_management()
            || (session.role == Role::Commercial && session.owns(existing.commercial_id));
        if !allowed {
            return Err(ContractError::Forbidden(format!(
                "contract {id} is not one of your contracts"
            )));
        }

        Self::validate_amounts(
            changes.total_amount.unwrap_or(existing.total_amount),
            changes.amount_due.unwrap_or(existing.amount_due),
        )?;

        let updated = self
            .store
            .update_contract(id, &changes)
            .await?
            .ok_or(ContractError::NotFound(id))?;
        info!("{} updated contract {}", session.username, id);
        Ok(updated)
    }
}
