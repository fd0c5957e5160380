use anyhow::Result;
use chrono::{DateTime, NaiveDateTime, Utc};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::domain::{CollaboratorId, Role};
use crate::models::{
    Client, ClientUpdate, Collaborator, CollaboratorUpdate, Contract, ContractFilter,
    ContractUpdate, Event, EventFilter, EventUpdate, NewClient, NewContract, NewEvent,
};

pub mod migrator;
pub mod repositories;

pub use repositories::collaborator::{ClaimOutcome, StoredCredentials, timestamp};

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:").trim_start_matches("//");
            let path_str = path_str.split('?').next().unwrap_or(path_str);
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn collaborator_repo(&self) -> repositories::collaborator::CollaboratorRepository {
        repositories::collaborator::CollaboratorRepository::new(self.conn.clone())
    }

    fn client_repo(&self) -> repositories::client::ClientRepository {
        repositories::client::ClientRepository::new(self.conn.clone())
    }

    fn contract_repo(&self) -> repositories::contract::ContractRepository {
        repositories::contract::ContractRepository::new(self.conn.clone())
    }

    fn event_repo(&self) -> repositories::event::EventRepository {
        repositories::event::EventRepository::new(self.conn.clone())
    }

    // Collaborators

    pub async fn create_collaborator(
        &self,
        username: &str,
        password_hash: String,
        salt: String,
        role: Role,
    ) -> Result<Collaborator> {
        self.collaborator_repo()
            .create(username, password_hash, salt, role)
            .await
    }

    pub async fn count_collaborators(&self) -> Result<u64> {
        self.collaborator_repo().count().await
    }

    pub async fn get_collaborator(&self, id: CollaboratorId) -> Result<Option<Collaborator>> {
        self.collaborator_repo().get_by_id(id).await
    }

    pub async fn get_collaborator_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Collaborator>> {
        self.collaborator_repo().get_by_username(username).await
    }

    pub async fn get_collaborator_credentials(
        &self,
        username: &str,
    ) -> Result<Option<StoredCredentials>> {
        self.collaborator_repo().get_credentials(username).await
    }

    pub async fn first_connected_collaborator(&self) -> Result<Option<Collaborator>> {
        self.collaborator_repo().first_connected().await
    }

    pub async fn list_collaborators(&self, username: Option<&str>) -> Result<Vec<Collaborator>> {
        self.collaborator_repo().list(username).await
    }

    pub async fn list_collaborators_by_role(&self, role: Role) -> Result<Vec<Collaborator>> {
        self.collaborator_repo().list_by_role(role).await
    }

    pub async fn update_collaborator(
        &self,
        id: CollaboratorId,
        changes: &CollaboratorUpdate,
    ) -> Result<Option<Collaborator>> {
        self.collaborator_repo().update(id, changes).await
    }

    pub async fn set_collaborator_credentials(
        &self,
        id: CollaboratorId,
        password_hash: String,
        salt: String,
    ) -> Result<bool> {
        self.collaborator_repo()
            .set_credentials(id, password_hash, salt)
            .await
    }

    pub async fn delete_collaborator(&self, username: &str) -> Result<bool> {
        self.collaborator_repo().delete_by_username(username).await
    }

    pub async fn claim_connection(
        &self,
        id: CollaboratorId,
        now: DateTime<Utc>,
        stale_after: chrono::Duration,
    ) -> Result<ClaimOutcome> {
        self.collaborator_repo()
            .claim_connection(id, now, stale_after)
            .await
    }

    pub async fn touch_collaborator(&self, id: CollaboratorId, now: DateTime<Utc>) -> Result<bool> {
        self.collaborator_repo().touch(id, now).await
    }

    pub async fn release_collaborator(&self, id: CollaboratorId) -> Result<bool> {
        self.collaborator_repo().release(id).await
    }

    pub async fn disconnect_all(&self) -> Result<u64> {
        self.collaborator_repo().disconnect_all().await
    }

    // Clients

    pub async fn create_client(
        &self,
        client: &NewClient,
        commercial_id: i32,
        today: &str,
    ) -> Result<Client> {
        self.client_repo().create(client, commercial_id, today).await
    }

    pub async fn get_client(&self, id: i32) -> Result<Option<Client>> {
        self.client_repo().get(id).await
    }

    pub async fn list_clients(&self) -> Result<Vec<Client>> {
        self.client_repo().list_all().await
    }

    pub async fn list_clients_by_commercial(&self, commercial_id: i32) -> Result<Vec<Client>> {
        self.client_repo().list_by_commercial(commercial_id).await
    }

    pub async fn update_client(
        &self,
        id: i32,
        changes: &ClientUpdate,
        today: &str,
    ) -> Result<Option<Client>> {
        self.client_repo().update(id, changes, today).await
    }

    // Contracts

    pub async fn create_contract(
        &self,
        contract: &NewContract,
        commercial_id: Option<i32>,
        now: &str,
    ) -> Result<Contract> {
        self.contract_repo()
            .create(contract, commercial_id, now)
            .await
    }

    pub async fn get_contract(&self, id: i32) -> Result<Option<Contract>> {
        self.contract_repo().get(id).await
    }

    pub async fn list_contracts(&self, filter: ContractFilter) -> Result<Vec<Contract>> {
        self.contract_repo().list(filter).await
    }

    pub async fn update_contract(
        &self,
        id: i32,
        changes: &ContractUpdate,
    ) -> Result<Option<Contract>> {
        self.contract_repo().update(id, changes).await
    }

    // Events

    pub async fn create_event(&self, event: &NewEvent, client_name: &str) -> Result<Event> {
        self.event_repo().create(event, client_name).await
    }

    pub async fn get_event(&self, id: i32) -> Result<Option<Event>> {
        self.event_repo().get(id).await
    }

    pub async fn list_events(&self, filter: EventFilter, now: NaiveDateTime) -> Result<Vec<Event>> {
        self.event_repo().list(filter, now).await
    }

    pub async fn list_events_by_support(&self, support_id: i32) -> Result<Vec<Event>> {
        self.event_repo().list_by_support(support_id).await
    }

    pub async fn update_event(&self, id: i32, changes: &EventUpdate) -> Result<Option<Event>> {
        self.event_repo().update(id, changes).await
    }

    pub async fn delete_event(&self, id: i32) -> Result<bool> {
        self.event_repo().delete(id).await
    }
}
