use std::sync::Arc;

use crate::config::Config;
use crate::db::Store;
use crate::services::{
    AuthService, ClientService, CollaboratorService, ContractService, EventService,
    SeaOrmAuthService, SeaOrmClientService, SeaOrmCollaboratorService, SeaOrmContractService,
    SeaOrmEventService,
};

/// Services shared by the process commands and the interactive shell.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,

    pub store: Store,

    pub auth: Arc<dyn AuthService>,

    pub collaborators: Arc<dyn CollaboratorService>,

    pub clients: Arc<dyn ClientService>,

    pub contracts: Arc<dyn ContractService>,

    pub events: Arc<dyn EventService>,
}

impl AppState {
    /// Connects to the configured database and wires the services.
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;
        Ok(Self::with_store(config, store))
    }

    #[must_use]
    pub fn with_store(config: Config, store: Store) -> Self {
        Self {
            auth: Arc::new(SeaOrmAuthService::new(store.clone(), &config.session)),
            collaborators: Arc::new(SeaOrmCollaboratorService::new(
                store.clone(),
                config.security.clone(),
            )),
            clients: Arc::new(SeaOrmClientService::new(store.clone())),
            contracts: Arc::new(SeaOrmContractService::new(store.clone())),
            events: Arc::new(SeaOrmEventService::new(store.clone())),
            config: Arc::new(config),
            store,
        }
    }
}
