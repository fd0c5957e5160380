pub mod credentials;

pub mod auth_service;
pub mod auth_service_impl;
pub use auth_service::{AuthError, AuthService};
pub use auth_service_impl::SeaOrmAuthService;

pub mod collaborator_service;
pub mod collaborator_service_impl;
pub use collaborator_service::{CollaboratorError, CollaboratorService};
pub use collaborator_service_impl::SeaOrmCollaboratorService;

pub mod client_service;
pub mod client_service_impl;
pub use client_service::{ClientError, ClientService};
pub use client_service_impl::SeaOrmClientService;

pub mod contract_service;
pub mod contract_service_impl;
pub use contract_service::{ContractError, ContractService};
pub use contract_service_impl::SeaOrmContractService;

pub mod event_service;
pub mod event_service_impl;
pub use event_service::{EventError, EventService};
pub use event_service_impl::SeaOrmEventService;
