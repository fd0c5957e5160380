pub mod client;
pub mod collaborator;
pub mod contract;
pub mod event;

pub use client::{Client, ClientUpdate, NewClient};
pub use collaborator::{Collaborator, CollaboratorUpdate, NewCollaborator};
pub use contract::{Amount, Contract, ContractFilter, ContractUpdate, NewContract};
pub use event::{Event, EventFilter, EventUpdate, NewEvent};

/// Format of calendar dates stored as text.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
