mod clients;
mod collaborators;
mod contracts;
mod events;

pub use clients::run_client_command;
pub use collaborators::run_collaborator_command;
pub use contracts::run_contract_command;
pub use events::run_event_command;
