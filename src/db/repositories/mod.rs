pub mod client;
pub mod collaborator;
pub mod contract;
pub mod event;
