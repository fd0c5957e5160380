pub mod prelude;

pub mod clients;
pub mod collaborators;
pub mod contracts;
pub mod events;
