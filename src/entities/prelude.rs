pub use super::clients::Entity as Clients;
pub use super::collaborators::Entity as Collaborators;
pub use super::contracts::Entity as Contracts;
pub use super::events::Entity as Events;
