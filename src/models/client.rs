use crate::entities::clients;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Client {
    pub id: i32,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub company_name: String,
    pub created_at: String,
    pub last_contact_at: String,
    pub commercial_id: Option<i32>,
}

impl From<clients::Model> for Client {
    fn from(model: clients::Model) -> Self {
        Self {
            id: model.id,
            full_name: model.full_name,
            email: model.email,
            phone: model.phone,
            company_name: model.company_name,
            created_at: model.created_at,
            last_contact_at: model.last_contact_at,
            commercial_id: model.commercial_id,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewClient {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub company_name: String,
}

/// Field changes; `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct ClientUpdate {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company_name: Option<String>,
}
