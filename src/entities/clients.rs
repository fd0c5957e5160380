use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "clients")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub company_name: String,
    pub created_at: String,
    pub last_contact_at: String,
    pub commercial_id: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::collaborators::Entity",
        from = "Column::CommercialId",
        to = "super::collaborators::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Commercial,
    #[sea_orm(has_many = "super::contracts::Entity")]
    Contracts,
}

impl Related<super::collaborators::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Commercial.def()
    }
}

impl Related<super::contracts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Contracts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
