use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "events")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub contract_id: i32,
    pub client_name: String,
    /// `YYYY-MM-DD HH:MM`, which sorts chronologically as text.
    pub start_at: String,
    pub end_at: String,
    pub support_id: Option<i32>,
    pub location: String,
    pub attendees: i32,
    pub notes: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::contracts::Entity",
        from = "Column::ContractId",
        to = "super::contracts::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Contract,
    #[sea_orm(
        belongs_to = "super::collaborators::Entity",
        from = "Column::SupportId",
        to = "super::collaborators::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Support,
}

impl Related<super::contracts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Contract.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
