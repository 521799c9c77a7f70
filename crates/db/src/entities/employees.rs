//! `SeaORM` Entity for employees table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "employees")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub supervisor_id: Option<Uuid>,
    pub full_name: String,
    pub email: Option<String>,
    pub active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::SupervisorId",
        to = "Column::Id"
    )]
    Supervisor,
    #[sea_orm(has_many = "super::leave_quotas::Entity")]
    LeaveQuotas,
}

impl Related<super::leave_quotas::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LeaveQuotas.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
