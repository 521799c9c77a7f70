//! `SeaORM` Entity for leave_types table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "leave_types")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub code: String,
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub min_duration_days: Option<i32>,
    pub max_duration_days: Option<i32>,
    pub consumes_quota: bool,
    pub is_paid: bool,
    pub requires_document: bool,
    pub active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::time_off_requests::Entity")]
    TimeOffRequests,
}

impl Related<super::time_off_requests::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TimeOffRequests.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
