//! SeaORM Entity for bruker (application users)

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum Rolle {
    #[sea_orm(string_value = "Admin")]
    Admin,
    #[sea_orm(string_value = "Radgiver")]
    Radgiver,
    #[sea_orm(string_value = "Underwriter")]
    Underwriter,
    #[sea_orm(string_value = "Leser")]
    Leser,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "bruker")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub epost: String,
    pub navn: String,
    pub rolle: Rolle,
    pub aktiv: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
