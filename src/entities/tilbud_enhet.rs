//! SeaORM Entity for tilbud_enhet (units such as apartments or lots)

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "tilbud_enhet")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tilbud_id: Uuid,
    /// e.g. "Leilighet 3", "Tomt 12"
    pub betegnelse: String,
    pub enhetstype: String,
    /// Percentage of the whole project this unit represents
    #[sea_orm(column_type = "Decimal(Some((7, 4)))")]
    pub andel_av_helhet: Decimal,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::tilbud::Entity",
        from = "Column::TilbudId",
        to = "super::tilbud::Column::Id",
        on_delete = "Cascade"
    )]
    Tilbud,
}

impl Related<super::tilbud::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tilbud.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
