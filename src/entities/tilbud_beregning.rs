//! SeaORM Entity for tilbud_beregning (premium calculation, 1:1 with tilbud)

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "tilbud_beregning")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub tilbud_id: Uuid,
    #[sea_orm(column_type = "Decimal(Some((18, 2)))")]
    pub kontraktssum: Decimal,
    pub utforelsestid_maaneder: i32,
    pub garantitid_aar: i32,
    /// Annual rate in percent for the execution period
    #[sea_orm(column_type = "Decimal(Some((9, 4)))")]
    pub rente_utforelse: Decimal,
    /// Annual rate in percent for the guarantee period
    #[sea_orm(column_type = "Decimal(Some((9, 4)))")]
    pub rente_garanti: Decimal,
    #[sea_orm(column_type = "Decimal(Some((18, 2)))")]
    pub etableringsgebyr: Decimal,
    #[sea_orm(column_type = "Decimal(Some((18, 2)))")]
    pub premie_utforelse: Decimal,
    #[sea_orm(column_type = "Decimal(Some((18, 2)))")]
    pub premie_garanti: Decimal,
    #[sea_orm(column_type = "Decimal(Some((18, 2)))")]
    pub total_premie: Decimal,
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
