//! SeaORM Entity for garanti_sak (incoming guarantee requests)

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "garanti_sak")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Human-facing case number, e.g. "GS-2026-4F1A9C"
    #[sea_orm(unique)]
    pub saksnummer: String,
    pub selskap_id: Uuid,
    pub prosjekt_id: Option<Uuid>,
    pub beskrivelse: Option<String>,
    /// Where the request came from (e-post, portal, telefon, ...)
    pub kilde: Option<String>,
    pub opprettet_av: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::selskap::Entity",
        from = "Column::SelskapId",
        to = "super::selskap::Column::Id",
        on_delete = "Cascade"
    )]
    Selskap,
}

impl Related<super::selskap::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Selskap.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
