//! SeaORM Entity for garanti_sak_hendelse (append-only audit log)

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "garanti_sak_hendelse")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub sak_id: Option<Uuid>,
    pub selskap_id: Option<Uuid>,
    pub prosjekt_id: Option<Uuid>,
    /// Machine-readable kind, e.g. "SELSKAP_OPPDATERT"
    pub hendelse_type: String,
    /// Human-readable Norwegian description of the change
    #[sea_orm(column_type = "Text")]
    pub beskrivelse: String,
    pub utfort_av: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
