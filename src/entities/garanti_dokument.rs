//! SeaORM Entity for garanti_dokument
//!
//! Exactly one of `sak_id`, `selskap_id`, `prosjekt_id` is set.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "garanti_dokument")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub sak_id: Option<Uuid>,
    pub selskap_id: Option<Uuid>,
    pub prosjekt_id: Option<Uuid>,
    /// Original filename as uploaded
    pub filnavn: String,
    pub content_type: Option<String>,
    pub storrelse: i64,
    pub dokument_type: Option<String>,
    pub beskrivelse: Option<String>,
    pub blob_url: String,
    pub container_name: String,
    pub blob_name: String,
    pub lastet_opp_av: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
