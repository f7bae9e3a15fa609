use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::garanti_sak_hendelse;
use crate::models::common::EntityContext;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HendelseDto {
    pub id: Uuid,
    pub sak_id: Option<Uuid>,
    pub selskap_id: Option<Uuid>,
    pub prosjekt_id: Option<Uuid>,
    pub hendelse_type: String,
    pub beskrivelse: String,
    pub utfort_av: Option<Uuid>,
    pub created_at: DateTime<FixedOffset>,
}

impl From<garanti_sak_hendelse::Model> for HendelseDto {
    fn from(m: garanti_sak_hendelse::Model) -> Self {
        Self {
            id: m.id,
            sak_id: m.sak_id,
            selskap_id: m.selskap_id,
            prosjekt_id: m.prosjekt_id,
            hendelse_type: m.hendelse_type,
            beskrivelse: m.beskrivelse,
            utfort_av: m.utfort_av,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HendelseQuery {
    pub context: EntityContext,
    pub limit: Option<u64>,
}
