use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::tilbud::{self, TilbudStatus};
use crate::models::beregning::BeregningDto;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TilbudDto {
    pub id: Uuid,
    pub prosjekt_id: Uuid,
    pub tilbudsnummer: String,
    pub produkttype: String,
    pub status: TilbudStatus,
    pub status_tekst: String,
    pub versjonsnummer: i32,
    pub kommentar: Option<String>,
    pub opprettet_av: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub beregning: Option<BeregningDto>,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl TilbudDto {
    pub fn with_beregning(mut self, beregning: Option<BeregningDto>) -> Self {
        self.beregning = beregning;
        self
    }
}

impl From<tilbud::Model> for TilbudDto {
    fn from(m: tilbud::Model) -> Self {
        Self {
            id: m.id,
            prosjekt_id: m.prosjekt_id,
            tilbudsnummer: m.tilbudsnummer,
            produkttype: m.produkttype,
            status_tekst: m.status.label().to_string(),
            status: m.status,
            versjonsnummer: m.versjonsnummer,
            kommentar: m.kommentar,
            opprettet_av: m.opprettet_av,
            beregning: None,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTilbudRequest {
    pub prosjekt_id: Uuid,
    pub produkttype: String,
    pub status: Option<TilbudStatus>,
    pub kommentar: Option<String>,
    pub utfort_av: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTilbudRequest {
    pub id: Uuid,
    pub produkttype: Option<String>,
    pub status: Option<TilbudStatus>,
    pub kommentar: Option<String>,
    pub utfort_av: Option<Uuid>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProsjektIdRequest {
    pub prosjekt_id: Uuid,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TilbudIdRequest {
    pub tilbud_id: Uuid,
}
