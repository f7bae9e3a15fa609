use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::garanti_dokument;
use crate::models::common::EntityContext;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DokumentDto {
    pub id: Uuid,
    pub context: Option<EntityContext>,
    pub filnavn: String,
    pub content_type: Option<String>,
    pub storrelse: i64,
    pub dokument_type: Option<String>,
    pub beskrivelse: Option<String>,
    pub lastet_opp_av: Option<Uuid>,
    pub created_at: DateTime<FixedOffset>,
    /// Time-limited read link, only set right after upload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sas_url: Option<String>,
}

impl From<garanti_dokument::Model> for DokumentDto {
    fn from(m: garanti_dokument::Model) -> Self {
        Self {
            id: m.id,
            context: EntityContext::from_foreign_keys(m.sak_id, m.selskap_id, m.prosjekt_id),
            filnavn: m.filnavn,
            content_type: m.content_type,
            storrelse: m.storrelse,
            dokument_type: m.dokument_type,
            beskrivelse: m.beskrivelse,
            lastet_opp_av: m.lastet_opp_av,
            created_at: m.created_at,
            sas_url: None,
        }
    }
}

/// File content travels base64-encoded over the IPC channel
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadDokumentRequest {
    pub context: EntityContext,
    pub filnavn: String,
    pub content_type: Option<String>,
    pub innhold_base64: String,
    pub dokument_type: Option<String>,
    pub beskrivelse: Option<String>,
    pub utfort_av: Option<Uuid>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DokumentListQuery {
    pub context: EntityContext,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DokumentUrlResponse {
    pub url: String,
    pub utloper: DateTime<FixedOffset>,
}
