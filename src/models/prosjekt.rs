use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::prosjekt::{self, ProsjektStatus, Prosjekttype};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProsjektDto {
    pub id: Uuid,
    pub selskap_id: Uuid,
    pub navn: String,
    pub prosjekttype: Option<Prosjekttype>,
    pub status: ProsjektStatus,
    pub status_tekst: String,
    pub ansvarlig_radgiver_id: Option<Uuid>,
    pub gateadresse: Option<String>,
    pub postnummer: Option<String>,
    pub poststed: Option<String>,
    pub kommentar: Option<String>,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl From<prosjekt::Model> for ProsjektDto {
    fn from(m: prosjekt::Model) -> Self {
        Self {
            id: m.id,
            selskap_id: m.selskap_id,
            navn: m.navn,
            prosjekttype: m.prosjekttype,
            status_tekst: m.status.label().to_string(),
            status: m.status,
            ansvarlig_radgiver_id: m.ansvarlig_radgiver_id,
            gateadresse: m.gateadresse,
            postnummer: m.postnummer,
            poststed: m.poststed,
            kommentar: m.kommentar,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProsjektRequest {
    pub selskap_id: Uuid,
    pub navn: String,
    pub prosjekttype: Option<Prosjekttype>,
    pub gateadresse: Option<String>,
    pub postnummer: Option<String>,
    pub poststed: Option<String>,
    pub kommentar: Option<String>,
    pub utfort_av: Option<Uuid>,
}

/// Status is not part of the update: it is derived from the tilbud
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProsjektRequest {
    pub id: Uuid,
    pub navn: Option<String>,
    pub prosjekttype: Option<Prosjekttype>,
    pub gateadresse: Option<String>,
    pub postnummer: Option<String>,
    pub poststed: Option<String>,
    pub kommentar: Option<String>,
    pub utfort_av: Option<Uuid>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignRadgiverRequest {
    pub prosjekt_id: Uuid,
    pub radgiver_id: Uuid,
    pub utfort_av: Option<Uuid>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelskapIdRequest {
    pub selskap_id: Uuid,
}
