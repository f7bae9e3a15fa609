use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::garanti_sak;
use crate::entities::prosjekt::Prosjekttype;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SakDto {
    pub id: Uuid,
    pub saksnummer: String,
    pub selskap_id: Uuid,
    pub prosjekt_id: Option<Uuid>,
    pub beskrivelse: Option<String>,
    pub kilde: Option<String>,
    pub opprettet_av: Option<Uuid>,
    pub created_at: DateTime<FixedOffset>,
}

impl From<garanti_sak::Model> for SakDto {
    fn from(m: garanti_sak::Model) -> Self {
        Self {
            id: m.id,
            saksnummer: m.saksnummer,
            selskap_id: m.selskap_id,
            prosjekt_id: m.prosjekt_id,
            beskrivelse: m.beskrivelse,
            kilde: m.kilde,
            opprettet_av: m.opprettet_av,
            created_at: m.created_at,
        }
    }
}

/// A new guarantee request as registered by an adviser
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGuaranteeRequest {
    pub organisasjonsnummer: String,
    pub selskapsnavn: String,
    pub gateadresse: Option<String>,
    pub postnummer: Option<String>,
    pub poststed: Option<String>,
    pub telefon: Option<String>,
    pub epost: Option<String>,
    pub kontaktperson: Option<String>,
    pub prosjektnavn: String,
    pub prosjekttype: Option<Prosjekttype>,
    pub beskrivelse: Option<String>,
    pub kilde: Option<String>,
    pub utfort_av: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGuaranteeResponse {
    pub sak: SakDto,
    pub selskap_id: Uuid,
    pub prosjekt_id: Uuid,
    /// False when an existing selskap with the same organisasjonsnummer was reused
    pub ny_selskap: bool,
}
