use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::selskap;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelskapDto {
    pub id: Uuid,
    pub organisasjonsnummer: String,
    pub navn: String,
    pub gateadresse: Option<String>,
    pub postnummer: Option<String>,
    pub poststed: Option<String>,
    pub telefon: Option<String>,
    pub epost: Option<String>,
    pub kontaktperson: Option<String>,
    #[serde(with = "rust_decimal::serde::str_option")]
    pub ramme: Option<Decimal>,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl From<selskap::Model> for SelskapDto {
    fn from(m: selskap::Model) -> Self {
        Self {
            id: m.id,
            organisasjonsnummer: m.organisasjonsnummer,
            navn: m.navn,
            gateadresse: m.gateadresse,
            postnummer: m.postnummer,
            poststed: m.poststed,
            telefon: m.telefon,
            epost: m.epost,
            kontaktperson: m.kontaktperson,
            ramme: m.ramme,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSelskapRequest {
    pub organisasjonsnummer: String,
    pub navn: String,
    pub gateadresse: Option<String>,
    pub postnummer: Option<String>,
    pub poststed: Option<String>,
    pub telefon: Option<String>,
    pub epost: Option<String>,
    pub kontaktperson: Option<String>,
    pub ramme: Option<Decimal>,
    pub utfort_av: Option<Uuid>,
}

/// Partial update; `None` leaves the field untouched.
/// `organisasjonsnummer` is accepted only if it equals the stored value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSelskapRequest {
    pub id: Uuid,
    pub organisasjonsnummer: Option<String>,
    pub navn: Option<String>,
    pub gateadresse: Option<String>,
    pub postnummer: Option<String>,
    pub poststed: Option<String>,
    pub telefon: Option<String>,
    pub epost: Option<String>,
    pub kontaktperson: Option<String>,
    pub ramme: Option<Decimal>,
    pub utfort_av: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelskapListQuery {
    /// Matches navn or organisasjonsnummer (case-insensitive)
    pub sok: Option<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrgnrRequest {
    pub organisasjonsnummer: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelskapListResponse {
    pub selskaper: Vec<SelskapDto>,
    pub total: u64,
}
