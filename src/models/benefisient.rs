use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::tilbud_benefisient::{self, BenefisientType};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenefisientDto {
    pub id: Uuid,
    pub tilbud_id: Uuid,
    pub enhet_id: Option<Uuid>,
    #[serde(rename = "type")]
    pub benefisient_type: BenefisientType,
    pub navn: String,
    pub organisasjonsnummer: Option<String>,
    pub personident: Option<String>,
    #[serde(with = "rust_decimal::serde::str")]
    pub andel: Decimal,
    pub aktiv: bool,
    pub aktiv_fra: DateTime<FixedOffset>,
    pub aktiv_til: Option<DateTime<FixedOffset>>,
}

impl From<tilbud_benefisient::Model> for BenefisientDto {
    fn from(m: tilbud_benefisient::Model) -> Self {
        Self {
            id: m.id,
            tilbud_id: m.tilbud_id,
            enhet_id: m.enhet_id,
            benefisient_type: m.benefisient_type,
            navn: m.navn,
            organisasjonsnummer: m.organisasjonsnummer,
            personident: m.personident,
            andel: m.andel,
            aktiv: m.aktiv,
            aktiv_fra: m.aktiv_fra,
            aktiv_til: m.aktiv_til,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBenefisientRequest {
    pub tilbud_id: Uuid,
    pub enhet_id: Option<Uuid>,
    #[serde(rename = "type")]
    pub benefisient_type: BenefisientType,
    pub navn: String,
    pub organisasjonsnummer: Option<String>,
    pub personident: Option<String>,
    pub andel: Decimal,
    pub utfort_av: Option<Uuid>,
}

/// The scope (tilbud, enhet) and type of a benefisient are fixed after creation
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBenefisientRequest {
    pub id: Uuid,
    pub navn: Option<String>,
    pub organisasjonsnummer: Option<String>,
    pub personident: Option<String>,
    pub andel: Option<Decimal>,
    pub utfort_av: Option<Uuid>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenefisientListQuery {
    pub tilbud_id: Uuid,
    #[serde(default)]
    pub inkluder_inaktive: bool,
}
