use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::tilbud_enhet;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhetDto {
    pub id: Uuid,
    pub tilbud_id: Uuid,
    pub betegnelse: String,
    pub enhetstype: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub andel_av_helhet: Decimal,
}

impl From<tilbud_enhet::Model> for EnhetDto {
    fn from(m: tilbud_enhet::Model) -> Self {
        Self {
            id: m.id,
            tilbud_id: m.tilbud_id,
            betegnelse: m.betegnelse,
            enhetstype: m.enhetstype,
            andel_av_helhet: m.andel_av_helhet,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEnhetRequest {
    pub tilbud_id: Uuid,
    pub betegnelse: String,
    pub enhetstype: Option<String>,
    pub andel_av_helhet: Decimal,
    pub utfort_av: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEnhetRequest {
    pub id: Uuid,
    pub betegnelse: Option<String>,
    pub enhetstype: Option<String>,
    pub andel_av_helhet: Option<Decimal>,
    pub utfort_av: Option<Uuid>,
}

/// Bulk generation from the project-type template
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenererEnheterRequest {
    pub tilbud_id: Uuid,
    pub antall: u32,
    /// Overrides the template's label prefix ("Leilighet", "Tomt", ...)
    pub prefiks: Option<String>,
    #[serde(default)]
    pub erstatt_eksisterende: bool,
    pub utfort_av: Option<Uuid>,
}
