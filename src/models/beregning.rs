use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::tilbud_beregning;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeregningDto {
    pub id: Uuid,
    pub tilbud_id: Uuid,
    #[serde(with = "rust_decimal::serde::str")]
    pub kontraktssum: Decimal,
    pub utforelsestid_maaneder: i32,
    pub garantitid_aar: i32,
    #[serde(with = "rust_decimal::serde::str")]
    pub rente_utforelse: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub rente_garanti: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub etableringsgebyr: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub premie_utforelse: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub premie_garanti: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub total_premie: Decimal,
}

impl From<tilbud_beregning::Model> for BeregningDto {
    fn from(m: tilbud_beregning::Model) -> Self {
        Self {
            id: m.id,
            tilbud_id: m.tilbud_id,
            kontraktssum: m.kontraktssum,
            utforelsestid_maaneder: m.utforelsestid_maaneder,
            garantitid_aar: m.garantitid_aar,
            rente_utforelse: m.rente_utforelse,
            rente_garanti: m.rente_garanti,
            etableringsgebyr: m.etableringsgebyr,
            premie_utforelse: m.premie_utforelse,
            premie_garanti: m.premie_garanti,
            total_premie: m.total_premie,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveBeregningRequest {
    pub tilbud_id: Uuid,
    pub kontraktssum: Decimal,
    pub utforelsestid_maaneder: i32,
    pub garantitid_aar: i32,
    pub rente_utforelse: Decimal,
    pub rente_garanti: Decimal,
    pub etableringsgebyr: Option<Decimal>,
    pub utfort_av: Option<Uuid>,
}
