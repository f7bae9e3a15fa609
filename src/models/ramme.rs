use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Three-tier indicator of how much of the ramme is used
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RammeFarge {
    Gronn,
    Gul,
    Rod,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RammeForbruk {
    pub selskap_id: Uuid,
    #[serde(with = "rust_decimal::serde::str")]
    pub total_ramme: Decimal,
    /// Sum over produced projects other than the current one
    #[serde(with = "rust_decimal::serde::str")]
    pub forbrukt_av_andre: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub gjeldende_prosjekt: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub tilgjengelig: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub forbruk_prosent: Decimal,
    pub farge: RammeFarge,
    pub antall_produserte_prosjekter: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RammeValidering {
    pub gyldig: bool,
    #[serde(with = "rust_decimal::serde::str")]
    pub total_ramme: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub eksisterende_forbruk: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub nytt_belop: Decimal,
    /// Headroom after the hypothetical amount; negative when exceeded
    #[serde(with = "rust_decimal::serde::str")]
    pub tilgjengelig_etter: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub overskredet_belop: Decimal,
    /// Less than 10 % of the ramme left after the addition
    pub naer_grense: bool,
    pub melding: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RammeForbrukRequest {
    pub selskap_id: Uuid,
    pub ekskluder_prosjekt_id: Option<Uuid>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValiderRammeRequest {
    pub selskap_id: Uuid,
    pub nytt_belop: Decimal,
    pub ekskluder_prosjekt_id: Option<Uuid>,
}
