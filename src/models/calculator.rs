use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Private vehicle premium input. Every field is optional so the renderer can
/// recalculate on each keystroke; incomplete input yields a zero result.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehiclePremiumRequest {
    pub kjoeretoeyklasse: Option<String>,
    pub verdi: Option<Decimal>,
    pub dekning: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VehiclePremium {
    #[serde(with = "rust_decimal::serde::str")]
    pub ansvar: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub brann_tyveri: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub kasko: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub total: Decimal,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TilleggValg {
    pub kode: String,
    /// Only used by DRIFTSAVBRUDD
    pub dagsbelop: Option<Decimal>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TruckPremiumRequest {
    pub kjoeretoeytype: Option<String>,
    #[serde(alias = "totalvekt")]
    pub vektklasse: Option<String>,
    pub kjoerelengde: Option<String>,
    pub kjoereomraade: Option<String>,
    pub dekning: Option<String>,
    #[serde(alias = "egenandelKasko")]
    pub egenandel: Option<String>,
    pub registreringsaar: Option<i32>,
    /// Defaults to the current year
    pub beregningsaar: Option<i32>,
    #[serde(default)]
    pub tilleggsdekninger: Vec<TilleggValg>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TilleggLinje {
    pub kode: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub belop: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TruckPremium {
    #[serde(with = "rust_decimal::serde::str")]
    pub ansvar_endelig: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub kasko_endelig: Decimal,
    pub tillegg: Vec<TilleggLinje>,
    #[serde(with = "rust_decimal::serde::str")]
    pub sum_tillegg: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub total: Decimal,
}
