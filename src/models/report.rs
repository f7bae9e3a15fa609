//! Report rows as delivered by the reporting API, and the aggregated reports

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::services::text_normalize::normalize_text;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalgRad {
    pub kunde: String,
    pub kundenummer: Option<String>,
    pub produkt: String,
    pub selger: String,
    pub dato: NaiveDate,
    pub premie: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkadeRad {
    pub skadenummer: String,
    pub kunde: String,
    pub produkt: String,
    pub skadedato: NaiveDate,
    pub status: String,
    pub utbetalt: Decimal,
    pub reservert: Decimal,
    pub beskrivelse: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GarantiKundeRad {
    pub organisasjonsnummer: String,
    pub kunde: String,
    pub produkt: String,
    pub garantibelop: Decimal,
    pub premie: Decimal,
    pub status: String,
    pub startdato: NaiveDate,
    pub radgiver: Option<String>,
}

/// Canonicalize free-text fields once, when rows enter the system
pub trait NormalizeText {
    fn normalize(self) -> Self;
}

impl NormalizeText for SalgRad {
    fn normalize(mut self) -> Self {
        self.kunde = normalize_text(&self.kunde);
        self.produkt = normalize_text(&self.produkt);
        self.selger = normalize_text(&self.selger);
        self
    }
}

impl NormalizeText for SkadeRad {
    fn normalize(mut self) -> Self {
        self.kunde = normalize_text(&self.kunde);
        self.produkt = normalize_text(&self.produkt);
        self.status = normalize_text(&self.status);
        self.beskrivelse = self.beskrivelse.as_deref().map(normalize_text);
        self
    }
}

impl NormalizeText for GarantiKundeRad {
    fn normalize(mut self) -> Self {
        self.kunde = normalize_text(&self.kunde);
        self.produkt = normalize_text(&self.produkt);
        self.status = normalize_text(&self.status);
        self.radgiver = self.radgiver.as_deref().map(normalize_text);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Gruppe {
    pub nokkel: String,
    pub antall: usize,
    #[serde(with = "rust_decimal::serde::str")]
    pub sum: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalgRapport {
    pub antall: usize,
    #[serde(with = "rust_decimal::serde::str")]
    pub total_premie: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub median_premie: Decimal,
    pub per_kunde: Vec<Gruppe>,
    pub per_maaned: Vec<Gruppe>,
    pub per_produkt: Vec<Gruppe>,
    pub per_selger: Vec<Gruppe>,
    pub topp_produkter: Vec<Gruppe>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkadeRapport {
    pub antall: usize,
    #[serde(with = "rust_decimal::serde::str")]
    pub total_utbetalt: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub total_reservert: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub median_utbetalt: Decimal,
    pub per_kunde: Vec<Gruppe>,
    pub per_maaned: Vec<Gruppe>,
    pub per_produkt: Vec<Gruppe>,
    pub per_status: Vec<Gruppe>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GarantiKundeRapport {
    pub antall_kunder: usize,
    pub antall_garantier: usize,
    #[serde(with = "rust_decimal::serde::str")]
    pub total_garantibelop: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub total_premie: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub median_garantibelop: Decimal,
    pub per_kunde: Vec<Gruppe>,
    pub per_produkt: Vec<Gruppe>,
    pub per_radgiver: Vec<Gruppe>,
    pub topp_produkter: Vec<Gruppe>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RapportPeriode {
    pub fra: NaiveDate,
    pub til: NaiveDate,
}

/// CSV content returned to the renderer, which saves it to disk
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvExport {
    pub filnavn: String,
    pub innhold: String,
}
