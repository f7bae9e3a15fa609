//! Published tariff tables for the vehicle and truck calculators
//!
//! Keys are matched case-insensitively after trimming. Factors are plain
//! multipliers; rates are fractions of the declared value.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

pub struct VehicleClass {
    pub key: &'static str,
    pub ansvar_grunnpris: Decimal,
    pub brann_tyveri_sats: Decimal,
    pub kasko_sats: Decimal,
}

pub const VEHICLE_CLASSES: &[VehicleClass] = &[
    VehicleClass { key: "Personbil", ansvar_grunnpris: dec!(3200), brann_tyveri_sats: dec!(0.0045), kasko_sats: dec!(0.021) },
    VehicleClass { key: "Varebil", ansvar_grunnpris: dec!(4100), brann_tyveri_sats: dec!(0.005), kasko_sats: dec!(0.024) },
    VehicleClass { key: "Motorsykkel", ansvar_grunnpris: dec!(1800), brann_tyveri_sats: dec!(0.006), kasko_sats: dec!(0.028) },
    VehicleClass { key: "Moped", ansvar_grunnpris: dec!(900), brann_tyveri_sats: dec!(0.007), kasko_sats: dec!(0.03) },
    VehicleClass { key: "Bobil", ansvar_grunnpris: dec!(3800), brann_tyveri_sats: dec!(0.0045), kasko_sats: dec!(0.019) },
    VehicleClass { key: "Campingvogn", ansvar_grunnpris: dec!(1100), brann_tyveri_sats: dec!(0.004), kasko_sats: dec!(0.015) },
    VehicleClass { key: "Tilhenger", ansvar_grunnpris: dec!(600), brann_tyveri_sats: dec!(0.003), kasko_sats: dec!(0.012) },
    VehicleClass { key: "Veteranbil", ansvar_grunnpris: dec!(1200), brann_tyveri_sats: dec!(0.0025), kasko_sats: dec!(0.009) },
    VehicleClass { key: "Veteran-MC", ansvar_grunnpris: dec!(700), brann_tyveri_sats: dec!(0.003), kasko_sats: dec!(0.011) },
];

pub struct TruckType {
    pub key: &'static str,
    pub ansvar_grunnpris: Decimal,
    pub kasko_grunnpris: Decimal,
}

pub const TRUCK_TYPES: &[TruckType] = &[
    TruckType { key: "SKAPBIL", ansvar_grunnpris: dec!(8500), kasko_grunnpris: dec!(12000) },
    TruckType { key: "LASTEBIL", ansvar_grunnpris: dec!(9500), kasko_grunnpris: dec!(14000) },
    TruckType { key: "TREKKVOGN", ansvar_grunnpris: dec!(11000), kasko_grunnpris: dec!(16000) },
    TruckType { key: "TIPPBIL", ansvar_grunnpris: dec!(10500), kasko_grunnpris: dec!(15500) },
    TruckType { key: "KRANBIL", ansvar_grunnpris: dec!(10000), kasko_grunnpris: dec!(15000) },
];

pub const VEKTKLASSER: &[(&str, Decimal)] = &[
    ("Inntil 10 000 kg", dec!(1.00)),
    ("10 001 - 20 000 kg", dec!(1.15)),
    ("20 001 - 35 000 kg", dec!(1.30)),
    ("Over 35 000 kg", dec!(1.45)),
];

/// Annual mileage in km
pub const KJOERELENGDER: &[(&str, Decimal)] = &[
    ("20000", dec!(0.90)),
    ("40000", dec!(1.00)),
    ("60000", dec!(1.10)),
    ("80000", dec!(1.20)),
    ("Ubegrenset", dec!(1.35)),
];

pub const KJOEREOMRAADER: &[(&str, Decimal)] = &[
    ("LOKALT", dec!(0.85)),
    ("REGIONALT", dec!(0.95)),
    ("NORGE", dec!(1.00)),
    ("NORDEN", dec!(1.15)),
    ("EUROPA", dec!(1.30)),
];

/// Share of the kasko base price carried by each coverage level
pub const DEKNINGSANDELER: &[(&str, Decimal)] = &[
    ("ANSVAR", dec!(0)),
    ("DELKASKO", dec!(0.35)),
    ("KASKO", dec!(1.00)),
];

pub const EGENANDELER: &[(&str, Decimal)] = &[
    ("4000", dec!(1.15)),
    ("6000", dec!(1.08)),
    ("8000", dec!(1.00)),
    ("10000", dec!(0.90)),
    ("20000", dec!(0.80)),
    ("50000", dec!(0.70)),
];

/// (max age inclusive, factor), ascending
pub const ALDERSFAKTORER: &[(i32, Decimal)] = &[
    (2, dec!(1.00)),
    (5, dec!(0.90)),
    (10, dec!(0.80)),
    (20, dec!(0.70)),
    (50, dec!(0.60)),
];

pub const MAX_ALDER: i32 = 50;

pub enum TilleggPris {
    Fast(Decimal),
    /// Fraction of the ansvar + kasko subtotal
    Prosent(Decimal),
    /// dagsbeløp times the multiplier
    Dagsbelop(Decimal),
}

pub const TILLEGGSDEKNINGER: &[(&str, TilleggPris)] = &[
    ("LEIEBIL", TilleggPris::Fast(dec!(1500))),
    ("FOERERULYKKE", TilleggPris::Fast(dec!(850))),
    ("GODSANSVAR", TilleggPris::Prosent(dec!(0.04))),
    ("MASKINSKADE", TilleggPris::Prosent(dec!(0.06))),
    ("DRIFTSAVBRUDD", TilleggPris::Dagsbelop(dec!(3))),
];

fn matches(key: &str, input: &str) -> bool {
    key.eq_ignore_ascii_case(input.trim())
}

pub fn vehicle_class(input: &str) -> Option<&'static VehicleClass> {
    VEHICLE_CLASSES.iter().find(|c| matches(c.key, input))
}

pub fn truck_type(input: &str) -> Option<&'static TruckType> {
    TRUCK_TYPES.iter().find(|t| matches(t.key, input))
}

pub fn factor(table: &'static [(&'static str, Decimal)], input: &str) -> Option<Decimal> {
    table.iter().find(|(k, _)| matches(k, input)).map(|(_, f)| *f)
}

pub fn tillegg(input: &str) -> Option<(&'static str, &'static TilleggPris)> {
    TILLEGGSDEKNINGER
        .iter()
        .find(|(k, _)| matches(k, input))
        .map(|(k, p)| (*k, p))
}

/// Age is clamped to [0, 50] before the bucket lookup
pub fn aldersfaktor(alder: i32) -> Decimal {
    let alder = alder.clamp(0, MAX_ALDER);
    ALDERSFAKTORER
        .iter()
        .find(|(max, _)| alder <= *max)
        .map(|(_, f)| *f)
        .unwrap_or(Decimal::ONE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert!(vehicle_class("personbil").is_some());
        assert!(truck_type(" skapbil ").is_some());
        assert_eq!(factor(KJOEREOMRAADER, "norge"), Some(dec!(1.00)));
        assert_eq!(factor(KJOEREOMRAADER, "ASIA"), None);
    }

    #[test]
    fn test_age_buckets() {
        assert_eq!(aldersfaktor(0), dec!(1.00));
        assert_eq!(aldersfaktor(2), dec!(1.00));
        assert_eq!(aldersfaktor(3), dec!(0.90));
        assert_eq!(aldersfaktor(10), dec!(0.80));
        assert_eq!(aldersfaktor(11), dec!(0.70));
        assert_eq!(aldersfaktor(50), dec!(0.60));
    }

    #[test]
    fn test_age_is_clamped() {
        assert_eq!(aldersfaktor(-4), dec!(1.00));
        assert_eq!(aldersfaktor(120), dec!(0.60));
    }
}
