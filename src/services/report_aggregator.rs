//! Stateless aggregation of report rows
//!
//! Groups are returned sorted by key. Top products are sorted by premium
//! descending with ties broken by name.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::{BTreeMap, HashSet};

use crate::models::report::{
    GarantiKundeRad, GarantiKundeRapport, Gruppe, SalgRad, SalgRapport, SkadeRad, SkadeRapport,
};

pub const TOPP_PRODUKTER: usize = 5;

/// Sorted midpoint; mean of the two middle values for an even count
pub fn median(values: &[Decimal]) -> Decimal {
    if values.is_empty() {
        return Decimal::ZERO;
    }
    let mut sorted = values.to_vec();
    sorted.sort();
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / dec!(2)
    } else {
        sorted[mid]
    }
}

fn group_by<T>(rows: &[T], key: impl Fn(&T) -> String, value: impl Fn(&T) -> Decimal) -> Vec<Gruppe> {
    let mut groups: BTreeMap<String, (usize, Decimal)> = BTreeMap::new();
    for row in rows {
        let entry = groups.entry(key(row)).or_insert((0, Decimal::ZERO));
        entry.0 += 1;
        entry.1 += value(row);
    }
    groups
        .into_iter()
        .map(|(nokkel, (antall, sum))| Gruppe { nokkel, antall, sum })
        .collect()
}

pub fn top_n(groups: &[Gruppe], n: usize) -> Vec<Gruppe> {
    let mut sorted = groups.to_vec();
    sorted.sort_by(|a, b| b.sum.cmp(&a.sum).then_with(|| a.nokkel.cmp(&b.nokkel)));
    sorted.truncate(n);
    sorted
}

fn maaned(date: &chrono::NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

pub fn aggregate_salg(rows: &[SalgRad]) -> SalgRapport {
    let premier: Vec<Decimal> = rows.iter().map(|r| r.premie).collect();
    let per_produkt = group_by(rows, |r| r.produkt.clone(), |r| r.premie);

    SalgRapport {
        antall: rows.len(),
        total_premie: premier.iter().copied().sum(),
        median_premie: median(&premier),
        per_kunde: group_by(rows, |r| r.kunde.clone(), |r| r.premie),
        per_maaned: group_by(rows, |r| maaned(&r.dato), |r| r.premie),
        per_selger: group_by(rows, |r| r.selger.clone(), |r| r.premie),
        topp_produkter: top_n(&per_produkt, TOPP_PRODUKTER),
        per_produkt,
    }
}

pub fn aggregate_skader(rows: &[SkadeRad]) -> SkadeRapport {
    let utbetalt: Vec<Decimal> = rows.iter().map(|r| r.utbetalt).collect();

    SkadeRapport {
        antall: rows.len(),
        total_utbetalt: utbetalt.iter().copied().sum(),
        total_reservert: rows.iter().map(|r| r.reservert).sum(),
        median_utbetalt: median(&utbetalt),
        per_kunde: group_by(rows, |r| r.kunde.clone(), |r| r.utbetalt),
        per_maaned: group_by(rows, |r| maaned(&r.skadedato), |r| r.utbetalt),
        per_produkt: group_by(rows, |r| r.produkt.clone(), |r| r.utbetalt),
        per_status: group_by(rows, |r| r.status.clone(), |r| r.utbetalt),
    }
}

pub fn aggregate_garantikunder(rows: &[GarantiKundeRad]) -> GarantiKundeRapport {
    let belop: Vec<Decimal> = rows.iter().map(|r| r.garantibelop).collect();
    let kunder: HashSet<&str> = rows.iter().map(|r| r.organisasjonsnummer.as_str()).collect();
    let per_produkt = group_by(rows, |r| r.produkt.clone(), |r| r.premie);

    GarantiKundeRapport {
        antall_kunder: kunder.len(),
        antall_garantier: rows.len(),
        total_garantibelop: belop.iter().copied().sum(),
        total_premie: rows.iter().map(|r| r.premie).sum(),
        median_garantibelop: median(&belop),
        per_kunde: group_by(rows, |r| r.kunde.clone(), |r| r.garantibelop),
        per_radgiver: group_by(
            rows,
            |r| r.radgiver.clone().unwrap_or_else(|| "Ikke tildelt".to_string()),
            |r| r.premie,
        ),
        topp_produkter: top_n(&per_produkt, TOPP_PRODUKTER),
        per_produkt,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn salg(kunde: &str, produkt: &str, selger: &str, dato: (i32, u32, u32), premie: Decimal) -> SalgRad {
        SalgRad {
            kunde: kunde.to_string(),
            kundenummer: None,
            produkt: produkt.to_string(),
            selger: selger.to_string(),
            dato: NaiveDate::from_ymd_opt(dato.0, dato.1, dato.2).unwrap(),
            premie,
        }
    }

    #[test]
    fn test_median() {
        assert_eq!(median(&[]), Decimal::ZERO);
        assert_eq!(median(&[dec!(5)]), dec!(5));
        assert_eq!(median(&[dec!(9), dec!(1), dec!(5)]), dec!(5));
        assert_eq!(median(&[dec!(4), dec!(1), dec!(3), dec!(2)]), dec!(2.5));
    }

    #[test]
    fn test_aggregate_salg() {
        let rows = vec![
            salg("Fjord Bygg AS", "Ansvar", "Kari", (2026, 1, 15), dec!(1000)),
            salg("Fjord Bygg AS", "Kasko", "Kari", (2026, 1, 20), dec!(3000)),
            salg("Vik Transport", "Kasko", "Ola", (2026, 2, 3), dec!(2000)),
        ];
        let r = aggregate_salg(&rows);

        assert_eq!(r.antall, 3);
        assert_eq!(r.total_premie, dec!(6000));
        assert_eq!(r.median_premie, dec!(2000));

        assert_eq!(r.per_kunde[0].nokkel, "Fjord Bygg AS");
        assert_eq!(r.per_kunde[0].antall, 2);
        assert_eq!(r.per_kunde[0].sum, dec!(4000));

        let months: Vec<&str> = r.per_maaned.iter().map(|g| g.nokkel.as_str()).collect();
        assert_eq!(months, vec!["2026-01", "2026-02"]);

        assert_eq!(r.topp_produkter[0].nokkel, "Kasko");
        assert_eq!(r.topp_produkter[0].sum, dec!(5000));
    }

    #[test]
    fn test_top_products_ties_and_limit() {
        let groups: Vec<Gruppe> = ["F", "E", "D", "C", "B", "A"]
            .iter()
            .map(|n| Gruppe { nokkel: n.to_string(), antall: 1, sum: dec!(100) })
            .chain(std::iter::once(Gruppe { nokkel: "Z".to_string(), antall: 1, sum: dec!(500) }))
            .collect();
        let top = top_n(&groups, TOPP_PRODUKTER);
        let names: Vec<&str> = top.iter().map(|g| g.nokkel.as_str()).collect();
        assert_eq!(names, vec!["Z", "A", "B", "C", "D"]);
    }

    #[test]
    fn test_aggregate_is_idempotent() {
        let rows = vec![salg("A", "P", "S", (2026, 3, 1), dec!(10))];
        assert_eq!(aggregate_salg(&rows), aggregate_salg(&rows));
    }

    #[test]
    fn test_aggregate_garantikunder_counts_distinct_customers() {
        let rad = |orgnr: &str, produkt: &str, belop: Decimal| GarantiKundeRad {
            organisasjonsnummer: orgnr.to_string(),
            kunde: format!("Kunde {}", orgnr),
            produkt: produkt.to_string(),
            garantibelop: belop,
            premie: belop / dec!(100),
            status: "Aktiv".to_string(),
            startdato: NaiveDate::from_ymd_opt(2026, 5, 1).unwrap(),
            radgiver: None,
        };
        let rows = vec![
            rad("987654321", "Boligbyggergaranti", dec!(1000000)),
            rad("987654321", "Entreprenørgaranti", dec!(2000000)),
            rad("912345678", "Boligbyggergaranti", dec!(4000000)),
        ];
        let r = aggregate_garantikunder(&rows);
        assert_eq!(r.antall_kunder, 2);
        assert_eq!(r.antall_garantier, 3);
        assert_eq!(r.total_garantibelop, dec!(7000000));
        assert_eq!(r.median_garantibelop, dec!(2000000));
        assert_eq!(r.per_radgiver[0].nokkel, "Ikke tildelt");
        assert_eq!(r.topp_produkter[0].nokkel, "Boligbyggergaranti");
    }

    #[test]
    fn test_aggregate_skader_empty() {
        let r = aggregate_skader(&[]);
        assert_eq!(r.antall, 0);
        assert_eq!(r.median_utbetalt, Decimal::ZERO);
        assert!(r.per_status.is_empty());
    }
}
