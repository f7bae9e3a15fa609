//! Premium for trucks and other heavy vehicles

use chrono::{Datelike, Utc};
use rust_decimal::Decimal;

use crate::models::calculator::{TilleggLinje, TruckPremium, TruckPremiumRequest};
use crate::services::rounding::round_kroner;
use crate::services::tariffs::{self, TilleggPris};

struct Factors {
    ansvar_grunnpris: Decimal,
    kasko_grunnpris: Decimal,
    vekt: Decimal,
    lengde: Decimal,
    omraade: Decimal,
    dekningsandel: Decimal,
    egenandel: Decimal,
    alder: Decimal,
}

fn lookup(req: &TruckPremiumRequest) -> Option<Factors> {
    let truck = tariffs::truck_type(req.kjoeretoeytype.as_deref()?)?;
    let beregningsaar = req.beregningsaar.unwrap_or_else(|| Utc::now().year());
    let alder = req.registreringsaar.map(|aar| beregningsaar.saturating_sub(aar)).unwrap_or(0);

    Some(Factors {
        ansvar_grunnpris: truck.ansvar_grunnpris,
        kasko_grunnpris: truck.kasko_grunnpris,
        vekt: tariffs::factor(tariffs::VEKTKLASSER, req.vektklasse.as_deref()?)?,
        lengde: tariffs::factor(tariffs::KJOERELENGDER, req.kjoerelengde.as_deref()?)?,
        omraade: tariffs::factor(tariffs::KJOEREOMRAADER, req.kjoereomraade.as_deref()?)?,
        dekningsandel: tariffs::factor(tariffs::DEKNINGSANDELER, req.dekning.as_deref()?)?,
        egenandel: tariffs::factor(tariffs::EGENANDELER, req.egenandel.as_deref()?)?,
        alder: tariffs::aldersfaktor(alder),
    })
}

/// Unknown or missing selections give an all-zero premium, as does an
/// amount too large to represent.
pub fn calculate_truck_premium(req: &TruckPremiumRequest) -> TruckPremium {
    match lookup(req).and_then(|f| price(req, &f)) {
        Some(premium) => premium,
        None => {
            tracing::debug!(kjoeretoeytype = ?req.kjoeretoeytype, "Truck premium not priced");
            TruckPremium::default()
        }
    }
}

fn product(factors: &[Decimal]) -> Option<Decimal> {
    factors.iter().try_fold(Decimal::ONE, |acc, f| acc.checked_mul(*f))
}

fn price(req: &TruckPremiumRequest, f: &Factors) -> Option<TruckPremium> {
    let ansvar_endelig = round_kroner(product(&[f.ansvar_grunnpris, f.lengde, f.omraade, f.vekt])?);
    let kasko_endelig = round_kroner(product(&[
        f.kasko_grunnpris,
        f.dekningsandel,
        f.egenandel,
        f.lengde,
        f.omraade,
        f.vekt,
        f.alder,
    ])?);
    let subtotal = ansvar_endelig.checked_add(kasko_endelig)?;

    let mut tillegg = Vec::with_capacity(req.tilleggsdekninger.len());
    for valg in &req.tilleggsdekninger {
        let (kode, pris) = tariffs::tillegg(&valg.kode)?;
        let belop = match pris {
            TilleggPris::Fast(belop) => *belop,
            TilleggPris::Prosent(andel) => subtotal.checked_mul(*andel)?,
            TilleggPris::Dagsbelop(multiplikator) => match valg.dagsbelop {
                Some(d) if d > Decimal::ZERO => d.checked_mul(*multiplikator)?,
                _ => return None,
            },
        };
        tillegg.push(TilleggLinje {
            kode: kode.to_string(),
            belop: round_kroner(belop),
        });
    }

    let sum_tillegg = tillegg
        .iter()
        .try_fold(Decimal::ZERO, |acc, t| acc.checked_add(t.belop))?;

    Some(TruckPremium {
        ansvar_endelig,
        kasko_endelig,
        tillegg,
        sum_tillegg,
        total: subtotal.checked_add(sum_tillegg)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::calculator::TilleggValg;
    use rust_decimal_macros::dec;

    fn skapbil() -> TruckPremiumRequest {
        TruckPremiumRequest {
            kjoeretoeytype: Some("SKAPBIL".to_string()),
            vektklasse: Some("Inntil 10 000 kg".to_string()),
            kjoerelengde: Some("60000".to_string()),
            kjoereomraade: Some("NORGE".to_string()),
            dekning: Some("KASKO".to_string()),
            egenandel: Some("10000".to_string()),
            registreringsaar: Some(2026),
            beregningsaar: Some(2026),
            tilleggsdekninger: vec![],
        }
    }

    #[test]
    fn test_reference_scenario() {
        let p = calculate_truck_premium(&skapbil());
        // 8500 * 1.10 * 1.00 * 1.00
        assert_eq!(p.ansvar_endelig, dec!(9350));
        // 12000 * 1.00 * 0.90 * 1.10 * 1.00 * 1.00 * 1.00
        assert_eq!(p.kasko_endelig, dec!(11880));
        assert_eq!(p.total, dec!(21230));
        assert!(p.tillegg.is_empty());
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(calculate_truck_premium(&skapbil()), calculate_truck_premium(&skapbil()));
    }

    #[test]
    fn test_age_factor_applies_to_kasko_only() {
        let mut req = skapbil();
        req.registreringsaar = Some(2018); // 8 years -> 0.80
        let p = calculate_truck_premium(&req);
        assert_eq!(p.ansvar_endelig, dec!(9350));
        assert_eq!(p.kasko_endelig, dec!(9504));
    }

    #[test]
    fn test_future_registration_is_clamped() {
        let mut req = skapbil();
        req.registreringsaar = Some(2030);
        assert_eq!(calculate_truck_premium(&req).kasko_endelig, dec!(11880));
    }

    #[test]
    fn test_delkasko_share() {
        let mut req = skapbil();
        req.dekning = Some("DELKASKO".to_string());
        // 11880 * 0.35 = 4158
        assert_eq!(calculate_truck_premium(&req).kasko_endelig, dec!(4158));
    }

    #[test]
    fn test_surcharges() {
        let mut req = skapbil();
        req.tilleggsdekninger = vec![
            TilleggValg { kode: "LEIEBIL".to_string(), dagsbelop: None },
            TilleggValg { kode: "godsansvar".to_string(), dagsbelop: None },
            TilleggValg { kode: "DRIFTSAVBRUDD".to_string(), dagsbelop: Some(dec!(1200)) },
        ];
        let p = calculate_truck_premium(&req);
        // 21230 * 0.04 = 849.2
        assert_eq!(p.tillegg[0].belop, dec!(1500));
        assert_eq!(p.tillegg[1].belop, dec!(849));
        assert_eq!(p.tillegg[2].belop, dec!(3600));
        assert_eq!(p.sum_tillegg, dec!(5949));
        assert_eq!(p.total, dec!(27179));
    }

    #[test]
    fn test_unknown_selection_gives_zero() {
        let mut req = skapbil();
        req.kjoereomraade = Some("MARS".to_string());
        assert_eq!(calculate_truck_premium(&req), TruckPremium::default());

        let mut req = skapbil();
        req.tilleggsdekninger = vec![TilleggValg { kode: "UKJENT".to_string(), dagsbelop: None }];
        assert_eq!(calculate_truck_premium(&req), TruckPremium::default());

        let mut req = skapbil();
        req.tilleggsdekninger = vec![TilleggValg { kode: "DRIFTSAVBRUDD".to_string(), dagsbelop: None }];
        assert_eq!(calculate_truck_premium(&req), TruckPremium::default());

        assert_eq!(calculate_truck_premium(&TruckPremiumRequest::default()), TruckPremium::default());
    }

    #[test]
    fn test_extreme_registration_year() {
        let mut req = skapbil();
        req.registreringsaar = Some(i32::MIN);
        let p = calculate_truck_premium(&req);
        assert_eq!(p.ansvar_endelig, dec!(9350));
        let mut eldste = skapbil();
        eldste.registreringsaar = Some(2026 - 50);
        assert_eq!(p.kasko_endelig, calculate_truck_premium(&eldste).kasko_endelig);

        req.registreringsaar = Some(i32::MAX);
        assert_eq!(calculate_truck_premium(&req).kasko_endelig, dec!(11880));
    }

    #[test]
    fn test_oversized_daily_amount_gives_zero() {
        let mut req = skapbil();
        req.tilleggsdekninger = vec![TilleggValg {
            kode: "DRIFTSAVBRUDD".to_string(),
            dagsbelop: Some(Decimal::MAX),
        }];
        assert_eq!(calculate_truck_premium(&req), TruckPremium::default());
    }
}
