//! Premium for private vehicles (cars, motorcycles, trailers, veteran classes)

use rust_decimal::Decimal;

use crate::models::calculator::{VehiclePremium, VehiclePremiumRequest};
use crate::services::rounding::round_kroner;
use crate::services::tariffs;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dekning {
    Ansvar,
    Delkasko,
    Kasko,
}

impl Dekning {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "ansvar" => Some(Dekning::Ansvar),
            "delkasko" => Some(Dekning::Delkasko),
            "kasko" => Some(Dekning::Kasko),
            _ => None,
        }
    }
}

/// Components are rounded one by one and `total` is the sum of the rounded
/// parts. Incomplete or unknown input gives an all-zero premium.
pub fn calculate_vehicle_premium(req: &VehiclePremiumRequest) -> VehiclePremium {
    let Some(class) = req.kjoeretoeyklasse.as_deref().and_then(tariffs::vehicle_class) else {
        return VehiclePremium::default();
    };
    let Some(dekning) = req.dekning.as_deref().and_then(Dekning::parse) else {
        return VehiclePremium::default();
    };
    let verdi = match req.verdi {
        Some(v) if v > Decimal::ZERO => v,
        _ => return VehiclePremium::default(),
    };

    let ansvar = round_kroner(class.ansvar_grunnpris);
    let brann_tyveri = match dekning {
        Dekning::Ansvar => Decimal::ZERO,
        Dekning::Delkasko | Dekning::Kasko => round_kroner(verdi * class.brann_tyveri_sats),
    };
    let kasko = match dekning {
        Dekning::Kasko => round_kroner(verdi * class.kasko_sats),
        _ => Decimal::ZERO,
    };

    tracing::debug!(class = class.key, ?dekning, %verdi, "Calculated vehicle premium");

    VehiclePremium {
        ansvar,
        brann_tyveri,
        kasko,
        total: ansvar + brann_tyveri + kasko,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn req(class: &str, verdi: Decimal, dekning: &str) -> VehiclePremiumRequest {
        VehiclePremiumRequest {
            kjoeretoeyklasse: Some(class.to_string()),
            verdi: Some(verdi),
            dekning: Some(dekning.to_string()),
        }
    }

    #[test]
    fn test_full_kasko() {
        let p = calculate_vehicle_premium(&req("Personbil", dec!(300000), "Kasko"));
        assert_eq!(p.ansvar, dec!(3200));
        assert_eq!(p.brann_tyveri, dec!(1350));
        assert_eq!(p.kasko, dec!(6300));
        assert_eq!(p.total, dec!(10850));
    }

    #[test]
    fn test_total_is_sum_of_rounded_parts() {
        // 123457 * 0.0045 = 555.5565, 123457 * 0.021 = 2592.597
        let p = calculate_vehicle_premium(&req("Personbil", dec!(123457), "Kasko"));
        assert_eq!(p.brann_tyveri, dec!(556));
        assert_eq!(p.kasko, dec!(2593));
        assert_eq!(p.total, p.ansvar + p.brann_tyveri + p.kasko);
        assert_eq!(p.total, dec!(6349));
    }

    #[test]
    fn test_coverage_levels() {
        let ansvar = calculate_vehicle_premium(&req("Varebil", dec!(200000), "Ansvar"));
        assert_eq!(ansvar.brann_tyveri, Decimal::ZERO);
        assert_eq!(ansvar.kasko, Decimal::ZERO);
        assert_eq!(ansvar.total, dec!(4100));

        let delkasko = calculate_vehicle_premium(&req("Varebil", dec!(200000), "delkasko"));
        assert_eq!(delkasko.brann_tyveri, dec!(1000));
        assert_eq!(delkasko.kasko, Decimal::ZERO);
    }

    #[test]
    fn test_veteran_class() {
        let p = calculate_vehicle_premium(&req("Veteranbil", dec!(150000), "Kasko"));
        assert_eq!(p.ansvar, dec!(1200));
        assert_eq!(p.brann_tyveri, dec!(375));
        assert_eq!(p.kasko, dec!(1350));
    }

    #[test]
    fn test_invalid_input_gives_zero() {
        let zero = VehiclePremium::default();
        assert_eq!(calculate_vehicle_premium(&req("Romskip", dec!(1000), "Kasko")), zero);
        assert_eq!(calculate_vehicle_premium(&req("Personbil", dec!(0), "Kasko")), zero);
        assert_eq!(calculate_vehicle_premium(&req("Personbil", dec!(-10), "Kasko")), zero);
        assert_eq!(calculate_vehicle_premium(&req("Personbil", dec!(1000), "Superkasko")), zero);
        assert_eq!(calculate_vehicle_premium(&VehiclePremiumRequest::default()), zero);
    }
}
