//! Guarantee premium for a tilbud
//!
//! The execution period is secured at 3 % of the contract sum and the
//! guarantee period at 5 %. Rates are given in percent per year.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::{ServiceError, ServiceResult};
use crate::services::rounding::round_kroner;

pub const UTFORELSE_SIKKERHET: Decimal = dec!(0.03);
pub const GARANTI_SIKKERHET: Decimal = dec!(0.05);

#[derive(Debug, Clone, PartialEq)]
pub struct BeregningInput {
    pub kontraktssum: Decimal,
    pub utforelsestid_maaneder: i32,
    pub garantitid_aar: i32,
    pub rente_utforelse: Decimal,
    pub rente_garanti: Decimal,
    pub etableringsgebyr: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BeregningResultat {
    pub premie_utforelse: Decimal,
    pub premie_garanti: Decimal,
    pub total_premie: Decimal,
}

pub fn validate(input: &BeregningInput) -> ServiceResult<()> {
    if input.kontraktssum <= Decimal::ZERO {
        return Err(ServiceError::validation("kontraktssum", "må være større enn 0"));
    }
    if input.utforelsestid_maaneder <= 0 {
        return Err(ServiceError::validation("utforelsestidMaaneder", "må være større enn 0"));
    }
    if input.garantitid_aar < 0 {
        return Err(ServiceError::validation("garantitidAar", "kan ikke være negativ"));
    }
    if input.rente_utforelse < Decimal::ZERO {
        return Err(ServiceError::validation("renteUtforelse", "kan ikke være negativ"));
    }
    if input.rente_garanti < Decimal::ZERO {
        return Err(ServiceError::validation("renteGaranti", "kan ikke være negativ"));
    }
    if input.etableringsgebyr < Decimal::ZERO {
        return Err(ServiceError::validation("etableringsgebyr", "kan ikke være negativ"));
    }
    Ok(())
}

fn too_large() -> ServiceError {
    ServiceError::validation("kontraktssum", "gir en premie som er for stor")
}

pub fn calculate(input: &BeregningInput) -> ServiceResult<BeregningResultat> {
    validate(input)?;

    let hundred = dec!(100);
    let premie_utforelse = input
        .kontraktssum
        .checked_mul(UTFORELSE_SIKKERHET)
        .and_then(|v| v.checked_mul(input.rente_utforelse.checked_div(hundred)?))
        .and_then(|v| v.checked_mul(Decimal::from(input.utforelsestid_maaneder)))
        .and_then(|v| v.checked_div(dec!(12)))
        .map(round_kroner)
        .ok_or_else(too_large)?;
    let premie_garanti = input
        .kontraktssum
        .checked_mul(GARANTI_SIKKERHET)
        .and_then(|v| v.checked_mul(input.rente_garanti.checked_div(hundred)?))
        .and_then(|v| v.checked_mul(Decimal::from(input.garantitid_aar)))
        .map(round_kroner)
        .ok_or_else(too_large)?;
    let total_premie = premie_utforelse
        .checked_add(premie_garanti)
        .and_then(|v| v.checked_add(input.etableringsgebyr))
        .ok_or_else(too_large)?;

    Ok(BeregningResultat {
        premie_utforelse,
        premie_garanti,
        total_premie,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> BeregningInput {
        BeregningInput {
            kontraktssum: dec!(10000000),
            utforelsestid_maaneder: 18,
            garantitid_aar: 3,
            rente_utforelse: dec!(1.5),
            rente_garanti: dec!(0.5),
            etableringsgebyr: dec!(2500),
        }
    }

    #[test]
    fn test_calculate() {
        let r = calculate(&input()).unwrap();
        assert_eq!(r.premie_utforelse, dec!(6750));
        assert_eq!(r.premie_garanti, dec!(7500));
        assert_eq!(r.total_premie, dec!(16750));
    }

    #[test]
    fn test_components_rounded_to_kroner() {
        let mut i = input();
        i.kontraktssum = dec!(1234567);
        i.utforelsestid_maaneder = 7;
        let r = calculate(&i).unwrap();
        // 1234567 * 0.03 * 0.015 * 7 / 12 = 324.073...
        assert_eq!(r.premie_utforelse, dec!(324));
        // 1234567 * 0.05 * 0.005 * 3 = 925.92525
        assert_eq!(r.premie_garanti, dec!(926));
        assert_eq!(r.total_premie, dec!(3750));
    }

    #[test]
    fn test_zero_guarantee_years() {
        let mut i = input();
        i.garantitid_aar = 0;
        assert_eq!(calculate(&i).unwrap().premie_garanti, Decimal::ZERO);
    }

    #[test]
    fn test_validation_names_field() {
        let mut i = input();
        i.kontraktssum = Decimal::ZERO;
        let err = calculate(&i).unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        assert!(err.to_string().starts_with("kontraktssum"));

        let mut i = input();
        i.utforelsestid_maaneder = 0;
        assert!(calculate(&i).unwrap_err().to_string().starts_with("utforelsestidMaaneder"));
    }

    #[test]
    fn test_overflow_is_validation_error() {
        let mut i = input();
        i.kontraktssum = dec!(10000000000000000000000000);
        i.rente_utforelse = dec!(10000000000000000000000000);
        let err = calculate(&i).unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        assert!(err.to_string().starts_with("kontraktssum"));

        let mut i = input();
        i.etableringsgebyr = Decimal::MAX;
        assert!(matches!(calculate(&i).unwrap_err(), ServiceError::Validation(_)));
    }
}
