//! Benefisient share rules
//!
//! Within one scope (same tilbud and same enhet, or same tilbud without enhet)
//! the active shares may never sum to more than 100 %.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::ServiceError;

pub const MAX_TOTAL_ANDEL: Decimal = dec!(100);

/// Check a single share value: 0 < andel <= 100
pub fn validate_andel_range(andel: Decimal) -> Result<(), ServiceError> {
    if andel <= Decimal::ZERO {
        return Err(ServiceError::validation("andel", "må være større enn 0"));
    }
    if andel > MAX_TOTAL_ANDEL {
        return Err(ServiceError::validation("andel", "kan ikke være større enn 100"));
    }
    Ok(())
}

/// Remaining headroom given the other active shares in the scope
pub fn remaining_andel(other_active: &[Decimal]) -> Decimal {
    let used: Decimal = other_active.iter().copied().sum();
    (MAX_TOTAL_ANDEL - used).max(Decimal::ZERO)
}

/// Reject `andel` when it would push the scope total above 100
///
/// `other_active` must not include the benefisient being updated.
pub fn validate_scope_total(andel: Decimal, other_active: &[Decimal]) -> Result<(), ServiceError> {
    validate_andel_range(andel)?;

    let used: Decimal = other_active.iter().copied().sum();
    if used + andel > MAX_TOTAL_ANDEL {
        let remaining = remaining_andel(other_active);
        return Err(ServiceError::BusinessRule(format!(
            "Total andel vil overstige 100 %. Gjenstående andel: {} %",
            remaining.normalize()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range() {
        assert!(validate_andel_range(dec!(0)).is_err());
        assert!(validate_andel_range(dec!(-5)).is_err());
        assert!(validate_andel_range(dec!(100.0001)).is_err());
        assert!(validate_andel_range(dec!(0.01)).is_ok());
        assert!(validate_andel_range(dec!(100)).is_ok());
    }

    #[test]
    fn test_fills_exactly_to_100() {
        assert!(validate_scope_total(dec!(25), &[dec!(50), dec!(25)]).is_ok());
    }

    #[test]
    fn test_overflow_reports_remaining() {
        let err = validate_scope_total(dec!(30), &[dec!(50), dec!(25)]).unwrap_err();
        assert!(matches!(err, ServiceError::BusinessRule(_)));
        assert_eq!(
            err.to_string(),
            "Total andel vil overstige 100 %. Gjenstående andel: 25 %"
        );
    }

    #[test]
    fn test_remaining_with_fractions() {
        assert_eq!(remaining_andel(&[dec!(33.3333), dec!(33.3333)]), dec!(33.3334));
        let err = validate_scope_total(dec!(40), &[dec!(33.3333), dec!(33.3333)]).unwrap_err();
        assert!(err.to_string().ends_with("33.3334 %"));
    }

    #[test]
    fn test_empty_scope() {
        assert_eq!(remaining_andel(&[]), dec!(100));
        assert!(validate_scope_total(dec!(100), &[]).is_ok());
    }
}
