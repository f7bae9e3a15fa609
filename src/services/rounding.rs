use rust_decimal::{Decimal, RoundingStrategy};

/// Round to whole kroner, half away from zero
pub fn round_kroner(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_midpoint_rounds_away_from_zero() {
        assert_eq!(round_kroner(dec!(2.5)), dec!(3));
        assert_eq!(round_kroner(dec!(3.5)), dec!(4));
        assert_eq!(round_kroner(dec!(-2.5)), dec!(-3));
        assert_eq!(round_kroner(dec!(1349.49)), dec!(1349));
    }
}
