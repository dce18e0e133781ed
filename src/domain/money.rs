//! Money helpers
//!
//! Amounts live in the domain as `Decimal` with two fractional digits and
//! are persisted as integer cents.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use super::error::{DomainError, DomainResult};

/// Round to the currency's two decimal places (half away from zero).
pub fn round_amount(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

pub fn to_cents(amount: Decimal) -> DomainResult<i64> {
    (round_amount(amount) * Decimal::ONE_HUNDRED)
        .to_i64()
        .ok_or_else(|| DomainError::Validation(format!("Amount {} is out of range", amount)))
}

pub fn from_cents(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn cents_conversion_keeps_two_places() {
        let amount = Decimal::from_str("50.005").unwrap();
        assert_eq!(to_cents(amount).unwrap(), 5001);
        assert_eq!(from_cents(5001).to_string(), "50.01");
        assert_eq!(from_cents(20000), Decimal::from(200));
    }
}
